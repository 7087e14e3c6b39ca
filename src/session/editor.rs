use crate::export::encode::{ExportFormat, encode, to_data_uri};
use crate::foundation::error::{MemeError, MemeResult};
use crate::remote::payload::PublishRequest;
use crate::render::backend::{CompositedOutput, TextCanvas};
use crate::render::compositor::Compositor;
use crate::render::cpu::CpuCanvas;
use crate::render::fonts::FontBook;
use crate::source::image::SourceImage;
use crate::source::loader::{DecodeTicket, ImageFetcher, SourceLoader, SourceOrigin};
use crate::text::params::TextLayerParams;

/// Callback invoked with every fresh composite.
pub type RenderObserver = Box<dyn FnMut(&CompositedOutput)>;

/// Single-user editor state.
///
/// Every transition that changes what is on screen (new params, a newly decoded source)
/// re-renders from the untouched source and notifies observers. A failed decode leaves the
/// previous source and composite in place.
pub struct EditorSession<C: TextCanvas = CpuCanvas> {
    compositor: Compositor<C>,
    defaults: TextLayerParams,
    params: TextLayerParams,
    source: Option<SourceImage>,
    output: Option<CompositedOutput>,
    loader: SourceLoader,
    observers: Vec<RenderObserver>,
}

impl EditorSession<CpuCanvas> {
    /// Session drawing with the CPU canvas.
    pub fn cpu(fonts: FontBook, defaults: TextLayerParams) -> Self {
        Self::new(CpuCanvas::new(fonts), defaults)
    }
}

impl<C: TextCanvas> EditorSession<C> {
    /// Empty session; `defaults` are the params used initially and after [`Self::reset`].
    pub fn new(canvas: C, defaults: TextLayerParams) -> Self {
        Self {
            compositor: Compositor::new(canvas),
            params: defaults.clone(),
            defaults,
            source: None,
            output: None,
            loader: SourceLoader::new(),
            observers: Vec::new(),
        }
    }

    /// Current text parameters.
    pub fn params(&self) -> &TextLayerParams {
        &self.params
    }

    /// Current source, if one has been loaded.
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Most recent composite.
    pub fn output(&self) -> Option<&CompositedOutput> {
        self.output.as_ref()
    }

    /// The canvas used for rendering.
    pub fn canvas(&self) -> &C {
        self.compositor.canvas()
    }

    /// Register `observer` to receive each new composite.
    pub fn on_render(&mut self, observer: impl FnMut(&CompositedOutput) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replace the params and re-render if a source is loaded.
    pub fn set_params(&mut self, params: TextLayerParams) -> MemeResult<Option<&CompositedOutput>> {
        self.params = params;
        self.rerender_if_loaded()
    }

    /// Derive new params from the current ones and re-render.
    pub fn update(
        &mut self,
        f: impl FnOnce(TextLayerParams) -> TextLayerParams,
    ) -> MemeResult<Option<&CompositedOutput>> {
        let next = f(self.params.clone());
        self.set_params(next)
    }

    /// Use generated text as the editor content.
    pub fn apply_generated_text(&mut self, text: &str) -> MemeResult<Option<&CompositedOutput>> {
        self.update(|p| p.with_content(text))
    }

    /// Start a decode request, superseding any outstanding one.
    pub fn begin_load(&mut self) -> DecodeTicket {
        self.loader.issue()
    }

    /// Finish `ticket` by decoding `origin`.
    ///
    /// Returns `Ok(false)` when the ticket was superseded; the origin is not touched then.
    pub fn finish_load(
        &mut self,
        ticket: DecodeTicket,
        origin: &SourceOrigin,
        fetcher: Option<&dyn ImageFetcher>,
    ) -> MemeResult<bool> {
        self.finish_load_with(ticket, || origin.decode(fetcher))
    }

    /// Finish `ticket` with a caller-provided decoder.
    pub fn finish_load_with<F>(&mut self, ticket: DecodeTicket, decode: F) -> MemeResult<bool>
    where
        F: FnOnce() -> MemeResult<SourceImage>,
    {
        let decoded = match self.loader.complete(ticket, decode) {
            Ok(Some(image)) => image,
            Ok(None) => return Ok(false),
            Err(e) => {
                tracing::warn!(ticket = ticket.seq(), error = %e, "source decode failed");
                return Err(e);
            }
        };
        tracing::debug!(
            ticket = ticket.seq(),
            w = decoded.width(),
            h = decoded.height(),
            "source loaded"
        );
        // Commit the source only once its composite exists.
        let out = self.compositor.render(&decoded, &self.params)?;
        self.source = Some(decoded);
        self.publish(out);
        Ok(true)
    }

    /// Load `origin` synchronously and render.
    pub fn load(
        &mut self,
        origin: &SourceOrigin,
        fetcher: Option<&dyn ImageFetcher>,
    ) -> MemeResult<&CompositedOutput> {
        let ticket = self.begin_load();
        self.finish_load(ticket, origin, fetcher)?;
        self.output.as_ref().ok_or(MemeError::NoSource)
    }

    /// Render the current params over the current source.
    pub fn render(&mut self) -> MemeResult<&CompositedOutput> {
        let source = self.source.as_ref().ok_or(MemeError::NoSource)?;
        let out = self.compositor.render(source, &self.params)?;
        Ok(self.publish(out))
    }

    fn publish(&mut self, out: CompositedOutput) -> &CompositedOutput {
        for observer in &mut self.observers {
            observer(&out);
        }
        self.output.insert(out)
    }

    fn rerender_if_loaded(&mut self) -> MemeResult<Option<&CompositedOutput>> {
        if self.source.is_none() {
            return Ok(None);
        }
        self.render().map(Some)
    }

    /// Drop the source and composite, restore default params and supersede pending decodes.
    pub fn reset(&mut self) {
        self.loader.invalidate();
        self.source = None;
        self.output = None;
        self.params = self.defaults.clone();
    }

    /// Encode the latest composite.
    pub fn export(&self, format: ExportFormat) -> MemeResult<Vec<u8>> {
        encode(self.latest()?, format)
    }

    /// Latest composite as a PNG data URI.
    pub fn data_uri(&self) -> MemeResult<String> {
        to_data_uri(self.latest()?, ExportFormat::Png)
    }

    /// Publish payload for the latest composite.
    pub fn publish_request(
        &self,
        theme: Option<&str>,
        creator: Option<&str>,
    ) -> MemeResult<PublishRequest> {
        Ok(PublishRequest::new(
            self.data_uri()?,
            self.params.content(),
            theme,
            creator,
        ))
    }

    fn latest(&self) -> MemeResult<&CompositedOutput> {
        self.output.as_ref().ok_or(MemeError::NoSource)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
