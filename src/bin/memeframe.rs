use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use memeframe::source::ImageFetcher;
use memeframe::{
    AppConfig, Canvas, EditorSession, ExportFormat, FontBook, FontFamily, Rgb8, SourceOrigin,
    TextAlign, TextLayerParams, export, layout_text_block,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "memeframe", version, about = "Caption images the meme way")]
struct Cli {
    /// JSON config file (api base, fonts, default text params).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite text over an image and write it to a file.
    Render(RenderArgs),
    /// Print per-line coordinates as JSON without rendering.
    Layout(LayoutArgs),
    /// Print the composite as a `data:` URI.
    DataUri(DataUriArgs),
    /// Generate a caption and image for a theme.
    #[cfg(feature = "remote")]
    Generate(GenerateArgs),
    /// Composite and publish to the community feed.
    #[cfg(feature = "remote")]
    Share(ShareArgs),
    /// List the community feed.
    #[cfg(feature = "remote")]
    Feed(FeedArgs),
    /// Like or dislike a shared meme.
    #[cfg(feature = "remote")]
    Vote(VoteArgs),
}

#[derive(Args, Debug)]
struct TextArgs {
    /// JSON file with text params; flags below override it.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Caption; a literal `\n` starts a new line.
    #[arg(long)]
    text: Option<String>,

    /// Font size in pixels (10..=100).
    #[arg(long, allow_negative_numbers = true)]
    font_size: Option<i64>,

    /// Impact, Arial, Comic Sans MS, Georgia, Courier New or Verdana.
    #[arg(long)]
    font: Option<FontFamily>,

    /// Fill color, `#rrggbb`.
    #[arg(long)]
    fill: Option<Rgb8>,

    /// Outline color, `#rrggbb`.
    #[arg(long)]
    stroke: Option<Rgb8>,

    /// Outline width in pixels (1..=10).
    #[arg(long, allow_negative_numbers = true)]
    stroke_width: Option<i64>,

    /// Horizontal anchor, percent of width.
    #[arg(long = "h-pos", allow_negative_numbers = true)]
    horizontal: Option<f64>,

    /// Vertical anchor, percent of height.
    #[arg(long = "v-pos", allow_negative_numbers = true)]
    vertical: Option<f64>,

    /// left, center or right.
    #[arg(long)]
    align: Option<TextAlign>,
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Font file used for every family without its own face.
    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Directory scanned for family font files.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Source image: file path, `data:` URI or http(s) URL.
    #[arg(long)]
    image: String,

    /// Output path; the extension picks PNG or JPEG.
    #[arg(long, default_value = export::DEFAULT_EXPORT_FILE_NAME)]
    out: PathBuf,

    /// Force an output format instead of inferring it.
    #[arg(long)]
    format: Option<ExportFormat>,

    #[command(flatten)]
    fonts: FontArgs,

    #[command(flatten)]
    text: TextArgs,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Canvas width in pixels.
    #[arg(long)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long)]
    height: u32,

    #[command(flatten)]
    text: TextArgs,
}

#[derive(Parser, Debug)]
struct DataUriArgs {
    /// Source image: file path, `data:` URI or http(s) URL.
    #[arg(long)]
    image: String,

    #[command(flatten)]
    fonts: FontArgs,

    #[command(flatten)]
    text: TextArgs,
}

#[cfg(feature = "remote")]
#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Theme, e.g. "office humor".
    #[arg(long)]
    theme: String,

    /// Also composite the caption over the generated image and write it here.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    fonts: FontArgs,

    #[command(flatten)]
    text: TextArgs,
}

#[cfg(feature = "remote")]
#[derive(Parser, Debug)]
struct ShareArgs {
    /// Source image: file path, `data:` URI or http(s) URL.
    #[arg(long)]
    image: String,

    /// Theme tag; defaults to "custom".
    #[arg(long)]
    theme: Option<String>,

    /// Author name; defaults to "Anonymous".
    #[arg(long)]
    creator: Option<String>,

    #[command(flatten)]
    fonts: FontArgs,

    #[command(flatten)]
    text: TextArgs,
}

#[cfg(feature = "remote")]
#[derive(Parser, Debug)]
struct FeedArgs {
    /// Only memes with this theme (case-insensitive).
    #[arg(long)]
    theme: Option<String>,
}

#[cfg(feature = "remote")]
#[derive(Parser, Debug)]
struct VoteArgs {
    /// Meme id from the feed.
    id: String,

    /// like or dislike.
    vote: memeframe::remote::VoteType,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;
    match cli.cmd {
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Layout(args) => cmd_layout(&cfg, args),
        Command::DataUri(args) => cmd_data_uri(&cfg, args),
        #[cfg(feature = "remote")]
        Command::Generate(args) => remote_cmd::generate(&cfg, args),
        #[cfg(feature = "remote")]
        Command::Share(args) => remote_cmd::share(&cfg, args),
        #[cfg(feature = "remote")]
        Command::Feed(args) => remote_cmd::feed(&cfg, args),
        #[cfg(feature = "remote")]
        Command::Vote(args) => remote_cmd::vote(&cfg, args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MEMEFRAME_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl TextArgs {
    fn resolve(&self, defaults: &TextLayerParams) -> anyhow::Result<TextLayerParams> {
        let mut p = match &self.params {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("read params '{}'", path.display()))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("parse params '{}'", path.display()))?
            }
            None => defaults.clone(),
        };
        if let Some(text) = &self.text {
            p = p.with_content(text.replace("\\n", "\n"));
        }
        if let Some(size) = self.font_size {
            p = p.with_font_size_px(clamp_flag(size));
        }
        if let Some(font) = self.font {
            p = p.with_font_family(font);
        }
        if let Some(fill) = self.fill {
            p = p.with_fill_color(fill);
        }
        if let Some(stroke) = self.stroke {
            p = p.with_stroke_color(stroke);
        }
        if let Some(width) = self.stroke_width {
            p = p.with_stroke_width_px(clamp_flag(width));
        }
        if let Some(h) = self.horizontal {
            p = p.with_horizontal_pos(h);
        }
        if let Some(v) = self.vertical {
            p = p.with_vertical_pos(v);
        }
        if let Some(align) = self.align {
            p = p.with_text_align(align);
        }
        Ok(p)
    }
}

/// Negative flag values clamp like any other out-of-range input.
fn clamp_flag(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}

impl FontArgs {
    fn font_book(&self, cfg: &AppConfig) -> anyhow::Result<FontBook> {
        let mut fonts = cfg.fonts.clone();
        if let Some(dir) = &self.font_dir {
            fonts.dir = Some(dir.clone());
        }
        if let Some(file) = &self.font_file {
            fonts.fallback = Some(file.clone());
        }
        let book = fonts.font_book()?;
        if !book.has_fallback() && FontFamily::ALL.iter().all(|f| !book.has_family(*f)) {
            anyhow::bail!(
                "no fonts configured; pass --font-file, --font-dir or set MEMEFRAME_FONT_DIR"
            );
        }
        Ok(book)
    }
}

#[cfg(feature = "remote")]
fn image_fetcher(cfg: &AppConfig) -> anyhow::Result<Option<Box<dyn ImageFetcher>>> {
    Ok(Some(Box::new(memeframe::remote::HttpMemeBackend::new(
        &cfg.api_base,
    )?)))
}

#[cfg(not(feature = "remote"))]
fn image_fetcher(_cfg: &AppConfig) -> anyhow::Result<Option<Box<dyn ImageFetcher>>> {
    Ok(None)
}

fn composed_session(
    cfg: &AppConfig,
    image: &str,
    fonts: &FontArgs,
    text: &TextArgs,
) -> anyhow::Result<EditorSession> {
    let params = text.resolve(&cfg.defaults)?;
    let mut session = EditorSession::cpu(fonts.font_book(cfg)?, params);
    let fetcher = image_fetcher(cfg)?;
    let origin = SourceOrigin::parse(image);
    session
        .load(&origin, fetcher.as_deref())
        .with_context(|| format!("load image {origin:?}"))?;
    Ok(session)
}

fn write_output(session: &EditorSession, out: &Path, format: ExportFormat) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let bytes = session.export(format)?;
    std::fs::write(out, bytes).with_context(|| format!("write '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_render(cfg: &AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let session = composed_session(cfg, &args.image, &args.fonts, &args.text)?;
    let format = args
        .format
        .unwrap_or_else(|| ExportFormat::from_path(&args.out));
    write_output(&session, &args.out, format)
}

fn cmd_layout(cfg: &AppConfig, args: LayoutArgs) -> anyhow::Result<()> {
    let canvas = Canvas::new(args.width, args.height)?;
    let params = args.text.resolve(&cfg.defaults)?;
    let layout = layout_text_block(canvas, &params);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn cmd_data_uri(cfg: &AppConfig, args: DataUriArgs) -> anyhow::Result<()> {
    let session = composed_session(cfg, &args.image, &args.fonts, &args.text)?;
    println!("{}", session.data_uri()?);
    Ok(())
}

#[cfg(feature = "remote")]
mod remote_cmd {
    use anyhow::Context as _;
    use memeframe::remote::{HttpMemeBackend, MemeBackend};
    use memeframe::{AppConfig, ExportFormat};

    use super::{FeedArgs, GenerateArgs, ShareArgs, VoteArgs, composed_session, write_output};

    pub(super) fn generate(cfg: &AppConfig, args: GenerateArgs) -> anyhow::Result<()> {
        let backend = HttpMemeBackend::new(&cfg.api_base)?;
        let (text, image_url) = backend.generate_meme(&args.theme)?;
        println!("{text}");
        println!("{image_url}");

        if let Some(out) = &args.out {
            let mut session = composed_session(cfg, &image_url, &args.fonts, &args.text)?;
            if args.text.text.is_none() {
                session.apply_generated_text(&text)?;
            }
            write_output(&session, out, ExportFormat::from_path(out))?;
        }
        Ok(())
    }

    pub(super) fn share(cfg: &AppConfig, args: ShareArgs) -> anyhow::Result<()> {
        let backend = HttpMemeBackend::new(&cfg.api_base)?;
        let session = composed_session(cfg, &args.image, &args.fonts, &args.text)?;
        let request = session.publish_request(args.theme.as_deref(), args.creator.as_deref())?;
        let resp = backend.publish(&request).context("publish meme")?;
        println!(
            "{}",
            resp.message
                .unwrap_or_else(|| "Meme shared successfully".to_owned())
        );
        Ok(())
    }

    pub(super) fn feed(cfg: &AppConfig, args: FeedArgs) -> anyhow::Result<()> {
        let backend = HttpMemeBackend::new(&cfg.api_base)?;
        let memes = backend.feed(args.theme.as_deref())?;
        println!("{}", serde_json::to_string_pretty(&memes)?);
        Ok(())
    }

    pub(super) fn vote(cfg: &AppConfig, args: VoteArgs) -> anyhow::Result<()> {
        let backend = HttpMemeBackend::new(&cfg.api_base)?;
        let resp = backend.vote(&args.id, args.vote)?;
        match (resp.likes, resp.dislikes) {
            (Some(l), Some(d)) => println!("likes: {l}, dislikes: {d}"),
            (Some(l), None) => println!("likes: {l}"),
            _ => println!("{} recorded", args.vote),
        }
        Ok(())
    }
}
