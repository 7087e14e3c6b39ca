use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::render::backend::{DrawCall, RecordingCanvas};

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn session() -> EditorSession<RecordingCanvas> {
    EditorSession::new(RecordingCanvas::new(), TextLayerParams::default())
}

fn last_fill_texts(s: &EditorSession<RecordingCanvas>) -> Vec<String> {
    s.canvas()
        .calls()
        .iter()
        .filter_map(|c| match c {
            DrawCall::FillText { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn render_without_source_is_no_source() {
    let mut s = session();
    assert!(matches!(s.render().unwrap_err(), MemeError::NoSource));
    assert!(matches!(s.export(ExportFormat::Png).unwrap_err(), MemeError::NoSource));
    assert!(s.set_params(TextLayerParams::with_text("x")).unwrap().is_none());
}

#[test]
fn load_renders_at_source_size() {
    let mut s = session();
    let out = s
        .load(&SourceOrigin::Bytes(png(30, 20, [1, 2, 3, 255])), None)
        .unwrap();
    assert_eq!((out.width, out.height), (30, 20));
    assert_eq!(s.source().map(|i| i.width()), Some(30));
}

#[test]
fn param_change_rerenders_and_notifies() {
    let mut s = session();
    let renders = Rc::new(Cell::new(0));
    let seen = Rc::clone(&renders);
    s.on_render(move |_| seen.set(seen.get() + 1));

    s.load(&SourceOrigin::Bytes(png(10, 10, [0, 0, 0, 255])), None)
        .unwrap();
    assert_eq!(renders.get(), 1);

    let out = s.update(|p| p.with_content("new caption")).unwrap();
    assert!(out.is_some());
    assert_eq!(renders.get(), 2);
    assert_eq!(s.params().content(), "new caption");
}

#[test]
fn stale_completion_is_ignored() {
    let mut s = session();
    let first = s.begin_load();
    let second = s.begin_load();

    let applied = s
        .finish_load_with(second, || {
            crate::source::image::decode_image(&png(8, 8, [9, 9, 9, 255]))
        })
        .unwrap();
    assert!(applied);

    let decoded_stale = Cell::new(false);
    let applied = s
        .finish_load_with(first, || {
            decoded_stale.set(true);
            crate::source::image::decode_image(&png(99, 99, [0, 0, 0, 255]))
        })
        .unwrap();
    assert!(!applied);
    assert!(!decoded_stale.get());
    assert_eq!(s.output().map(|o| o.width), Some(8));
}

#[test]
fn decode_failure_keeps_previous_output() {
    let mut s = session();
    s.load(&SourceOrigin::Bytes(png(12, 6, [50, 50, 50, 255])), None)
        .unwrap();
    let before = s.output().cloned();

    let err = s
        .load(&SourceOrigin::Bytes(b"garbage".to_vec()), None)
        .unwrap_err();
    assert!(err.is_decode());
    assert_eq!(s.output().cloned(), before);
    assert_eq!(s.source().map(|i| i.width()), Some(12));
}

#[test]
fn reset_restores_defaults_and_supersedes_pending_decode() {
    let defaults = TextLayerParams::with_text("default");
    let mut s = EditorSession::new(RecordingCanvas::new(), defaults.clone());
    s.load(&SourceOrigin::Bytes(png(4, 4, [0, 0, 0, 255])), None)
        .unwrap();
    s.update(|p| p.with_content("edited")).unwrap();

    let pending = s.begin_load();
    s.reset();
    assert_eq!(s.params(), &defaults);
    assert!(s.output().is_none());
    assert!(s.source().is_none());

    let applied = s
        .finish_load(pending, &SourceOrigin::Bytes(png(4, 4, [0, 0, 0, 255])), None)
        .unwrap();
    assert!(!applied);
    assert!(s.source().is_none());
}

#[test]
fn generated_text_becomes_content() {
    let mut s = session();
    s.load(&SourceOrigin::Bytes(png(40, 40, [0, 0, 0, 255])), None)
        .unwrap();
    s.apply_generated_text("line one\nline two").unwrap();
    let fills = last_fill_texts(&s);
    assert_eq!(fills, ["line one", "line two"]);
}

#[test]
fn failed_render_does_not_commit_the_new_source() {
    let mut s = EditorSession::cpu(
        crate::render::fonts::FontBook::new(),
        TextLayerParams::default(),
    );
    let renders = Rc::new(Cell::new(0));
    let seen = Rc::clone(&renders);
    s.on_render(move |_| seen.set(seen.get() + 1));

    let err = s
        .load(&SourceOrigin::Bytes(png(6, 6, [0, 0, 0, 255])), None)
        .unwrap_err();
    assert!(matches!(err, MemeError::Validation(_)));
    assert!(s.source().is_none());
    assert!(s.output().is_none());
    assert_eq!(renders.get(), 0);
    assert!(matches!(s.render().unwrap_err(), MemeError::NoSource));
}

#[test]
fn publish_request_carries_png_data_uri_and_defaults() {
    let mut s = session();
    s.load(&SourceOrigin::Bytes(png(5, 5, [200, 0, 0, 255])), None)
        .unwrap();
    let req = s.publish_request(None, None).unwrap();
    assert!(req.image_data.starts_with("data:image/png;base64,"));
    assert_eq!(req.text, TextLayerParams::default().content());
    assert_eq!(req.theme, "custom");
    assert_eq!(req.creator, "Anonymous");
}
