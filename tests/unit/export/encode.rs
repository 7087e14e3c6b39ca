use super::*;

fn output(w: u32, h: u32, px: [u8; 4]) -> CompositedOutput {
    CompositedOutput {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
    }
}

#[test]
fn png_decodes_back_to_same_size_and_pixels() {
    let out = output(7, 5, [200, 10, 30, 255]);
    let png = encode(&out, ExportFormat::Png).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (7, 5));
    assert_eq!(back.get_pixel(6, 4).0, [200, 10, 30, 255]);
}

#[test]
fn png_export_unpremultiplies() {
    let out = output(1, 1, [64, 0, 0, 128]);
    let png = encode(&out, ExportFormat::Png).unwrap();
    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back.get_pixel(0, 0).0, [128, 0, 0, 128]);
}

#[test]
fn jpeg_export_has_jpeg_magic() {
    let out = output(16, 16, [0, 0, 255, 255]);
    let jpg = encode(&out, ExportFormat::jpeg()).unwrap();
    assert_eq!(&jpg[..2], &[0xFF, 0xD8]);
    let back = image::load_from_memory(&jpg).unwrap();
    assert_eq!((back.width(), back.height()), (16, 16));
}

#[test]
fn data_uri_has_png_prefix_and_valid_base64() {
    let out = output(2, 2, [1, 2, 3, 255]);
    let uri = to_data_uri(&out, ExportFormat::Png).unwrap();
    let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .unwrap();
    assert_eq!(bytes, encode(&out, ExportFormat::Png).unwrap());
}

#[test]
fn truncated_surface_is_export_error() {
    let out = CompositedOutput {
        width: 4,
        height: 4,
        data: vec![0; 10],
    };
    let err = encode(&out, ExportFormat::Png).unwrap_err();
    assert!(matches!(err, MemeError::Export(_)));
}

#[test]
fn format_follows_extension() {
    assert_eq!(ExportFormat::from_path(Path::new("a/meme.png")), ExportFormat::Png);
    assert_eq!(ExportFormat::from_path(Path::new("x.JPG")), ExportFormat::jpeg());
    assert_eq!(ExportFormat::from_path(Path::new("noext")), ExportFormat::Png);
    assert!("gif".parse::<ExportFormat>().is_err());
}

#[test]
fn save_writes_file_and_reports_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_EXPORT_FILE_NAME);
    let fmt = save(&output(3, 3, [9, 9, 9, 255]), &path).unwrap();
    assert_eq!(fmt, ExportFormat::Png);
    let back = image::open(&path).unwrap();
    assert_eq!((back.width(), back.height()), (3, 3));
}

#[test]
fn save_into_missing_dir_is_export_error() {
    let err = save(&output(1, 1, [0, 0, 0, 255]), Path::new("no/such/dir/meme.png")).unwrap_err();
    assert!(matches!(err, MemeError::Export(_)));
}
