use std::io::Cursor;

use base64::Engine as _;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!(prepared.width(), 3);
    assert_eq!(prepared.height(), 2);
    assert_eq!(prepared.rgba8_premul().len(), 3 * 2 * 4);
    assert_eq!(
        &prepared.rgba8_premul()[..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn corrupt_and_empty_bytes_are_decode_errors() {
    assert!(matches!(decode_image(b""), Err(MemeError::Decode(_))));
    assert!(matches!(
        decode_image(b"\x89PNG\r\n\x1a\nnot really"),
        Err(MemeError::Decode(_))
    ));
}

#[test]
fn missing_file_is_decode_error() {
    let err = decode_image_file(Path::new("does/not/exist.png")).unwrap_err();
    assert!(matches!(err, MemeError::Decode(_)));
}

#[test]
fn data_uri_round_trips_through_base64() {
    let png = png_bytes(2, 2, [255, 0, 0, 255]);
    let uri = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    );
    let img = decode_data_uri(&uri).unwrap();
    assert_eq!((img.width(), img.height()), (2, 2));
    assert_eq!(&img.rgba8_premul()[..4], &[255, 0, 0, 255]);
}

#[test]
fn data_uri_rejects_non_base64_and_missing_prefix() {
    assert!(data_uri_bytes("image/png;base64,AAAA").is_err());
    assert!(data_uri_bytes("data:image/png,rawbytes").is_err());
    assert!(data_uri_bytes("data:image/png;base64").is_err());
    assert!(data_uri_bytes("data:image/png;base64,@@@").is_err());
}

#[test]
fn buffer_size_mismatch_is_rejected() {
    assert!(SourceImage::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(SourceImage::from_premul_rgba8(0, 2, vec![]).is_err());
    assert!(SourceImage::from_premul_rgba8(1, 1, vec![1, 2, 3, 4]).is_ok());
}
