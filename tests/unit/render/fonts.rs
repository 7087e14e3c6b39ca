use super::*;

#[test]
fn resolve_prefers_family_face_over_fallback() {
    let mut book = FontBook::with_fallback(vec![1, 2, 3]);
    book.register(FontFamily::Impact, vec![9]);

    let impact = book.resolve(FontFamily::Impact).unwrap();
    assert!(!impact.is_fallback);
    assert_eq!(impact.bytes.as_slice(), &[9]);

    let arial = book.resolve(FontFamily::Arial).unwrap();
    assert!(arial.is_fallback);
    assert_eq!(arial.bytes.as_slice(), &[1, 2, 3]);
}

#[test]
fn resolve_without_any_face_is_validation_error() {
    let err = FontBook::new().resolve(FontFamily::Georgia).unwrap_err();
    assert!(matches!(err, MemeError::Validation(_)));
    assert!(err.to_string().contains("Georgia"));
}

#[test]
fn scan_dir_matches_conventional_names() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Impact.ttf"), b"impact").unwrap();
    std::fs::write(dir.path().join("Comic Sans MS.ttf"), b"comic").unwrap();
    std::fs::write(dir.path().join("cour.otf"), b"courier").unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"nope").unwrap();

    let mut book = FontBook::new();
    let found = book.scan_dir(dir.path()).unwrap();
    assert_eq!(found, 3);
    assert!(book.has_family(FontFamily::Impact));
    assert!(book.has_family(FontFamily::ComicSansMs));
    assert!(book.has_family(FontFamily::CourierNew));
    assert!(!book.has_family(FontFamily::Verdana));
    assert_eq!(
        book.resolve(FontFamily::ComicSansMs).unwrap().bytes.as_slice(),
        b"comic"
    );
}

#[test]
fn scan_missing_dir_errors() {
    let mut book = FontBook::new();
    assert!(book.scan_dir(Path::new("no/such/font/dir")).is_err());
}
