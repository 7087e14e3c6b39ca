use super::*;
use crate::foundation::error::MemeError;

const FONT_PATH: &str = "tests/data/fonts/DejaVuSans.ttf";

#[test]
fn empty_document_is_all_defaults() {
    let cfg = AppConfig::from_json("{}").unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.api_base, DEFAULT_API_BASE);
}

#[test]
fn defaults_section_is_clamped() {
    let cfg = AppConfig::from_json(
        r##"{"defaults":{"content":"hi","fontSizePx":500,"strokeWidthPx":0,
             "fontFamily":"Georgia","fillColor":"#ff0000"}}"##,
    )
    .unwrap();
    assert_eq!(cfg.defaults.content(), "hi");
    assert_eq!(cfg.defaults.font_size_px(), 100);
    assert_eq!(cfg.defaults.stroke_width_px(), 1);
    assert_eq!(cfg.defaults.font_family(), FontFamily::Georgia);
    assert_eq!(cfg.defaults.vertical_pos(), 8.0);
}

#[test]
fn bad_json_is_serde_error() {
    let err = AppConfig::from_json("{ nope").unwrap_err();
    assert!(matches!(err, MemeError::Serde(_)));
    assert!(AppConfig::from_json(r#"{"fonts":{"families":{"Papyrus":"p.ttf"}}}"#).is_err());
}

#[test]
fn env_overrides_apply_and_blank_is_ignored() {
    let mut cfg = AppConfig::default();
    cfg.apply_env_with(|k| match k {
        ENV_API_BASE => Some(" http://localhost:9000/api ".to_owned()),
        ENV_FONT_DIR => Some("/opt/fonts".to_owned()),
        _ => None,
    });
    assert_eq!(cfg.api_base, "http://localhost:9000/api");
    assert_eq!(cfg.fonts.dir.as_deref(), Some(Path::new("/opt/fonts")));

    cfg.apply_env_with(|_| Some("   ".to_owned()));
    assert_eq!(cfg.api_base, "http://localhost:9000/api");
}

#[test]
fn file_paths_resolve_next_to_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("fonts")).unwrap();
    std::fs::copy(FONT_PATH, dir.path().join("fonts/impact.ttf")).unwrap();
    let cfg_path = dir.path().join("memeframe.json");
    std::fs::write(
        &cfg_path,
        r#"{"fonts":{"fallback":"fonts/impact.ttf","families":{"Impact":"fonts/impact.ttf"}}}"#,
    )
    .unwrap();

    let cfg = AppConfig::from_file(&cfg_path).unwrap();
    assert_eq!(
        cfg.fonts.fallback.as_deref(),
        Some(dir.path().join("fonts/impact.ttf").as_path())
    );
    let book = cfg.fonts.font_book().unwrap();
    assert!(book.has_family(FontFamily::Impact));
    assert!(book.has_fallback());
    assert!(!book.resolve(FontFamily::Impact).unwrap().is_fallback);
}

#[test]
fn font_dir_is_scanned() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(FONT_PATH, dir.path().join("Verdana.ttf")).unwrap();
    let fonts = FontConfig {
        dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let book = fonts.font_book().unwrap();
    assert!(book.has_family(FontFamily::Verdana));
    assert!(!book.has_fallback());
}

#[test]
fn missing_config_file_errors() {
    assert!(AppConfig::from_file(Path::new("no/such/memeframe.json")).is_err());
}
