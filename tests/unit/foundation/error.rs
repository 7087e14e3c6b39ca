use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(MemeError::decode("x").to_string().contains("decode error:"));
    assert!(MemeError::export("x").to_string().contains("export error:"));
    assert!(
        MemeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(MemeError::remote("x").to_string().contains("remote error:"));
    assert!(
        MemeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert_eq!(MemeError::NoSource.to_string(), "no source image available");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MemeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn decode_classification_covers_missing_source() {
    assert!(MemeError::decode("bad png").is_decode());
    assert!(MemeError::NoSource.is_decode());
    assert!(!MemeError::export("x").is_decode());
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err = serde_json::from_str::<u32>("nope").unwrap_err();
    assert!(matches!(MemeError::from(err), MemeError::Serde(_)));
}
