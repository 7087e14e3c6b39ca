use super::*;

#[test]
fn endpoints_append_to_base_path() {
    let b = HttpMemeBackend::new("https://example.test/api").unwrap();
    assert_eq!(
        b.endpoint(&["meme", "text"]).unwrap().as_str(),
        "https://example.test/api/meme/text"
    );

    let b = HttpMemeBackend::new("https://example.test/api/").unwrap();
    assert_eq!(
        b.endpoint(&["meme"]).unwrap().as_str(),
        "https://example.test/api/meme"
    );
}

#[test]
fn meme_ids_are_percent_encoded() {
    let b = HttpMemeBackend::new(crate::remote::payload::DEFAULT_API_BASE).unwrap();
    let url = b.endpoint(&["meme", "a/b c", "vote"]).unwrap();
    assert!(url.as_str().ends_with("/api/meme/a%2Fb%20c/vote"));
}

#[test]
fn invalid_base_is_validation_error() {
    let err = HttpMemeBackend::new("not a url").unwrap_err();
    assert!(matches!(err, MemeError::Validation(_)));
    assert!(HttpMemeBackend::new("mailto:someone@example.test").is_err());
}

#[test]
fn unsuccessful_reply_maps_to_remote_error() {
    assert!(ensure_success(true, None, "vote").is_ok());
    let err = ensure_success(false, Some("already voted"), "vote").unwrap_err();
    assert!(matches!(err, MemeError::Remote(_)));
    assert!(err.to_string().contains("already voted"));
    let err = ensure_success(false, Some(""), "publish").unwrap_err();
    assert_eq!(err.to_string(), "remote error: publish failed");
}
