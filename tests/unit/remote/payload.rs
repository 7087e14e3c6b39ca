use super::*;

#[test]
fn publish_request_uses_camel_case_and_defaults() {
    let req = PublishRequest::new("data:image/png;base64,AAAA", "hello", None, Some("  "));
    assert_eq!(req.theme, DEFAULT_THEME);
    assert_eq!(req.creator, DEFAULT_CREATOR);

    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "imageData": "data:image/png;base64,AAAA",
            "text": "hello",
            "theme": "custom",
            "creator": "Anonymous",
        })
    );
}

#[test]
fn publish_request_keeps_given_theme_and_creator() {
    let req = PublishRequest::new("x", "t", Some(" cats "), Some("ada"));
    assert_eq!(req.theme, "cats");
    assert_eq!(req.creator, "ada");
}

#[test]
fn generation_replies_parse() {
    let text: GenerateTextResponse =
        serde_json::from_str(r#"{"success":true,"memeText":"When the build passes"}"#).unwrap();
    assert_eq!(text.meme_text.as_deref(), Some("When the build passes"));

    let image: GenerateImageResponse =
        serde_json::from_str(r#"{"success":false,"message":"quota"}"#).unwrap();
    assert!(!image.success);
    assert_eq!(image.image_url, None);
}

#[test]
fn feed_parses_server_shape() {
    let feed: FeedResponse = serde_json::from_str(
        r#"{"success":true,"memes":[
            {"_id":"a1","imageUrl":"https://i/1.png","text":"hi","theme":"Cats",
             "likes":3,"createdAt":"2024-01-02T03:04:05Z"},
            {"_id":"b2","imageUrl":"https://i/2.png","theme":"dogs","creator":"bo"}
        ]}"#,
    )
    .unwrap();
    assert_eq!(feed.memes.len(), 2);
    assert_eq!(feed.memes[0].id, "a1");
    assert_eq!(feed.memes[0].likes, 3);
    assert_eq!(feed.memes[0].creator_or_default(), DEFAULT_CREATOR);
    assert_eq!(feed.memes[1].creator_or_default(), "bo");
    assert_eq!(feed.memes[1].dislikes, 0);
}

#[test]
fn feed_without_success_flag_is_success() {
    let feed: FeedResponse = serde_json::from_str(r#"{"memes":[]}"#).unwrap();
    assert!(feed.success);
}

#[test]
fn vote_type_wire_and_parse() {
    let body = serde_json::to_string(&VoteRequest {
        vote_type: VoteType::Dislike,
    })
    .unwrap();
    assert_eq!(body, r#"{"voteType":"dislike"}"#);
    assert_eq!("LIKE".parse::<VoteType>().unwrap(), VoteType::Like);
    assert_eq!(VoteType::Like.to_string(), "like");
    assert!("meh".parse::<VoteType>().is_err());
}
