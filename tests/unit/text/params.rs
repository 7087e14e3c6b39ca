use super::*;

#[test]
fn defaults_match_editor_initial_state() {
    let p = TextLayerParams::default();
    assert_eq!(p.content(), "Your meme text");
    assert_eq!(p.font_size_px(), 32);
    assert_eq!(p.font_family(), FontFamily::Impact);
    assert_eq!(p.fill_color(), Rgb8::WHITE);
    assert_eq!(p.stroke_color(), Rgb8::BLACK);
    assert_eq!(p.stroke_width_px(), 4);
    assert_eq!(p.horizontal_pos(), 50.0);
    assert_eq!(p.vertical_pos(), 8.0);
    assert_eq!(p.text_align(), TextAlign::Center);
}

#[test]
fn font_size_clamps_to_bounds() {
    let p = TextLayerParams::default();
    assert_eq!(p.clone().with_font_size_px(5).font_size_px(), 10);
    assert_eq!(p.clone().with_font_size_px(500).font_size_px(), 100);
    assert_eq!(p.with_font_size_px(42).font_size_px(), 42);
}

#[test]
fn stroke_and_positions_clamp() {
    let p = TextLayerParams::default()
        .with_stroke_width_px(0)
        .with_horizontal_pos(-12.0)
        .with_vertical_pos(250.0);
    assert_eq!(p.stroke_width_px(), 1);
    assert_eq!(p.horizontal_pos(), 0.0);
    assert_eq!(p.vertical_pos(), 100.0);

    let p = p.with_stroke_width_px(99).with_vertical_pos(f64::NAN);
    assert_eq!(p.stroke_width_px(), 10);
    assert_eq!(p.vertical_pos(), 0.0);
}

#[test]
fn with_methods_leave_previous_value_untouched() {
    let before = TextLayerParams::with_text("A");
    let after = before.clone().with_content("B").with_font_size_px(60);
    assert_eq!(before.content(), "A");
    assert_eq!(before.font_size_px(), 32);
    assert_eq!(after.content(), "B");
}

#[test]
fn line_height_is_one_and_a_half_font_size() {
    assert_eq!(
        TextLayerParams::default()
            .with_font_size_px(40)
            .line_height_px(),
        60.0
    );
}

#[test]
fn font_family_parses_menu_labels() {
    assert_eq!("Comic Sans MS".parse::<FontFamily>().unwrap(), FontFamily::ComicSansMs);
    assert_eq!("comic sans".parse::<FontFamily>().unwrap(), FontFamily::ComicSansMs);
    assert_eq!("Courier".parse::<FontFamily>().unwrap(), FontFamily::CourierNew);
    assert_eq!("IMPACT".parse::<FontFamily>().unwrap(), FontFamily::Impact);
    assert!("Wingdings".parse::<FontFamily>().is_err());
    for family in FontFamily::ALL {
        assert_eq!(family.css_name().parse::<FontFamily>().unwrap(), family);
    }
}

#[test]
fn text_align_parses() {
    assert_eq!("left".parse::<TextAlign>().unwrap(), TextAlign::Left);
    assert_eq!(" Center ".parse::<TextAlign>().unwrap(), TextAlign::Center);
    assert_eq!("RIGHT".parse::<TextAlign>().unwrap(), TextAlign::Right);
    assert!("justify".parse::<TextAlign>().is_err());
}

#[test]
fn deserialize_clamps_and_fills_defaults() {
    let json = r##"{
        "content": "TOP\nTEXT",
        "fontSizePx": 500,
        "fontFamily": "Comic Sans MS",
        "strokeWidthPx": -3,
        "verticalPos": 140.5,
        "fillColor": "#ff0000",
        "textAlign": "left"
    }"##;
    let p: TextLayerParams = serde_json::from_str(json).unwrap();
    assert_eq!(p.content(), "TOP\nTEXT");
    assert_eq!(p.font_size_px(), 100);
    assert_eq!(p.font_family(), FontFamily::ComicSansMs);
    assert_eq!(p.stroke_width_px(), 1);
    assert_eq!(p.vertical_pos(), 100.0);
    assert_eq!(p.horizontal_pos(), 50.0);
    assert_eq!(p.fill_color(), Rgb8::new(255, 0, 0));
    assert_eq!(p.stroke_color(), Rgb8::BLACK);
    assert_eq!(p.text_align(), TextAlign::Left);
}

#[test]
fn serialize_uses_camel_case_and_display_names() {
    let v = serde_json::to_value(TextLayerParams::default().with_font_family(FontFamily::CourierNew))
        .unwrap();
    assert_eq!(v["fontFamily"], "Courier New");
    assert_eq!(v["fillColor"], "#ffffff");
    assert_eq!(v["textAlign"], "center");
    assert_eq!(v["fontSizePx"], 32);
}
