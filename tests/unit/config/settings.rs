use super::*;

#[test]
fn presets_match_diagram_behaviors() {
    let s = RenderSettings::for_static_diagram();
    assert!(s.maintain_stone_numbers);
    assert!(!s.render_captures);
    assert!(!s.marker_instead_of_numbers);

    let a = RenderSettings::for_animated_diagram();
    assert!(!a.maintain_stone_numbers);
    assert!(a.maintain_numbers_at_end);
    assert!(a.marker_instead_of_numbers);
    assert!(a.render_captures);

    let g = RenderSettings::for_animated_game();
    assert!(!g.maintain_numbers_at_end);
    assert!(!g.allow_self_capture);
}

#[test]
fn partial_json_takes_defaults() {
    let s = RenderSettings::from_json_str(
        r##"{ "max_width": 400, "style": { "marker_color": "#1d7fa4" } }"##,
    )
    .unwrap();
    assert_eq!(s.max_width, 400);
    assert_eq!(s.max_height, 1000);
    assert_eq!(s.style.marker_color, Rgb8::new(29, 127, 164));
    assert_eq!(s.style.line_color, Style::main().line_color);
}

#[test]
fn invalid_cell_range_is_rejected() {
    let err = RenderSettings::from_json_str(r#"{ "min_cell_size": 40, "max_cell_size": 20 }"#)
        .unwrap_err();
    assert!(err.to_string().contains("record error:"));
}

#[test]
fn style_key_tracks_visual_fields() {
    let a = Style::main();
    let mut b = Style::main();
    assert_eq!(a.key(), b.key());
    b.marker_color = Rgb8::new(1, 2, 3);
    assert_ne!(a.key(), b.key());
    assert_ne!(Style::main().key(), Style::frost().key());
}

#[test]
fn settings_round_trip_through_json() {
    let s = RenderSettings::for_animated_game();
    let text = serde_json::to_string(&s).unwrap();
    assert!(text.contains("\"#f3b06d\""));
    assert_eq!(RenderSettings::from_json_str(&text).unwrap(), s);
}

#[test]
fn line_widths_grow_with_cell_size() {
    let s = RenderSettings::default();
    assert_eq!(s.board_line_width(20), 1);
    assert_eq!(s.board_line_width(100), 4);
    assert_eq!(s.annotate_line_width(100), 11);
}

#[test]
fn pixel_budget_is_capped() {
    let err = RenderSettings::from_json_str(r#"{ "max_width": 4294967295 }"#).unwrap_err();
    assert!(err.to_string().contains("exceed"));
    let ok = RenderSettings::from_json_str(&format!(r#"{{ "max_height": {MAX_IMAGE_SIDE} }}"#));
    assert!(ok.is_ok());
}
