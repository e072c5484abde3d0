use super::*;

#[test]
fn get_or_build_returns_the_same_graphics() {
    let cache = GraphicsCache::new();
    let style = Style::main();
    let a = cache.get_or_build(&style, 24).unwrap();
    let b = cache.get_or_build(&style, 24).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.cell_set_count(), 1);
    assert_eq!(a.size(), 24);
}

#[test]
fn sizes_and_styles_are_cached_separately_and_invalidated_per_style() {
    let cache = GraphicsCache::new();
    let main = Style::main();
    let frost = Style::frost();
    cache.get_or_build(&main, 16).unwrap();
    cache.get_or_build(&main, 17).unwrap();
    cache.get_or_build(&frost, 16).unwrap();
    assert_eq!(cache.cell_set_count(), 3);

    cache.invalidate(&main);
    assert_eq!(cache.cell_set_count(), 1);
    cache.get_or_build(&main, 16).unwrap();
    assert_eq!(cache.cell_set_count(), 2);
}

#[test]
fn stones_fill_the_centre_and_leave_corners_clear() {
    let cache = GraphicsCache::new();
    let g = cache.get_or_build(&Style::main(), 40).unwrap();
    for player in [Player::Black, Player::White] {
        let img = g.stone(player);
        assert_eq!(img.dimensions(), (40, 40));
        assert_eq!(img.get_pixel(20, 20).0[3], 255);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }
    let black = g.stone(Player::Black).get_pixel(30, 30).0;
    let white = g.stone(Player::White).get_pixel(30, 30).0;
    assert!(black[0] < white[0]);
}

#[test]
fn markers_use_the_marker_color() {
    let style = Style::main();
    let cache = GraphicsCache::new();
    let g = cache.get_or_build(&style, 50).unwrap();
    let select = g.marker(MarkerKind::Select).get_pixel(25, 25).0;
    let c = style.marker_color;
    assert_eq!(select, [c.r, c.g, c.b, 255]);
    assert_eq!(g.marker(MarkerKind::Circle).get_pixel(25, 25).0[3], 0);

    let dim = g.marker(MarkerKind::Dim).get_pixel(0, 0).0;
    assert!(dim[3] > 100 && dim[3] < 255);
}

#[test]
fn text_is_memoized_and_sized_to_the_cell() {
    let cache = GraphicsCache::new();
    let style = Style::main();
    let a = cache
        .text(&style, "12", style.number_color_for_white, 0.7, 30)
        .unwrap();
    let b = cache
        .text(&style, "12", style.number_color_for_white, 0.7, 30)
        .unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.dimensions(), (30, 30));
    if cache.font_face_count() > 0 {
        assert!(a.pixels().any(|p| p.0[3] > 0));
        assert_eq!(a.get_pixel(0, 0).0[3], 0);
    }
}

#[test]
fn zero_size_is_rejected() {
    let cache = GraphicsCache::new();
    assert!(matches!(
        cache.get_or_build(&Style::main(), 0),
        Err(GobanError::Render(_))
    ));
}

#[test]
fn export_png_writes_every_graphic() {
    let dir = std::env::temp_dir().join(format!("goban-anim-graphics-{}", std::process::id()));
    let cache = GraphicsCache::new();
    let written = cache.export_png(&Style::main(), 20, &dir).unwrap();
    assert_eq!(written.len(), 4 + MarkerKind::ALL.len());
    for path in &written {
        let img = image::open(path).unwrap();
        assert_eq!((img.width(), img.height()), (20, 20));
    }
    let _ = std::fs::remove_dir_all(&dir);
}
