use super::*;
use crate::layout::viewport::{ViewportInputs, plan_viewport};
use crate::record::model::MarkerKind;
use crate::record::parse::parse_sgf;
use crate::render::board_image::draw_board_background;

fn small(mut s: RenderSettings) -> RenderSettings {
    s.max_width = 180;
    s.max_height = 180;
    s
}

fn interpreter<'a>(
    settings: &'a RenderSettings,
    graphics: &'a GraphicsCache,
    nodes: &[RecordNode],
) -> CommandInterpreter<'a> {
    let vp = plan_viewport(nodes, (9, 9), settings, ViewportInputs::default()).unwrap();
    let cells = graphics
        .get_or_build(&settings.style, vp.draw_cell_size)
        .unwrap();
    let bg = draw_board_background(&vp, &settings.style, cells.star_point());
    let layers = LayerCompositor::new(vp, bg, settings.label_text_scale);
    let board = BoardState::new(9, 9).with_self_capture(settings.allow_self_capture);
    CommandInterpreter::new(settings, graphics, cells, board, layers)
}

fn center_pixel(interp: &CommandInterpreter<'_>, p: Point) -> [u8; 4] {
    let (x, y) = interp.layers().viewport().center_px(p);
    interp.layers().compose().get_pixel(x as u32, y as u32).0
}

#[test]
fn setup_places_stones_and_numbering_starts_at_one() {
    let settings = small(RenderSettings::for_static_diagram());
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[aa]AW[ba];B[cc])").unwrap();
    let mut interp = interpreter(&settings, &graphics, &nodes);

    interp.apply_setup(&nodes[0]).unwrap();
    assert_eq!(interp.board().get(Point::new(0, 0)), Some(Player::Black));
    assert_eq!(interp.board().get(Point::new(1, 0)), Some(Player::White));
    assert_eq!(interp.move_number(), 1);

    let out = interp.apply_turn(&nodes[1]).unwrap();
    assert_eq!(out, NodeOutcome::default());
    assert_eq!(interp.move_number(), 2);
    assert_eq!(
        interp.layers().annotation_at(Point::new(2, 2)),
        Some(&AnnotationKind::MoveNumber(Player::Black))
    );
}

#[test]
fn animated_moves_schedule_a_transient() {
    let settings = small(RenderSettings::for_animated_diagram());
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[aa];W[cc])").unwrap();
    let mut interp = interpreter(&settings, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();

    let out = interp.apply_turn(&nodes[1]).unwrap();
    assert_eq!(out.transient, Some(Point::new(2, 2)));
    assert!(!out.passed);
}

#[test]
fn move_number_override_applies_before_the_move() {
    let settings = small(RenderSettings::for_static_diagram());
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[aa];B[cc]MN[50])").unwrap();
    let mut interp = interpreter(&settings, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();
    interp.apply_turn(&nodes[1]).unwrap();
    assert_eq!(interp.move_number(), 51);
}

#[test]
fn pass_is_signalled_without_numbering() {
    let settings = small(RenderSettings::for_static_diagram());
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[aa];W[])").unwrap();
    let mut interp = interpreter(&settings, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();
    let out = interp.apply_turn(&nodes[1]).unwrap();
    assert!(out.passed);
    assert_eq!(interp.move_number(), 1);
}

#[test]
fn rejected_move_draws_nothing_but_consumes_a_number() {
    let settings = small(RenderSettings::for_static_diagram());
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[aa][cc];W[cc])").unwrap();
    let mut interp = interpreter(&settings, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();
    let before = interp.layers().compose();
    interp.apply_turn(&nodes[1]).unwrap();
    assert_eq!(interp.layers().compose(), before);
    assert_eq!(interp.board().get(Point::new(2, 2)), Some(Player::Black));
    assert_eq!(interp.move_number(), 2);
}

#[test]
fn captured_stones_are_erased_only_when_enabled() {
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[aa]AW[ba];W[ab])").unwrap();
    let corner = Point::new(0, 0);

    let mut on = small(RenderSettings::for_static_diagram());
    on.show_stone_numbers = false;
    on.render_captures = true;
    let mut interp = interpreter(&on, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();
    let stone_px = center_pixel(&interp, corner);
    interp.apply_turn(&nodes[1]).unwrap();
    assert_eq!(interp.board().get(corner), None);
    assert_eq!(center_pixel(&interp, corner), on.style.line_color.to_rgba().0);

    let mut off = on.clone();
    off.render_captures = false;
    let mut interp = interpreter(&off, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();
    interp.apply_turn(&nodes[1]).unwrap();
    assert_eq!(interp.board().get(corner), None);
    assert_eq!(center_pixel(&interp, corner), stone_px);
}

#[test]
fn parameterless_dim_clears_every_dimmed_cell() {
    let settings = small(RenderSettings::for_static_diagram());
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[ee]DD[aa][bb]TR[cc];DD[])").unwrap();
    let mut interp = interpreter(&settings, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();
    let dim = AnnotationKind::Marker(MarkerKind::Dim);
    assert_eq!(interp.layers().annotation_at(Point::new(1, 1)), Some(&dim));

    interp.apply_turn(&nodes[1]).unwrap();
    assert_eq!(interp.layers().annotation_at(Point::new(0, 0)), None);
    assert_eq!(interp.layers().annotation_at(Point::new(1, 1)), None);
    assert_eq!(
        interp.layers().annotation_at(Point::new(2, 2)),
        Some(&AnnotationKind::Marker(MarkerKind::Triangle))
    );
}

#[test]
fn labels_and_lines_are_drawn() {
    let settings = small(RenderSettings::for_static_diagram());
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[aa];LB[cc:A]LN[dd:fd]AR[dd:df])").unwrap();
    let mut interp = interpreter(&settings, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();
    assert!(!interp.layers().has_lines_layer());

    interp.apply_turn(&nodes[1]).unwrap();
    assert_eq!(
        interp.layers().annotation_at(Point::new(2, 2)),
        Some(&AnnotationKind::Label("A".into()))
    );
    assert!(interp.layers().has_lines_layer());
    let mid = center_pixel(&interp, Point::new(4, 3));
    assert_eq!(mid, settings.style.annotate_line_color.to_rgba().0);
}

#[test]
fn malformed_move_number_is_a_record_error() {
    let settings = small(RenderSettings::for_static_diagram());
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[aa];MN[x]B[bb])").unwrap();
    let mut interp = interpreter(&settings, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();
    assert!(interp.apply_turn(&nodes[1]).is_err());
}

#[test]
fn largest_move_number_does_not_overflow() {
    let settings = small(RenderSettings::for_static_diagram());
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[aa];MN[4294967295]B[cc];W[ee])").unwrap();
    let mut interp = interpreter(&settings, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();
    interp.apply_turn(&nodes[1]).unwrap();
    assert_eq!(interp.move_number(), u32::MAX);
    interp.apply_turn(&nodes[2]).unwrap();
    assert_eq!(interp.move_number(), u32::MAX);
    assert_eq!(interp.board().get(Point::new(2, 2)), Some(Player::Black));
}

#[test]
fn tt_move_is_a_pass_on_small_boards() {
    let settings = small(RenderSettings::for_animated_diagram());
    let graphics = GraphicsCache::new();
    let nodes = parse_sgf("(;SZ[9]AB[aa];W[tt])").unwrap();
    let mut interp = interpreter(&settings, &graphics, &nodes);
    interp.apply_setup(&nodes[0]).unwrap();
    let before = interp.layers().compose();
    let out = interp.apply_turn(&nodes[1]).unwrap();
    assert!(out.passed);
    assert_eq!(out.transient, None);
    assert_eq!(interp.move_number(), 1);
    assert_eq!(interp.layers().compose(), before);
}
