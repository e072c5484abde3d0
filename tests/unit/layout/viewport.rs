use super::*;
use crate::record::model::Command;

fn nodes_with(points: &[&str]) -> Vec<RecordNode> {
    vec![
        RecordNode::new(vec![Command::new("SZ", ["19"])]),
        RecordNode::new(vec![Command::new("AB", points.to_vec())]),
    ]
}

fn settings() -> RenderSettings {
    RenderSettings::for_static_diagram()
}

#[test]
fn window_keeps_padding_away_from_edges() {
    // (2,2) and (4,4) with one cell of padding
    let vp = plan_viewport(
        &nodes_with(&["cc", "ee"]),
        (19, 19),
        &settings(),
        ViewportInputs::default(),
    )
    .unwrap();
    assert_eq!(vp.origin, Point::new(1, 1));
    assert_eq!(vp.far_corner(), Point::new(5, 5));
    assert_eq!((vp.width, vp.height), (5, 5));
}

#[test]
fn window_clamps_to_board() {
    let vp = plan_viewport(
        &nodes_with(&["aa", "ss"]),
        (19, 19),
        &settings(),
        ViewportInputs::default(),
    )
    .unwrap();
    assert_eq!(vp.origin, Point::new(0, 0));
    assert_eq!((vp.width, vp.height), (19, 19));
    assert_eq!(vp.touches_edges(), [true; 4]);
}

#[test]
fn corner_points_start_at_the_edge() {
    let vp = plan_viewport(
        &nodes_with(&["ab", "bc"]),
        (19, 19),
        &settings(),
        ViewportInputs::default(),
    )
    .unwrap();
    assert_eq!(vp.origin, Point::new(0, 0));
    let far = vp.far_corner();
    assert!(far.x >= 2 && far.y >= 3);
}

#[test]
fn reference_image_fixes_window_and_snaps_to_near_edge() {
    // 4 + 23*9 px is nine cells; centring on (4,4)..(5,5) starts one cell from the edge
    let inputs = ViewportInputs {
        reference_image_size: Some((4 + 23 * 9, 4 + 23 * 9)),
    };
    let vp = plan_viewport(&nodes_with(&["ee", "ff"]), (19, 19), &settings(), inputs).unwrap();
    assert_eq!((vp.width, vp.height), (9, 9));
    assert_eq!(vp.origin, Point::new(0, 0));
}

#[test]
fn reference_image_snaps_to_far_edge() {
    let inputs = ViewportInputs {
        reference_image_size: Some((4 + 23 * 9, 4 + 23 * 9)),
    };
    let vp = plan_viewport(&nodes_with(&["mm", "nn"]), (19, 19), &settings(), inputs).unwrap();
    assert_eq!(vp.origin, Point::new(10, 10));
    assert_eq!(vp.far_corner(), Point::new(18, 18));
}

#[test]
fn record_without_points_is_a_layout_error() {
    let nodes = vec![RecordNode::new(vec![Command::new("SZ", ["19"])])];
    let err = plan_viewport(&nodes, (19, 19), &settings(), ViewportInputs::default()).unwrap_err();
    assert!(matches!(err, GobanError::Layout(_)));
}

#[test]
fn cell_size_fits_the_pixel_budget() {
    let vp = plan_viewport(
        &nodes_with(&["cc", "ee"]),
        (19, 19),
        &settings(),
        ViewportInputs::default(),
    )
    .unwrap();
    assert_eq!(vp.margin, 17);
    assert_eq!(vp.cell_size, 193);
    let (w, h) = vp.image_size();
    assert!(w <= 1000 && h <= 1000);
}

#[test]
fn cell_size_respects_minimum() {
    let mut s = settings();
    s.max_width = 40;
    s.max_height = 40;
    s.min_cell_size = 6;
    let vp = plan_viewport(
        &nodes_with(&["aa", "ss"]),
        (19, 19),
        &s,
        ViewportInputs::default(),
    )
    .unwrap();
    assert_eq!(vp.cell_size, 6);
}

#[test]
fn forced_centering_shrinks_draw_cell_on_parity_conflict() {
    let mut s = settings();
    s.force_stones_center = true;
    let vp = plan_viewport(
        &nodes_with(&["cc", "ee"]),
        (19, 19),
        &s,
        ViewportInputs::default(),
    )
    .unwrap();
    let conflict = vp.line_width % 2 != vp.cell_size % 2;
    let expected = if conflict { vp.cell_size - 1 } else { vp.cell_size };
    assert_eq!(vp.draw_cell_size, expected);
    assert_eq!(vp.draw_offset(), vp.cell_size - expected);
}

#[test]
fn cell_geometry_follows_the_origin() {
    let vp = plan_viewport(
        &nodes_with(&["cc", "ee"]),
        (19, 19),
        &settings(),
        ViewportInputs::default(),
    )
    .unwrap();
    assert_eq!(vp.show_index(Point::new(1, 1)), Some((0, 0)));
    assert_eq!(vp.show_index(Point::new(0, 3)), None);
    assert_eq!(vp.show_index(Point::new(6, 3)), None);
    let r = vp.cell_rect(Point::new(2, 1)).unwrap();
    assert_eq!((r.x0, r.y0), (vp.margin + vp.cell_size, vp.margin));
    assert_eq!(r.width(), vp.cell_size);
}

#[test]
fn legacy_pass_does_not_widen_the_window() {
    let nodes = vec![
        RecordNode::new(vec![Command::new("SZ", ["19"])]),
        RecordNode::new(vec![Command::new("AB", ["cc", "ee"])]),
        RecordNode::new(vec![Command::new("W", ["tt"])]),
    ];
    assert_eq!(
        points_of_interest(&nodes, (19, 19)),
        Some((Point::new(2, 2), Point::new(4, 4)))
    );
    let vp = plan_viewport(&nodes, (19, 19), &settings(), ViewportInputs::default()).unwrap();
    assert_eq!(vp.far_corner(), Point::new(5, 5));
}

#[test]
fn oversized_pixel_budget_is_rejected() {
    let mut s = settings();
    s.max_width = u32::MAX;
    let err = plan_viewport(
        &nodes_with(&["cc", "ee"]),
        (19, 19),
        &s,
        ViewportInputs::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GobanError::Record(_)));
}
