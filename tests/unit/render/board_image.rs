use super::*;
use image::Rgba;

fn viewport(board: u32) -> Viewport {
    Viewport {
        origin: Point::new(0, 0),
        width: 3,
        height: 3,
        margin: 5,
        cell_size: 10,
        draw_cell_size: 10,
        line_width: 2,
        board_width: board,
        board_height: board,
    }
}

fn red_dot() -> RgbaImage {
    let mut img = RgbaImage::new(10, 10);
    for (x, y, px) in img.enumerate_pixels_mut() {
        if (4..6).contains(&x) && (4..6).contains(&y) {
            *px = Rgba([255, 0, 0, 255]);
        }
    }
    img
}

#[test]
fn star_points_by_board_size() {
    let full = star_points(19, 19);
    assert_eq!(full.len(), 5);
    assert!(full.contains(&Point::new(15, 3)));
    assert!(full.contains(&Point::new(9, 9)));
    assert_eq!(
        star_points(9, 9).into_iter().collect::<Vec<_>>(),
        vec![Point::new(4, 4)]
    );
    assert!(star_points(10, 10).is_empty());
    assert_eq!(star_points(13, 11).len(), 5);
    assert!(star_points(13, 11).contains(&Point::new(6, 5)));
    assert_eq!(star_points(12, 11).len(), 4);
}

#[test]
fn grid_stops_at_touched_edges() {
    let style = Style::main();
    let bg = draw_board_background(&viewport(3), &style, &red_dot());
    assert_eq!(bg.lines.dimensions(), (40, 40));

    let line = style.line_color.to_rgba();
    let board = style.board_color.to_rgba();
    assert_eq!(*bg.lines.get_pixel(10, 10), line);
    assert_eq!(*bg.lines.get_pixel(20, 15), line);
    assert_eq!(*bg.lines.get_pixel(2, 10), board);
    assert_eq!(*bg.lines.get_pixel(38, 10), board);
    assert!(bg.plain.pixels().all(|p| *p == board));
}

#[test]
fn grid_runs_off_open_edges() {
    let style = Style::main();
    let bg = draw_board_background(&viewport(5), &style, &red_dot());
    let line = style.line_color.to_rgba();
    // window touches left/top only
    assert_eq!(*bg.lines.get_pixel(39, 10), line);
    assert_eq!(*bg.lines.get_pixel(10, 39), line);
    assert_ne!(*bg.lines.get_pixel(2, 10), line);
}

#[test]
fn star_point_is_centred_on_its_intersection() {
    let bg = draw_board_background(&viewport(3), &Style::main(), &red_dot());
    assert_eq!(bg.lines.get_pixel(20, 20).0, [255, 0, 0, 255]);
    assert_ne!(bg.lines.get_pixel(10, 10).0, [255, 0, 0, 255]);
}
