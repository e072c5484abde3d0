use std::collections::BTreeSet;

use image::RgbaImage;

use crate::config::settings::Style;
use crate::foundation::core::{PixelRect, Point};
use crate::layout::viewport::Viewport;
use crate::render::paint::{blend_at, fill_rect};

/// The two immutable backgrounds of a render.
pub(crate) struct BoardBackground {
    /// Board fill with grid lines and star points.
    pub(crate) lines: RgbaImage,
    /// Board fill only; label backgrounds are cut from it.
    pub(crate) plain: RgbaImage,
}

/// Star points of a `width`×`height` board: the 4-4 points on boards larger than 10×10 and the
/// centre of odd×odd boards.
pub fn star_points(width: u32, height: u32) -> BTreeSet<Point> {
    let mut out = BTreeSet::new();
    if width > 10 && height > 10 {
        out.extend([
            Point::new(3, 3),
            Point::new(3, height - 4),
            Point::new(width - 4, 3),
            Point::new(width - 4, height - 4),
        ]);
    }
    if width % 2 == 1 && height % 2 == 1 {
        out.insert(Point::new(width / 2, height / 2));
    }
    out
}

/// Draw the board background for `vp`.
///
/// Grid lines stop at the outermost intersection on sides where the window touches the board
/// edge and run off the image elsewhere, so a partial board reads as a crop.
pub(crate) fn draw_board_background(
    vp: &Viewport,
    style: &Style,
    star: &RgbaImage,
) -> BoardBackground {
    let (w, h) = vp.image_size();
    let plain = RgbaImage::from_pixel(w, h, style.board_color.to_rgba());
    let mut lines = plain.clone();

    let color = style.line_color.to_rgba();
    let lw = vp.line_width;
    let half = lw as f32 / 2.0;
    let [left, top, right, bottom] = vp.touches_edges();
    let (first_x, first_y) = vp.center_px(vp.origin);
    let (last_x, last_y) = vp.center_px(vp.far_corner());

    let span = |touch_lo: bool, touch_hi: bool, lo: f32, hi: f32, len: u32| {
        let start = if touch_lo {
            (lo - half).round().max(0.0) as u32
        } else {
            0
        };
        let end = if touch_hi {
            ((hi + half).round().max(0.0) as u32).min(len)
        } else {
            len
        };
        (start, end)
    };
    let (y0, y1) = span(top, bottom, first_y, last_y, h);
    let (x0, x1) = span(left, right, first_x, last_x, w);

    for sx in 0..vp.width {
        let (cx, _) = vp.center_px(Point::new(vp.origin.x + sx, vp.origin.y));
        let lx = (cx - half).round().max(0.0) as u32;
        fill_rect(
            &mut lines,
            PixelRect {
                x0: lx,
                y0,
                x1: lx + lw,
                y1,
            },
            color,
        );
    }
    for sy in 0..vp.height {
        let (_, cy) = vp.center_px(Point::new(vp.origin.x, vp.origin.y + sy));
        let ly = (cy - half).round().max(0.0) as u32;
        fill_rect(
            &mut lines,
            PixelRect {
                x0,
                y0: ly,
                x1,
                y1: ly + lw,
            },
            color,
        );
    }

    let offset = vp.draw_offset();
    for p in star_points(vp.board_width, vp.board_height) {
        if let Some(r) = vp.cell_rect(p) {
            blend_at(
                &mut lines,
                star,
                i64::from(r.x0 + offset),
                i64::from(r.y0 + offset),
            );
        }
    }

    BoardBackground { lines, plain }
}

#[cfg(test)]
#[path = "../../tests/unit/render/board_image.rs"]
mod tests;
