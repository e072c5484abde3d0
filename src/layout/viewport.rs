use crate::config::settings::RenderSettings;
use crate::foundation::core::{PixelRect, Point};
use crate::foundation::error::{GobanError, GobanResult};
use crate::record::model::RecordNode;

/// Cells within this distance of a board edge pull the window onto the edge.
const EDGE_SNAP_CELLS: i64 = 2;
/// Margin as a fraction of the longest image side per displayed cell.
const MARGIN_FACTOR: f64 = 0.0853;
/// Companion reference diagrams use 23px cells with a 2px border.
const REFERENCE_CELL_PX: u32 = 23;
const REFERENCE_BORDER_PX: u32 = 4;

/// Optional external hints for sizing the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportInputs {
    /// Pixel size of a companion reference image; when present it fixes the window size.
    pub reference_image_size: Option<(u32, u32)>,
}

/// Visible window of the board and its pixel scale. Immutable once planned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Board point shown in the top-left cell.
    pub origin: Point,
    /// Displayed columns.
    pub width: u32,
    /// Displayed rows.
    pub height: u32,
    /// Pixel margin around the grid.
    pub margin: u32,
    /// Pixel size of one cell.
    pub cell_size: u32,
    /// Pixel size graphics are drawn at (`cell_size` or one less).
    pub draw_cell_size: u32,
    /// Grid line width in pixels.
    pub line_width: u32,
    /// Full board width in cells.
    pub board_width: u32,
    /// Full board height in cells.
    pub board_height: u32,
}

impl Viewport {
    /// Output image size in pixels.
    pub fn image_size(&self) -> (u32, u32) {
        (
            self.margin * 2 + self.cell_size * self.width,
            self.margin * 2 + self.cell_size * self.height,
        )
    }

    /// Bottom-right displayed board point.
    pub fn far_corner(&self) -> Point {
        Point::new(
            self.origin.x + self.width - 1,
            self.origin.y + self.height - 1,
        )
    }

    /// Whether `p` is displayed.
    pub fn contains(&self, p: Point) -> bool {
        self.show_index(p).is_some()
    }

    /// Window-relative `(column, row)` of `p`.
    pub fn show_index(&self, p: Point) -> Option<(u32, u32)> {
        let sx = p.x.checked_sub(self.origin.x)?;
        let sy = p.y.checked_sub(self.origin.y)?;
        (sx < self.width && sy < self.height).then_some((sx, sy))
    }

    /// Pixel box of the cell showing `p`.
    pub fn cell_rect(&self, p: Point) -> Option<PixelRect> {
        let (sx, sy) = self.show_index(p)?;
        Some(self.cell_rect_at(sx, sy))
    }

    pub(crate) fn cell_rect_at(&self, sx: u32, sy: u32) -> PixelRect {
        PixelRect {
            x0: self.margin + sx * self.cell_size,
            y0: self.margin + sy * self.cell_size,
            x1: self.margin + (sx + 1) * self.cell_size,
            y1: self.margin + (sy + 1) * self.cell_size,
        }
    }

    /// Pixel center of the intersection `p` (may lie outside the window).
    ///
    /// Stones, star points and grid lines are all centred here.
    pub fn center_px(&self, p: Point) -> (f32, f32) {
        let axis = |v: u32, origin: u32| {
            self.margin as f32
                + (v as f32 - origin as f32) * self.cell_size as f32
                + self.draw_offset() as f32
                + self.draw_cell_size as f32 / 2.0
        };
        (axis(p.x, self.origin.x), axis(p.y, self.origin.y))
    }

    /// Offset from a cell's top-left corner at which draw-sized graphics are pasted.
    pub fn draw_offset(&self) -> u32 {
        self.cell_size - self.draw_cell_size
    }

    /// Window touches the board's left/top/right/bottom edge.
    pub fn touches_edges(&self) -> [bool; 4] {
        [
            self.origin.x == 0,
            self.origin.y == 0,
            self.origin.x + self.width >= self.board_width,
            self.origin.y + self.height >= self.board_height,
        ]
    }
}

/// Bounding rectangle `(min, max)` of every point referenced anywhere in the record.
pub fn points_of_interest(
    nodes: &[RecordNode],
    board_size: (u32, u32),
) -> Option<(Point, Point)> {
    let mut bounds: Option<(Point, Point)> = None;
    for p in nodes
        .iter()
        .flat_map(|n| n.commands.iter())
        .flat_map(|c| c.referenced_points(board_size))
    {
        bounds = Some(match bounds {
            None => (p, p),
            Some((lo, hi)) => (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            ),
        });
    }
    bounds
}

/// Choose the displayed window, margin and cell size for a record.
#[tracing::instrument(skip(nodes, settings))]
pub fn plan_viewport(
    nodes: &[RecordNode],
    board_size: (u32, u32),
    settings: &RenderSettings,
    inputs: ViewportInputs,
) -> GobanResult<Viewport> {
    settings.validate()?;
    let (board_w, board_h) = board_size;
    if board_w == 0 || board_h == 0 {
        return Err(GobanError::layout("board has no cells"));
    }
    let (lo, hi) = points_of_interest(nodes, board_size)
        .ok_or_else(|| GobanError::layout("record references no board point"))?;

    let desired = inputs.reference_image_size.map(|(w, h)| {
        let cells = |px: u32| (px.saturating_sub(REFERENCE_BORDER_PX) / REFERENCE_CELL_PX).max(1);
        (cells(w), cells(h))
    });

    let padding = settings.display_padding;
    let (x0, width) = plan_axis(lo.x, hi.x, board_w, desired.map(|d| d.0), padding);
    let (y0, height) = plan_axis(lo.y, hi.y, board_h, desired.map(|d| d.1), padding);

    let longest_show = width.max(height);
    let longest_image = settings.max_width.max(settings.max_height);
    let margin = (f64::from(longest_image) / f64::from(longest_show) * MARGIN_FACTOR).round() as u32;

    let avail_w = settings.max_width.saturating_sub(margin * 2);
    let avail_h = settings.max_height.saturating_sub(margin * 2);
    let cell_size = (avail_w / width)
        .min(avail_h / height)
        .min(settings.max_cell_size)
        .max(settings.min_cell_size)
        .max(1);

    let line_width = settings.board_line_width(cell_size);
    let parity_conflict = line_width % 2 != cell_size % 2;
    let draw_cell_size = if settings.force_stones_center && parity_conflict && cell_size > 1 {
        cell_size - 1
    } else {
        cell_size
    };

    let vp = Viewport {
        origin: Point::new(x0, y0),
        width,
        height,
        margin,
        cell_size,
        draw_cell_size,
        line_width,
        board_width: board_w,
        board_height: board_h,
    };
    tracing::debug!(?vp, "viewport planned");
    Ok(vp)
}

/// Returns `(start, len)` of the window along one axis.
fn plan_axis(min: u32, max: u32, board_len: u32, desired: Option<u32>, padding: u32) -> (u32, u32) {
    let (min, max, board_len, padding) = (
        i64::from(min),
        i64::from(max),
        i64::from(board_len),
        i64::from(padding),
    );
    let found = max - min + 1;
    let len = desired
        .map(i64::from)
        .unwrap_or(found + 2 * padding)
        .clamp(1, board_len);

    let pad = ((len - found) / 2).max(0);
    let mut start = (min - pad).max(0).min(board_len - len);
    let end = start + len - 1;

    // Pull onto a nearby edge only when the far side keeps its padding.
    if start <= EDGE_SNAP_CELLS && len - 1 >= max + padding {
        start = 0;
    } else if end >= board_len - 1 - EDGE_SNAP_CELLS && board_len - len <= min - padding {
        start = board_len - len;
    }

    (start as u32, len as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/viewport.rs"]
mod tests;
