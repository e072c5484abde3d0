use image::RgbaImage;

use crate::foundation::core::{PixelRect, Player, Point, union_opt};
use crate::layout::viewport::Viewport;
use crate::record::model::MarkerKind;
use crate::render::board_image::BoardBackground;
use crate::render::paint::{blend_at, blend_layer, clear_rect, copy_rect};

/// Label backgrounds are slightly wider than the text box they sit behind.
const LABEL_BACKGROUND_FACTOR: f32 = 1.15;

/// What currently occupies a cell's annotation slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationKind {
    /// A point marker.
    Marker(MarkerKind),
    /// A text label.
    Label(String),
    /// The move number (or placement marker) of a stone played by this player.
    MoveNumber(Player),
}

/// Stacked layers of one render: background, stones, point annotations and an optional lines
/// layer, plus the per-cell annotation bookkeeping.
///
/// Stone and annotation layers start transparent; restoring a cell to its background means
/// clearing it on those layers. Every mutation touches only the cells it names and widens the
/// dirty rectangle reported by [`LayerCompositor::take_dirty`].
pub(crate) struct LayerCompositor {
    vp: Viewport,
    background: BoardBackground,
    stones: RgbaImage,
    annotations: RgbaImage,
    lines: Option<RgbaImage>,
    state: Vec<Option<AnnotationKind>>,
    dirty: Option<PixelRect>,
    label_scale: f32,
}

impl LayerCompositor {
    pub(crate) fn new(vp: Viewport, background: BoardBackground, label_scale: f32) -> Self {
        let (w, h) = vp.image_size();
        Self {
            vp,
            background,
            stones: RgbaImage::new(w, h),
            annotations: RgbaImage::new(w, h),
            lines: None,
            state: vec![None; (vp.width as usize) * (vp.height as usize)],
            dirty: None,
            label_scale,
        }
    }

    pub(crate) fn viewport(&self) -> &Viewport {
        &self.vp
    }

    /// Erase each cell, forget its annotation and draw `graphic` there.
    pub(crate) fn paste_stone(&mut self, points: &[Point], graphic: &RgbaImage) {
        for &p in points {
            let Some(r) = self.cell(p) else { continue };
            clear_rect(&mut self.stones, r);
            clear_rect(&mut self.annotations, r);
            self.set_annotation(p, None);
            let (x, y) = self.draw_origin(r);
            blend_at(&mut self.stones, graphic, x, y);
            self.mark(r);
        }
    }

    /// Draw `graphic` as annotation `kind` on every cell not already bearing that kind.
    ///
    /// Labels on empty cells get a patch of plain board behind them so grid lines do not cross
    /// the text. Returns how many cells were drawn.
    pub(crate) fn paste_annotation(
        &mut self,
        kind: &AnnotationKind,
        points: &[Point],
        graphic: &RgbaImage,
        occupied: impl Fn(Point) -> bool,
    ) -> usize {
        let mut drawn = 0;
        for &p in points {
            let Some(r) = self.cell(p) else { continue };
            if self.annotation_at(p) == Some(kind) {
                continue;
            }
            clear_rect(&mut self.annotations, r);
            if matches!(kind, AnnotationKind::Label(_)) && !occupied(p) {
                let bg = self.label_background(r);
                copy_rect(&mut self.annotations, &self.background.plain, bg);
            }
            self.set_annotation(p, Some(kind.clone()));
            let (x, y) = self.draw_origin(r);
            blend_at(&mut self.annotations, graphic, x, y);
            self.mark(r);
            drawn += 1;
        }
        drawn
    }

    /// Restore cells to the bare background on both the stone and annotation layers.
    pub(crate) fn clear(&mut self, points: &[Point]) {
        for &p in points {
            let Some(r) = self.cell(p) else { continue };
            clear_rect(&mut self.stones, r);
            self.clear_annotation_cell(p, r);
        }
    }

    /// Remove only the annotation drawn on each cell.
    pub(crate) fn clear_annotations(&mut self, points: &[Point]) {
        for &p in points {
            if let Some(r) = self.cell(p) {
                self.clear_annotation_cell(p, r);
            }
        }
    }

    /// Remove every annotation of `kind`; returns the cleared points.
    pub(crate) fn clear_kind(&mut self, kind: &AnnotationKind) -> Vec<Point> {
        let points: Vec<Point> = self
            .state
            .iter()
            .enumerate()
            .filter(|(_, k)| k.as_ref() == Some(kind))
            .map(|(i, _)| {
                let w = self.vp.width as usize;
                Point::new(
                    self.vp.origin.x + (i % w) as u32,
                    self.vp.origin.y + (i / w) as u32,
                )
            })
            .collect();
        self.clear_annotations(&points);
        points
    }

    /// Annotation currently recorded for `p`.
    pub(crate) fn annotation_at(&self, p: Point) -> Option<&AnnotationKind> {
        self.state_index(p).and_then(|i| self.state[i].as_ref())
    }

    pub(crate) fn set_annotation(&mut self, p: Point, kind: Option<AnnotationKind>) {
        if let Some(i) = self.state_index(p) {
            self.state[i] = kind;
        }
    }

    /// Draw onto the persistent lines layer, allocating it on first use.
    pub(crate) fn draw_on_lines(&mut self, overlay: &RgbaImage, x: i64, y: i64) {
        let (w, h) = self.vp.image_size();
        let layer = self.lines.get_or_insert_with(|| RgbaImage::new(w, h));
        blend_at(layer, overlay, x, y);
        let r = PixelRect {
            x0: x.clamp(0, i64::from(w)) as u32,
            y0: y.clamp(0, i64::from(h)) as u32,
            x1: (x + i64::from(overlay.width())).clamp(0, i64::from(w)) as u32,
            y1: (y + i64::from(overlay.height())).clamp(0, i64::from(h)) as u32,
        };
        if r.width() > 0 && r.height() > 0 {
            self.mark(r);
        }
    }

    pub(crate) fn has_lines_layer(&self) -> bool {
        self.lines.is_some()
    }

    /// Flatten background, stones, annotations and lines, in that order.
    pub(crate) fn compose(&self) -> RgbaImage {
        let mut out = self.background.lines.clone();
        blend_layer(&mut out, &self.stones);
        blend_layer(&mut out, &self.annotations);
        if let Some(lines) = &self.lines {
            blend_layer(&mut out, lines);
        }
        out
    }

    /// Region changed since the previous call.
    pub(crate) fn take_dirty(&mut self) -> Option<PixelRect> {
        self.dirty.take()
    }

    fn clear_annotation_cell(&mut self, p: Point, r: PixelRect) {
        clear_rect(&mut self.annotations, r);
        self.set_annotation(p, None);
        self.mark(r);
    }

    fn cell(&self, p: Point) -> Option<PixelRect> {
        let r = self.vp.cell_rect(p);
        if r.is_none() {
            tracing::debug!(point = %p, "point outside the viewport ignored");
        }
        r
    }

    fn state_index(&self, p: Point) -> Option<usize> {
        let (sx, sy) = self.vp.show_index(p)?;
        Some((sy as usize) * (self.vp.width as usize) + sx as usize)
    }

    fn draw_origin(&self, r: PixelRect) -> (i64, i64) {
        let off = self.vp.draw_offset();
        (i64::from(r.x0 + off), i64::from(r.y0 + off))
    }

    fn label_background(&self, r: PixelRect) -> PixelRect {
        let cell = self.vp.cell_size as f32;
        let side = cell * self.label_scale * LABEL_BACKGROUND_FACTOR;
        let start = (cell / 2.0 - side / 2.0).max(0.0) as u32;
        let side = side as u32;
        PixelRect {
            x0: r.x0 + start,
            y0: r.y0 + start,
            x1: (r.x0 + start + side).min(r.x1),
            y1: (r.y0 + start + side).min(r.y1),
        }
    }

    fn mark(&mut self, r: PixelRect) {
        self.dirty = Some(union_opt(self.dirty, r));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layers.rs"]
mod tests;
