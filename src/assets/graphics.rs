use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use image::RgbaImage;

use crate::assets::svg::SvgRasterizer;
use crate::config::settings::{Style, StyleKey};
use crate::foundation::core::{PixelRect, Player, Rgb8};
use crate::foundation::error::{GobanError, GobanResult};
use crate::record::model::MarkerKind;

/// Fixed-size graphics for one style at one cell size.
///
/// Every image is `size`×`size` straight-alpha RGBA and is drawn centred on its cell.
#[derive(Debug)]
pub struct CellGraphics {
    size: u32,
    stones: [RgbaImage; 2],
    markers: HashMap<MarkerKind, RgbaImage>,
    star_point: RgbaImage,
    placement_marker: RgbaImage,
}

impl CellGraphics {
    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Stone graphic for `player`.
    pub fn stone(&self, player: Player) -> &RgbaImage {
        &self.stones[player.index()]
    }

    /// Point marker graphic.
    pub fn marker(&self, kind: MarkerKind) -> &RgbaImage {
        // every kind is inserted by `build`
        &self.markers[&kind]
    }

    /// Star point dot drawn on the bare board.
    pub fn star_point(&self) -> &RgbaImage {
        &self.star_point
    }

    /// Marker shown on the latest move in place of its number.
    pub fn placement_marker(&self) -> &RgbaImage {
        &self.placement_marker
    }

    fn build(raster: &SvgRasterizer, style: &Style, size: u32) -> GobanResult<Self> {
        let draw = |body: String| raster.rasterize(&cell_svg(&body), size, size);

        let mut markers = HashMap::new();
        for kind in MarkerKind::ALL {
            markers.insert(kind, draw(marker_body(kind, style))?);
        }
        Ok(Self {
            size,
            stones: [
                draw(stone_body(Player::Black))?,
                draw(stone_body(Player::White))?,
            ],
            markers,
            star_point: draw(format!(
                r#"<circle cx="50" cy="50" r="9.8" fill="{}"/>"#,
                style.line_color.to_hex()
            ))?,
            placement_marker: draw(format!(
                r#"<circle cx="50" cy="50" r="21" fill="{}"/>"#,
                style.placement_marker_color.to_hex()
            ))?,
        })
    }

    fn named_images(&self) -> Vec<(&'static str, &RgbaImage)> {
        let mut out = vec![
            ("black", &self.stones[0]),
            ("white", &self.stones[1]),
            ("star", &self.star_point),
            ("placement", &self.placement_marker),
        ];
        out.extend(MarkerKind::ALL.iter().map(|&k| (k.name(), self.marker(k))));
        out
    }
}

fn cell_svg(body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">{body}</svg>"#
    )
}

fn stone_body(player: Player) -> String {
    let (inner, outer, edge) = match player {
        Player::Black => ("#5a5a5a", "#101010", "#000000"),
        Player::White => ("#ffffff", "#d4d4d4", "#8a8a8a"),
    };
    format!(
        r#"<defs><radialGradient id="s" cx="0.38" cy="0.32" r="0.75"><stop offset="0" stop-color="{inner}"/><stop offset="1" stop-color="{outer}"/></radialGradient></defs><circle cx="50" cy="50" r="47.5" fill="url(#s)" stroke="{edge}" stroke-width="1.5"/>"#
    )
}

fn marker_body(kind: MarkerKind, style: &Style) -> String {
    let c = style.marker_color.to_hex();
    let stroke = format!(
        r#"fill="none" stroke="{c}" stroke-width="7" stroke-linejoin="round" stroke-linecap="round""#
    );
    match kind {
        MarkerKind::Circle => format!(r#"<circle cx="50" cy="50" r="23" {stroke}/>"#),
        MarkerKind::Cross => {
            format!(r#"<path d="M30 30 L70 70 M70 30 L30 70" {stroke}/>"#)
        }
        MarkerKind::Square => format!(r#"<rect x="29" y="29" width="42" height="42" {stroke}/>"#),
        MarkerKind::Triangle => format!(r#"<path d="M50 24 L75 68 L25 68 Z" {stroke}/>"#),
        MarkerKind::Select => {
            format!(r#"<rect x="35" y="35" width="30" height="30" fill="{c}"/>"#)
        }
        MarkerKind::Dim => format!(
            r#"<rect width="100" height="100" fill="{}" fill-opacity="0.62"/>"#,
            style.board_color.to_hex()
        ),
    }
}

fn text_svg(text: &str, color: Rgb8, font_family: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="200"><text x="200" y="140" font-family="{}" font-size="120" fill="{}" text-anchor="middle">{}</text></svg>"#,
        xml_escape(font_family),
        color.to_hex(),
        xml_escape(text)
    )
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TextKey {
    style: StyleKey,
    text: String,
    color: Rgb8,
    scale_bits: u32,
    size: u32,
}

/// Memoized graphics shared across renders, keyed by `(style, cell size)`.
///
/// Building is idempotent: concurrent callers may both build a missing entry but all of them
/// observe the same stored value afterwards.
pub struct GraphicsCache {
    raster: SvgRasterizer,
    cells: Mutex<HashMap<(StyleKey, u32), Arc<CellGraphics>>>,
    texts: Mutex<HashMap<TextKey, Arc<RgbaImage>>>,
}

impl Default for GraphicsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GraphicsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsCache")
            .field("font_faces", &self.raster.face_count())
            .field("cell_sets", &self.cell_set_count())
            .finish_non_exhaustive()
    }
}

impl GraphicsCache {
    /// Cache whose text uses system fonts.
    pub fn new() -> Self {
        Self::with_font_dirs(&[])
    }

    /// Cache whose text uses system fonts plus fonts found in `dirs`.
    pub fn with_font_dirs(dirs: &[&Path]) -> Self {
        Self {
            raster: SvgRasterizer::with_system_fonts(dirs),
            cells: Mutex::new(HashMap::new()),
            texts: Mutex::new(HashMap::new()),
        }
    }

    /// Number of font faces available for labels and numbers.
    pub fn font_face_count(&self) -> usize {
        self.raster.face_count()
    }

    /// Graphics for `style` at `size`, building them on first use.
    #[tracing::instrument(skip(self, style), fields(style = %style.name))]
    pub fn get_or_build(&self, style: &Style, size: u32) -> GobanResult<Arc<CellGraphics>> {
        if size == 0 {
            return Err(GobanError::render("cell size must be > 0"));
        }
        let key = (style.key(), size);
        if let Some(hit) = self.lock_cells().get(&key) {
            return Ok(Arc::clone(hit));
        }
        let built = Arc::new(CellGraphics::build(&self.raster, style, size)?);
        tracing::debug!(size, "cell graphics built");
        Ok(Arc::clone(self.lock_cells().entry(key).or_insert(built)))
    }

    /// `text` in `color`, fitted to `scale` of a `size`×`size` cell and centred on it.
    pub fn text(
        &self,
        style: &Style,
        text: &str,
        color: Rgb8,
        scale: f32,
        size: u32,
    ) -> GobanResult<Arc<RgbaImage>> {
        let key = TextKey {
            style: style.key(),
            text: text.to_string(),
            color,
            scale_bits: scale.to_bits(),
            size,
        };
        if let Some(hit) = self.lock_texts().get(&key) {
            return Ok(Arc::clone(hit));
        }
        let svg = text_svg(text, color, &style.font_family);
        let fit = (size as f32 * scale).max(1.0);
        let img = Arc::new(self.raster.rasterize_fitted(&svg, size, size, fit)?);
        Ok(Arc::clone(self.lock_texts().entry(key).or_insert(img)))
    }

    /// Rasterize SVG `body` given in image pixel coordinates, cropped to `region`.
    ///
    /// Not cached: strokes depend on their endpoints.
    pub(crate) fn rasterize_overlay(&self, body: &str, region: PixelRect) -> GobanResult<RgbaImage> {
        let (w, h) = (region.width(), region.height());
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{} {} {w} {h}">{body}</svg>"#,
            region.x0, region.y0
        );
        self.raster.rasterize(&svg, w, h)
    }

    /// Drop every cached graphic built for `style`.
    pub fn invalidate(&self, style: &Style) {
        let key = style.key();
        self.lock_cells().retain(|(k, _), _| *k != key);
        self.lock_texts().retain(|k, _| k.style != key);
        tracing::debug!(style = %style.name, "graphics invalidated");
    }

    /// Number of cached `(style, size)` graphic sets.
    pub fn cell_set_count(&self) -> usize {
        self.lock_cells().len()
    }

    /// Write every cell graphic of `style` at `size` as PNG files into `dir`.
    pub fn export_png(&self, style: &Style, size: u32, dir: &Path) -> GobanResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create graphics directory '{}'", dir.display()))?;
        let graphics = self.get_or_build(style, size)?;
        let mut written = Vec::new();
        for (name, img) in graphics.named_images() {
            let path = dir.join(format!("{}_{name}_{size}.png", style.name));
            img.save(&path)
                .with_context(|| format!("write graphic '{}'", path.display()))?;
            written.push(path);
        }
        tracing::info!(count = written.len(), dir = %dir.display(), "graphics exported");
        Ok(written)
    }

    fn lock_cells(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<(StyleKey, u32), Arc<CellGraphics>>> {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_texts(&self) -> std::sync::MutexGuard<'_, HashMap<TextKey, Arc<RgbaImage>>> {
        self.texts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/graphics.rs"]
mod tests;
