use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::error::{GobanError, GobanResult};
use crate::foundation::math::demultiply_rgba8_in_place;

/// Largest graphic we are willing to rasterize in one go.
const MAX_DIM: u32 = 16_384;

/// Rasterizes small SVG documents against one shared font database.
pub(crate) struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgRasterizer {
    /// System fonts plus any `.ttf`/`.otf`/`.ttc` files found in `font_dirs`.
    pub(crate) fn with_system_fonts(font_dirs: &[&Path]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in font_dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font database ready");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Number of font faces available to `<text>` elements.
    pub(crate) fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Render `svg` scaled to exactly `width`×`height`, as straight-alpha RGBA.
    pub(crate) fn rasterize(&self, svg: &str, width: u32, height: u32) -> GobanResult<RgbaImage> {
        check_size(width, height)?;
        let tree = self.parse(svg)?;
        let sx = width as f32 / tree.size().width();
        let sy = height as f32 / tree.size().height();
        render_tree(
            &tree,
            resvg::tiny_skia::Transform::from_scale(sx, sy),
            width,
            height,
        )
    }

    /// Render the drawn content of `svg` (its ink bounds, not its canvas) scaled to fit a
    /// centred `fit`×`fit` square on a `width`×`height` canvas.
    ///
    /// Used for text, whose rendered extent depends on the resolved font. A document that draws
    /// nothing, for example text with no usable font, yields a transparent image.
    pub(crate) fn rasterize_fitted(
        &self,
        svg: &str,
        width: u32,
        height: u32,
        fit: f32,
    ) -> GobanResult<RgbaImage> {
        check_size(width, height)?;
        let tree = self.parse(svg)?;
        let root = tree.root();
        if !root.has_children() {
            tracing::debug!("svg draws nothing");
            return Ok(RgbaImage::new(width, height));
        }
        let bbox = root.abs_bounding_box();
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Ok(RgbaImage::new(width, height));
        }
        let s = (fit / bbox.width()).min(fit / bbox.height());
        let tx = width as f32 / 2.0 - (bbox.x() + bbox.width() / 2.0) * s;
        let ty = height as f32 / 2.0 - (bbox.y() + bbox.height() / 2.0) * s;
        render_tree(
            &tree,
            resvg::tiny_skia::Transform::from_row(s, 0.0, 0.0, s, tx, ty),
            width,
            height,
        )
    }

    fn parse(&self, svg: &str) -> GobanResult<usvg::Tree> {
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        Ok(usvg::Tree::from_str(svg, &opts).context("parse svg graphic")?)
    }
}

fn check_size(width: u32, height: u32) -> GobanResult<()> {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(GobanError::render(format!(
            "svg raster size {width}x{height} out of range"
        )));
    }
    Ok(())
}

fn render_tree(
    tree: &usvg::Tree,
    transform: resvg::tiny_skia::Transform,
    width: u32,
    height: u32,
) -> GobanResult<RgbaImage> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| GobanError::render("failed to allocate svg pixmap"))?;
    resvg::render(tree, transform, &mut pixmap.as_mut());

    let mut data = pixmap.take();
    demultiply_rgba8_in_place(&mut data);
    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| GobanError::render("svg pixmap has unexpected length"))
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };
    for path in rd.flatten().map(|e| e.path()) {
        let is_font = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"));
        if is_font && db.load_font_file(&path).is_err() {
            tracing::warn!(path = %path.display(), "font file could not be loaded");
        }
    }
}

/// Requested family first, then generic families, then any face at all so text never vanishes.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;
    use usvg::fontdb::Family;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => Family::Serif,
                    usvg::FontFamily::SansSerif => Family::SansSerif,
                    usvg::FontFamily::Cursive => Family::Cursive,
                    usvg::FontFamily::Fantasy => Family::Fantasy,
                    usvg::FontFamily::Monospace => Family::Monospace,
                    usvg::FontFamily::Named(s) => Family::Name(s),
                });
            }
            families.extend([Family::SansSerif, Family::Serif, Family::Monospace]);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                ..Default::default()
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg.rs"]
mod tests;
