use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{GobanError, GobanResult};
use crate::foundation::math::Fnv1a64;

/// Upper bound for `max_width` and `max_height`.
pub const MAX_IMAGE_SIDE: u32 = 16_384;

/// Visual style: colors, stroke widths and the font used for text.
///
/// A style plus a cell size fully determines every cached graphic, see [`StyleKey`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Style {
    /// Human-readable style name.
    pub name: String,
    /// Board fill color.
    pub board_color: Rgb8,
    /// Grid line and star point color.
    pub line_color: Rgb8,
    /// Base grid line thickness in pixels (scaled up slightly with the cell size).
    pub line_thickness: f32,
    /// Color of point markers (circle, square, triangle, cross, select).
    pub marker_color: Rgb8,
    /// Color of label text.
    pub label_color: Rgb8,
    /// Color of the placement marker shown instead of move numbers.
    pub placement_marker_color: Rgb8,
    /// Move-number color drawn on black stones.
    pub number_color_for_black: Rgb8,
    /// Move-number color drawn on white stones.
    pub number_color_for_white: Rgb8,
    /// Color of line and arrow annotations.
    pub annotate_line_color: Rgb8,
    /// Base thickness of line and arrow annotations in pixels.
    pub annotate_line_thickness: f32,
    /// Font family requested for labels and numbers.
    pub font_family: String,
}

impl Style {
    /// The default warm wooden style.
    pub fn main() -> Self {
        Self {
            name: "main".to_string(),
            board_color: Rgb8::new(243, 176, 109),
            line_color: Rgb8::new(63, 39, 32),
            line_thickness: 1.1,
            marker_color: Rgb8::new(29, 164, 98),
            label_color: Rgb8::new(0, 0, 0),
            placement_marker_color: Rgb8::new(0, 138, 225),
            number_color_for_black: Rgb8::new(255, 255, 255),
            number_color_for_white: Rgb8::new(0, 0, 0),
            annotate_line_color: Rgb8::new(0, 30, 180),
            annotate_line_thickness: 8.0,
            font_family: "sans-serif".to_string(),
        }
    }

    /// Cool blue style.
    pub fn frost() -> Self {
        Self {
            name: "frost".to_string(),
            board_color: Rgb8::new(214, 226, 238),
            line_color: Rgb8::new(75, 107, 155),
            line_thickness: 1.2,
            marker_color: Rgb8::new(46, 84, 105),
            ..Self::main()
        }
    }

    /// Stable fingerprint of every field that influences cached graphics.
    pub fn key(&self) -> StyleKey {
        let mut h = Fnv1a64::new_default();
        h.write_str(&self.name);
        for c in [
            self.board_color,
            self.line_color,
            self.marker_color,
            self.label_color,
            self.placement_marker_color,
            self.number_color_for_black,
            self.number_color_for_white,
            self.annotate_line_color,
        ] {
            h.write_bytes(&[c.r, c.g, c.b]);
        }
        h.write_f32(self.line_thickness);
        h.write_f32(self.annotate_line_thickness);
        h.write_str(&self.font_family);
        StyleKey(h.finish())
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::main()
    }
}

/// Hashed identity of a [`Style`], used as half of the graphics cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StyleKey(pub(crate) u64);

impl StyleKey {
    /// Raw 64-bit fingerprint.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Flat render configuration passed explicitly into every render call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    /// Smallest allowed cell size in pixels.
    pub min_cell_size: u32,
    /// Largest allowed cell size in pixels.
    pub max_cell_size: u32,

    /// Draw a move number (or placement marker) on each played stone.
    pub show_stone_numbers: bool,
    /// Keep numbers visible instead of hiding them after a short reveal.
    pub maintain_stone_numbers: bool,
    /// Keep the last number visible at the end; passes produce no frame.
    pub maintain_numbers_at_end: bool,
    /// Draw the placement marker instead of the move number.
    pub marker_instead_of_numbers: bool,
    /// Label glyph size relative to the cell.
    pub label_text_scale: f32,
    /// Single-digit move number size relative to the cell.
    pub number_text_scale: f32,
    /// Extra relative size per additional digit of a move number.
    pub digit_text_scale_factor: f32,

    /// Colors, strokes and font.
    pub style: Style,
    /// Cells of padding around every referenced point.
    pub display_padding: u32,
    /// Shrink drawn cells by a pixel when needed so stones sit centered on the grid lines.
    pub force_stones_center: bool,
    /// Erase captured stones from the drawing.
    pub render_captures: bool,
    /// Allow a multi-stone group to capture itself.
    pub allow_self_capture: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_width: 1000,
            max_height: 1000,
            min_cell_size: 4,
            max_cell_size: 256,
            show_stone_numbers: true,
            maintain_stone_numbers: true,
            maintain_numbers_at_end: true,
            marker_instead_of_numbers: false,
            label_text_scale: 0.55,
            number_text_scale: 0.51,
            digit_text_scale_factor: 0.2,
            style: Style::main(),
            display_padding: 1,
            force_stones_center: false,
            render_captures: false,
            allow_self_capture: false,
        }
    }
}

impl RenderSettings {
    /// Settings suited to a static diagram: numbers on every stone, captures left drawn.
    pub fn for_static_diagram() -> Self {
        Self::default().with_static_diagram_behavior()
    }

    /// Settings suited to an animated diagram: placement marker revealed then hidden.
    pub fn for_animated_diagram() -> Self {
        Self::default().with_animated_diagram_behavior()
    }

    /// Settings suited to an animated full game.
    pub fn for_animated_game() -> Self {
        Self {
            maintain_numbers_at_end: false,
            ..Self::for_animated_diagram()
        }
    }

    /// Keep style and limits, switch numbering/capture behavior to the static preset.
    pub fn with_static_diagram_behavior(self) -> Self {
        Self {
            show_stone_numbers: true,
            maintain_stone_numbers: true,
            maintain_numbers_at_end: true,
            marker_instead_of_numbers: false,
            render_captures: false,
            ..self
        }
    }

    /// Keep style and limits, switch numbering/capture behavior to the animated preset.
    pub fn with_animated_diagram_behavior(self) -> Self {
        Self {
            show_stone_numbers: true,
            maintain_stone_numbers: false,
            maintain_numbers_at_end: true,
            marker_instead_of_numbers: true,
            render_captures: true,
            ..self
        }
    }

    /// Load settings from a JSON file; missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> GobanResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings from '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse settings from JSON text.
    pub fn from_json_str(text: &str) -> GobanResult<Self> {
        let settings: Self =
            serde_json::from_str(text).map_err(|e| GobanError::record(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject limits that cannot produce an image.
    pub fn validate(&self) -> GobanResult<()> {
        if self.min_cell_size == 0 || self.min_cell_size > self.max_cell_size {
            return Err(GobanError::record(format!(
                "cell size range {}..={} is empty",
                self.min_cell_size, self.max_cell_size
            )));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(GobanError::record("max image dimensions must be > 0"));
        }
        if self.max_width > MAX_IMAGE_SIDE || self.max_height > MAX_IMAGE_SIDE {
            return Err(GobanError::record(format!(
                "max image dimensions {}x{} exceed {MAX_IMAGE_SIDE}",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }

    /// Grid line width in pixels for `cell_size`.
    pub fn board_line_width(&self, cell_size: u32) -> u32 {
        ((self.style.line_thickness + cell_size as f32 * 0.03) as u32).max(1)
    }

    /// Line annotation width in pixels for `cell_size`.
    pub fn annotate_line_width(&self, cell_size: u32) -> u32 {
        ((self.style.annotate_line_thickness + cell_size as f32 * 0.03) as u32).max(1)
    }
}

/// Durations (milliseconds) used when assembling the animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between consecutive moves.
    pub frame_delay_ms: u32,
    /// Duration of the first frame.
    pub start_freeze_ms: u32,
    /// Duration of the last frame.
    pub end_freeze_ms: u32,
    /// How long a just-placed move number stays visible before it is hidden.
    pub number_display_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: 1500,
            start_freeze_ms: 3000,
            end_freeze_ms: 10000,
            number_display_ms: 500,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
