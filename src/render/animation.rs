use image::RgbaImage;

use crate::config::settings::{RenderSettings, TimingConfig};
use crate::foundation::core::{PixelRect, union_opt};
use crate::foundation::error::{GobanError, GobanResult};

/// One composed frame in chronological order.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Full composed image.
    pub image: RgbaImage,
    /// Short-lived frame that only hides a just-shown move number.
    pub transient: bool,
    /// Region changed since the previous frame, `None` when nothing changed.
    pub dirty: Option<PixelRect>,
}

/// A frame ready for encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedFrame {
    /// Full composed image.
    pub image: RgbaImage,
    /// Display time in milliseconds.
    pub duration_ms: u32,
    /// Region that differs from the previous timed frame (the whole image for the first one).
    pub region: PixelRect,
}

/// Turns `(frame, transient)` pairs into a timed sequence.
#[derive(Clone, Copy, Debug)]
pub struct AnimationAssembler {
    timing: TimingConfig,
    maintain_stone_numbers: bool,
    maintain_numbers_at_end: bool,
}

impl AnimationAssembler {
    /// Assembler for `timing`, taking the numbering behavior from `settings`.
    pub fn new(timing: TimingConfig, settings: &RenderSettings) -> Self {
        Self {
            timing,
            maintain_stone_numbers: settings.maintain_stone_numbers,
            maintain_numbers_at_end: settings.maintain_numbers_at_end,
        }
    }

    /// How long a transient frame stays up.
    pub fn transient_duration_ms(&self) -> u32 {
        self.timing
            .frame_delay_ms
            .saturating_sub(self.timing.number_display_ms)
    }

    /// Assign durations, folding skipped transients into the frame that follows them.
    ///
    /// The first and last output frames always get the start and end freeze durations.
    pub fn assemble(&self, frames: Vec<Frame>) -> GobanResult<Vec<TimedFrame>> {
        let extra = self.transient_duration_ms();
        let n = frames.len();
        let mut out = Vec::<TimedFrame>::with_capacity(n);
        // regions of frames that were not emitted on their own
        let mut pending: Option<PixelRect> = None;

        for (i, frame) in frames.into_iter().enumerate() {
            let Frame {
                image,
                transient,
                dirty,
            } = frame;
            let is_last = i + 1 == n;
            let emit = !transient || (extra > 0 && !(is_last && self.maintain_numbers_at_end));
            if !emit {
                // a skipped transient's changes are already in the next composed frame
                if let Some(d) = dirty {
                    pending = Some(union_opt(pending, d));
                }
                continue;
            }

            let duration_ms = if self.maintain_stone_numbers {
                self.timing.frame_delay_ms
            } else if transient {
                extra
            } else {
                self.timing.number_display_ms
            };
            let full = PixelRect {
                x0: 0,
                y0: 0,
                x1: image.width(),
                y1: image.height(),
            };
            let region = if out.is_empty() {
                full
            } else {
                match (pending.take(), dirty) {
                    (Some(p), Some(d)) => p.union(d),
                    (Some(r), None) | (None, Some(r)) => r,
                    // unchanged frame still needs a non-empty patch
                    (None, None) => PixelRect {
                        x0: 0,
                        y0: 0,
                        x1: 1,
                        y1: 1,
                    },
                }
            };
            out.push(TimedFrame {
                image,
                duration_ms,
                region: region.clipped(full.x1, full.y1).unwrap_or(full),
            });
        }

        let Some(first) = out.first_mut() else {
            return Err(GobanError::render("animation has no frames"));
        };
        first.duration_ms = self.timing.start_freeze_ms;
        if let Some(last) = out.last_mut() {
            last.duration_ms = self.timing.end_freeze_ms;
        }
        tracing::debug!(frames = out.len(), "animation assembled");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/animation.rs"]
mod tests;
