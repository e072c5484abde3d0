use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, ImageFormat, RgbImage, RgbaImage};

use crate::foundation::error::{GobanError, GobanResult};
use crate::render::animation::TimedFrame;

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> GobanResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write the static diagram as PNG.
pub fn write_static_png(path: &Path, image: &RgbImage) -> GobanResult<()> {
    ensure_parent_dir(path)?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| GobanError::encode(format!("write png '{}': {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "static diagram written");
    Ok(())
}

/// Write `frames` as a looping GIF.
///
/// Every frame after the first is cropped to its region and placed at that offset, so only
/// the changed pixels are stored.
pub fn write_animated_gif(path: &Path, frames: &[TimedFrame]) -> GobanResult<()> {
    if frames.is_empty() {
        return Err(GobanError::encode("animation has no frames"));
    }
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| GobanError::encode(e.to_string()))?;

    for (i, frame) in frames.iter().enumerate() {
        let r = frame.region;
        let patch: RgbaImage =
            image::imageops::crop_imm(&frame.image, r.x0, r.y0, r.width(), r.height()).to_image();
        let delay = Delay::from_numer_denom_ms(frame.duration_ms, 1);
        encoder
            .encode_frame(image::Frame::from_parts(patch, r.x0, r.y0, delay))
            .map_err(|e| GobanError::encode(format!("gif frame {i}: {e}")))?;
    }
    tracing::debug!(path = %path.display(), frames = frames.len(), "animation written");
    Ok(())
}
