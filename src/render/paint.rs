use image::{Rgba, RgbaImage};

use crate::foundation::core::PixelRect;
use crate::foundation::math::over_straight;

/// Set every pixel of `r` (clipped to the image) to `color`.
pub(crate) fn fill_rect(img: &mut RgbaImage, r: PixelRect, color: Rgba<u8>) {
    let Some(r) = r.clipped(img.width(), img.height()) else {
        return;
    };
    for y in r.y0..r.y1 {
        for x in r.x0..r.x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Make `r` fully transparent.
pub(crate) fn clear_rect(img: &mut RgbaImage, r: PixelRect) {
    fill_rect(img, r, Rgba([0, 0, 0, 0]));
}

/// Copy the pixels of `r` from `src` into the same place in `dst`.
pub(crate) fn copy_rect(dst: &mut RgbaImage, src: &RgbaImage, r: PixelRect) {
    let Some(r) = r
        .clipped(dst.width(), dst.height())
        .and_then(|r| r.clipped(src.width(), src.height()))
    else {
        return;
    };
    for y in r.y0..r.y1 {
        for x in r.x0..r.x1 {
            dst.put_pixel(x, y, *src.get_pixel(x, y));
        }
    }
}

/// Source-over `src` onto `dst` with its top-left corner at `(x, y)`; out-of-image parts are
/// dropped.
pub(crate) fn blend_at(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    for (sx, sy, px) in src.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        let tx = x + i64::from(sx);
        let ty = y + i64::from(sy);
        if tx < 0 || ty < 0 || tx >= dw || ty >= dh {
            continue;
        }
        let d = dst.get_pixel_mut(tx as u32, ty as u32);
        d.0 = over_straight(d.0, px.0);
    }
}

/// Source-over a same-sized layer onto `dst`.
pub(crate) fn blend_layer(dst: &mut RgbaImage, layer: &RgbaImage) {
    for (d, s) in dst.pixels_mut().zip(layer.pixels()) {
        if s.0[3] != 0 {
            d.0 = over_straight(d.0, s.0);
        }
    }
}
