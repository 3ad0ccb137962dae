//! Per-pixel tone operations: grayscale, luminance/contrast, invert, binarize.

use crate::error::{ImageError, Result};
use crate::pixel::{ColorKind, PixelBuffer};

/// BT.601 luma in 8.8 fixed point
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 76 + g as u32 * 150 + b as u32 * 29) >> 8) as u8
}

/// Truecolor to gray.
pub fn to_gray(src: &PixelBuffer, dst: &mut PixelBuffer) -> Result<()> {
    if src.kind() != ColorKind::Truecolor24 {
        return Err(ImageError::InvalidParameter("grayscale needs a truecolor raster".to_string()));
    }
    for (px, out) in src.as_bytes().chunks_exact(3).zip(dst.as_bytes_mut()) {
        *out = luma(px[0], px[1], px[2]);
    }
    Ok(())
}

/// Apply luminance then contrast to one gray value. Both range over -100..=100.
#[inline]
pub fn adjust_level(v: u8, luminance: i32, contrast: i32) -> u8 {
    let mut v = v as i32;
    if luminance > 0 {
        v = (v - 255) * 100 / (luminance + 100) + 255;
    } else if luminance < 0 {
        v = v * 100 / (100 - luminance);
    }
    if contrast > 0 {
        v = (v - 128) * (contrast + 100) / 100 + 128;
    } else if contrast < 0 {
        v = (v - 128) * 100 / (100 - contrast) + 128;
    }
    v.clamp(0, 255) as u8
}

pub fn adjust_levels(src: &PixelBuffer, dst: &mut PixelBuffer, luminance: i32, contrast: i32) {
    for (&v, out) in src.as_bytes().iter().zip(dst.as_bytes_mut()) {
        *out = adjust_level(v, luminance, contrast);
    }
}

pub fn invert(src: &PixelBuffer, dst: &mut PixelBuffer) {
    for (&v, out) in src.as_bytes().iter().zip(dst.as_bytes_mut()) {
        *out = !v;
    }
}

/// Gray to 0/255 at the 128 threshold.
pub fn binarize(src: &PixelBuffer, dst: &mut PixelBuffer) {
    for (&v, out) in src.as_bytes().iter().zip(dst.as_bytes_mut()) {
        *out = if v >= 128 { 255 } else { 0 };
    }
}
