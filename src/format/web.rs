//! 216-color web-safe palette: 6 levels per channel, one index byte per pixel.

use crate::error::{ImageError, Result};
use crate::pixel::{ColorKind, PixelBuffer};

/// Representative channel values of the six palette levels
pub const WEB_LEVELS: [u8; 6] = [0, 51, 102, 153, 204, 255];

/// Palette table, entry `r*36 + g*6 + b` = `0x00RRGGBB`
pub const WEB_PALETTE: [u32; 216] = generate_web_palette();

const fn generate_web_palette() -> [u32; 216] {
    let mut table = [0u32; 216];
    let mut i = 0;
    while i < 216 {
        let r = (i / 36) as u32 * 51;
        let g = (i / 6 % 6) as u32 * 51;
        let b = (i % 6) as u32 * 51;
        table[i] = (r << 16) | (g << 8) | b;
        i += 1;
    }
    table
}

/// Palette level (0-5) of one channel value
#[inline]
pub fn quantize_level(c: u8) -> u8 {
    if c > 229 {
        5
    } else {
        ((c as u16 + 26) / 51) as u8
    }
}

/// Snap a channel value to its level's representative value
#[inline]
pub fn quantize(c: u8) -> u8 {
    WEB_LEVELS[quantize_level(c) as usize]
}

/// Palette index of a color
#[inline]
pub fn palette_index(r: u8, g: u8, b: u8) -> u8 {
    quantize_level(r) * 36 + quantize_level(g) * 6 + quantize_level(b)
}

/// Color of a palette index. Indices past the table decode as black.
#[inline]
pub fn palette_color(index: u8) -> [u8; 3] {
    let v = WEB_PALETTE.get(index as usize).copied().unwrap_or(0);
    [(v >> 16) as u8, (v >> 8) as u8, v as u8]
}

pub fn encode(src: &PixelBuffer, dst: &mut [u8]) -> Result<()> {
    if src.kind() != ColorKind::Truecolor24 {
        return Err(ImageError::InvalidParameter(
            "web palette encode needs a truecolor raster".to_string(),
        ));
    }
    let needed = src.len_pixels();
    if dst.len() < needed {
        return Err(ImageError::BufferTooSmall { needed, actual: dst.len() });
    }
    for (px, out) in src.as_bytes().chunks_exact(3).zip(dst.iter_mut()) {
        *out = palette_index(px[0], px[1], px[2]);
    }
    Ok(())
}

pub fn decode(src: &[u8], dst: &mut PixelBuffer) -> Result<()> {
    let needed = dst.len_pixels();
    if src.len() < needed {
        return Err(ImageError::BufferTooSmall { needed, actual: src.len() });
    }
    let (w, h) = (dst.width(), dst.height());
    dst.reshape(w, h, ColorKind::Truecolor24)?;
    for (&index, out) in src.iter().zip(dst.as_bytes_mut().chunks_exact_mut(3)) {
        out.copy_from_slice(&palette_color(index));
    }
    Ok(())
}
