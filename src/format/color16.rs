//! 16-bit color packing: RGB565, BGR565, ARGB1555 and BGRA5551.
//!
//! Packed values are stored little-endian; `swap_bytes16` converts a whole
//! buffer to big-endian (and back).

use crate::error::{ImageError, Result};
use crate::pixel::{ColorKind, PixelBuffer};

/// Channel layout of a 16-bit format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packing16 {
    Rgb565,
    Bgr565,
    Argb1555,
    Bgra5551,
}

/// Pack a 24-bit color into `0x00RRGGBB`, the form transparency keys use.
#[inline]
pub fn rgb_key(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

impl Packing16 {
    /// Pack one pixel. Pixels equal to `key` become 0 in the alpha formats.
    #[inline]
    pub fn pack(self, r: u8, g: u8, b: u8, key: u32) -> u16 {
        let (r, g, b) = (r as u16, g as u16, b as u16);
        match self {
            Packing16::Rgb565 => (b >> 3) | ((g & 0xFC) << 3) | ((r & 0xF8) << 8),
            Packing16::Bgr565 => ((b & 0xF8) << 8) | ((g & 0xFC) << 3) | (r >> 3),
            Packing16::Argb1555 => {
                if rgb_key(r as u8, g as u8, b as u8) == key {
                    0
                } else {
                    (b >> 3) | ((g & 0xF8) << 2) | ((r & 0xF8) << 7) | 0x8000
                }
            }
            Packing16::Bgra5551 => {
                if rgb_key(r as u8, g as u8, b as u8) == key {
                    0
                } else {
                    ((b & 0xF8) << 8) | ((g & 0xF8) << 3) | ((r & 0xF8) >> 2) | 0x0001
                }
            }
        }
    }

    /// Unpack one pixel. Transparent pixels of the alpha formats read as white.
    #[inline]
    pub fn unpack(self, v: u16) -> [u8; 3] {
        match self {
            Packing16::Rgb565 => [
                ((v & 0xF800) >> 8) as u8,
                ((v & 0x07E0) >> 3) as u8,
                ((v & 0x001F) << 3) as u8,
            ],
            Packing16::Bgr565 => [
                ((v & 0x001F) << 3) as u8,
                ((v & 0x07E0) >> 3) as u8,
                ((v & 0xF800) >> 8) as u8,
            ],
            Packing16::Argb1555 => {
                if v & 0x8000 == 0 {
                    return [255; 3];
                }
                [
                    ((v & 0x7C00) >> 7) as u8,
                    ((v & 0x03E0) >> 2) as u8,
                    ((v & 0x001F) << 3) as u8,
                ]
            }
            Packing16::Bgra5551 => {
                if v & 0x0001 == 0 {
                    return [255; 3];
                }
                [
                    ((v & 0x003E) << 2) as u8,
                    ((v & 0x07C0) >> 3) as u8,
                    ((v & 0xF800) >> 8) as u8,
                ]
            }
        }
    }
}

/// Swap the two bytes of every 16-bit element. A trailing odd byte is left alone.
pub fn swap_bytes16(bytes: &mut [u8]) {
    for pair in bytes.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

/// Pack a truecolor raster into `dst` (2 bytes per pixel, little-endian).
pub fn encode(packing: Packing16, src: &PixelBuffer, key: u32, dst: &mut [u8]) -> Result<()> {
    if src.kind() != ColorKind::Truecolor24 {
        return Err(ImageError::InvalidParameter(
            "16-bit encode needs a truecolor raster".to_string(),
        ));
    }
    let needed = src.len_pixels() * 2;
    if dst.len() < needed {
        return Err(ImageError::BufferTooSmall { needed, actual: dst.len() });
    }
    for (px, out) in src.as_bytes().chunks_exact(3).zip(dst.chunks_exact_mut(2)) {
        let v = packing.pack(px[0], px[1], px[2], key);
        out.copy_from_slice(&v.to_le_bytes());
    }
    Ok(())
}

/// Unpack little-endian 16-bit pixels into a truecolor raster.
pub fn decode(packing: Packing16, src: &[u8], dst: &mut PixelBuffer) -> Result<()> {
    let needed = dst.len_pixels() * 2;
    if src.len() < needed {
        return Err(ImageError::BufferTooSmall { needed, actual: src.len() });
    }
    let (w, h) = (dst.width(), dst.height());
    dst.reshape(w, h, ColorKind::Truecolor24)?;
    for (packed, out) in src.chunks_exact(2).zip(dst.as_bytes_mut().chunks_exact_mut(3)) {
        let v = u16::from_le_bytes([packed[0], packed[1]]);
        out.copy_from_slice(&packing.unpack(v));
    }
    Ok(())
}
