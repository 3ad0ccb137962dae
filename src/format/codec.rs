//! Format-indexed dispatch over the per-family codecs.

use log::trace;

use crate::error::{ImageError, Result};
use crate::format::color16::{self, Packing16};
use crate::format::{monochrome, web, FormatClass, PixelFormat};
use crate::pixel::PixelBuffer;

/// Options that change how packed bytes are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecOptions {
    /// Store 16-bit pixels most significant byte first
    pub big_endian: bool,
    /// `0x00RRGGBB` color encoded as transparent by the alpha formats
    pub transparent_key: u32,
}

fn packing16(format: PixelFormat) -> Option<Packing16> {
    match format {
        PixelFormat::Rgb565 => Some(Packing16::Rgb565),
        PixelFormat::Bgr565 => Some(Packing16::Bgr565),
        PixelFormat::Argb1555 => Some(Packing16::Argb1555),
        PixelFormat::Bgra5551 => Some(Packing16::Bgra5551),
        _ => None,
    }
}

/// Encode `src` into `dst`, returning the number of bytes written.
///
/// Monochrome formats take a gray or binary raster, the others a truecolor one.
pub fn encode(format: PixelFormat, src: &PixelBuffer, opts: &CodecOptions, dst: &mut [u8]) -> Result<usize> {
    let len = format.payload_size(src.width(), src.height())?;
    if dst.len() < len {
        return Err(ImageError::BufferTooSmall { needed: len, actual: dst.len() });
    }
    let dst = &mut dst[..len];

    match format.class() {
        FormatClass::Monochrome => {
            let layout = format
                .mono_layout()
                .ok_or_else(|| ImageError::FormatUnsupported(format.to_string()))?;
            monochrome::encode(layout, src, dst)?;
        }
        FormatClass::WebPalette => web::encode(src, dst)?,
        FormatClass::Color16 => {
            let packing = packing16(format).ok_or_else(|| ImageError::FormatUnsupported(format.to_string()))?;
            color16::encode(packing, src, opts.transparent_key, dst)?;
            if opts.big_endian {
                trace!("swapping {} bytes to big-endian", len);
                color16::swap_bytes16(dst);
            }
        }
    }
    Ok(len)
}

/// Decode one frame payload into `dst`, whose width and height select the geometry.
///
/// With `big_endian` set on a 16-bit format, `src` is byte-swapped in place
/// first and is left in little-endian order.
pub fn decode(format: PixelFormat, src: &mut [u8], opts: &CodecOptions, dst: &mut PixelBuffer) -> Result<()> {
    let len = format.payload_size(dst.width(), dst.height())?;
    if src.len() < len {
        return Err(ImageError::BufferTooSmall { needed: len, actual: src.len() });
    }
    let src = &mut src[..len];

    match format.class() {
        FormatClass::Monochrome => {
            let layout = format
                .mono_layout()
                .ok_or_else(|| ImageError::FormatUnsupported(format.to_string()))?;
            monochrome::decode(layout, src, dst)
        }
        FormatClass::WebPalette => web::decode(src, dst),
        FormatClass::Color16 => {
            let packing = packing16(format).ok_or_else(|| ImageError::FormatUnsupported(format.to_string()))?;
            if opts.big_endian {
                color16::swap_bytes16(src);
            }
            color16::decode(packing, src, dst)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::ColorKind;

    fn checker(w: usize, h: usize) -> PixelBuffer {
        let mut data = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[v, (x * 16) as u8, (y * 16) as u8]);
            }
        }
        PixelBuffer::from_raw(w, h, ColorKind::Truecolor24, data).unwrap()
    }

    #[test]
    fn test_every_format_dispatches() {
        let rgb = checker(5, 3);
        let gray = PixelBuffer::from_raw(5, 3, ColorKind::Binary8, vec![255; 15]).unwrap();
        let opts = CodecOptions::default();
        for format in PixelFormat::ALL {
            let src = if format.class() == FormatClass::Monochrome { &gray } else { &rgb };
            let mut packed = vec![0u8; format.payload_size(5, 3).unwrap()];
            assert_eq!(encode(format, src, &opts, &mut packed).unwrap(), packed.len());

            let mut out = PixelBuffer::new(5, 3, ColorKind::Truecolor24).unwrap();
            decode(format, &mut packed, &opts, &mut out).unwrap();
            assert_eq!(out.as_bytes().len(), 45, "{}", format);
        }
    }

    #[test]
    fn test_big_endian_swaps_payload() {
        let rgb = PixelBuffer::from_raw(1, 1, ColorKind::Truecolor24, vec![255, 0, 0]).unwrap();
        let opts = CodecOptions { big_endian: true, ..Default::default() };
        let mut packed = [0u8; 2];
        encode(PixelFormat::Rgb565, &rgb, &opts, &mut packed).unwrap();
        assert_eq!(packed, [0xF8, 0x00]);

        let mut out = PixelBuffer::new(1, 1, ColorKind::Truecolor24).unwrap();
        decode(PixelFormat::Rgb565, &mut packed, &opts, &mut out).unwrap();
        assert_eq!(out.as_bytes(), &[0xF8, 0, 0]);
    }

    #[test]
    fn test_big_endian_ignored_for_web() {
        let rgb = checker(2, 1);
        let mut le = [0u8; 2];
        let mut be = [0u8; 2];
        encode(PixelFormat::Web, &rgb, &CodecOptions::default(), &mut le).unwrap();
        encode(PixelFormat::Web, &rgb, &CodecOptions { big_endian: true, ..Default::default() }, &mut be).unwrap();
        assert_eq!(le, be);
    }

    #[test]
    fn test_kind_mismatch() {
        let rgb = checker(2, 2);
        let mut packed = [0u8; 2];
        assert!(matches!(
            encode(PixelFormat::BitmapRl, &rgb, &CodecOptions::default(), &mut packed),
            Err(ImageError::InvalidParameter(_))
        ));
    }
}
