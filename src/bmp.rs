//! Loader for uncompressed 24-bit BMP files.
//!
//! Only uncompressed 24-bit files are accepted. The header is checked here;
//! rows are decoded by `image` into a top-to-bottom, RGB-ordered
//! `PixelBuffer`. Bottom-up (positive height) and top-down (negative height)
//! files are both accepted.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};
use log::debug;

use crate::error::{ImageError, Result};
use crate::pixel::{ColorKind, PixelBuffer};

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_MIN_LEN: usize = 40;

#[inline]
fn le_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

#[inline]
fn le_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

#[inline]
fn le_i32(data: &[u8], at: usize) -> i32 {
    le_u32(data, at) as i32
}

/// Header fields the loader cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub pixel_offset: usize,
    pub width: usize,
    pub height: usize,
    pub top_down: bool,
    pub bit_count: u16,
    pub compression: u32,
}

impl BmpHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 2 || &data[..2] != b"BM" {
            return Err(ImageError::FormatUnknown);
        }
        if data.len() < FILE_HEADER_LEN + INFO_HEADER_MIN_LEN {
            return Err(ImageError::FormatMalformed(format!(
                "BMP header truncated at {} bytes",
                data.len()
            )));
        }

        let bit_count = le_u16(data, 28);
        let compression = le_u32(data, 30);
        if bit_count != 24 {
            return Err(ImageError::FormatUnsupported(format!(
                "{}-bit BMP (only 24-bit is supported)",
                bit_count
            )));
        }
        if compression != 0 {
            return Err(ImageError::FormatUnsupported(format!(
                "compressed BMP (compression type {})",
                compression
            )));
        }

        let width = le_i32(data, 18);
        let height = le_i32(data, 22);
        if width <= 0 || height == 0 {
            return Err(ImageError::FormatMalformed(format!(
                "invalid BMP dimensions {}x{}",
                width, height
            )));
        }

        Ok(Self {
            pixel_offset: le_u32(data, 10) as usize,
            width: width as usize,
            height: height.unsigned_abs() as usize,
            top_down: height < 0,
            bit_count,
            compression,
        })
    }

    /// Bytes per stored row, padded to a multiple of 4
    #[inline]
    pub fn stride(&self) -> usize {
        (self.width * 3 + 3) & !3
    }
}

/// Decode BMP file contents into a truecolor raster.
///
/// The header is validated here so unsupported variants get a precise error;
/// pixel decoding is left to `image`.
pub fn parse_bmp(data: &[u8]) -> Result<PixelBuffer> {
    let header = BmpHeader::parse(data)?;
    let needed = header
        .stride()
        .checked_mul(header.height)
        .and_then(|n| n.checked_add(header.pixel_offset))
        .ok_or_else(|| ImageError::FormatMalformed("BMP dimensions overflow".to_string()))?;
    if data.len() < needed {
        return Err(ImageError::FormatMalformed(format!(
            "BMP pixel data truncated: need {} bytes, file has {}",
            needed,
            data.len()
        )));
    }

    let decoded = ImageReader::with_format(Cursor::new(data), ImageFormat::Bmp)
        .decode()
        .map_err(|e| ImageError::FormatMalformed(format!("failed to decode BMP: {}", e)))?
        .into_rgb8();
    let (w, h) = (decoded.width() as usize, decoded.height() as usize);
    if (w, h) != (header.width, header.height) {
        return Err(ImageError::FormatMalformed(format!(
            "BMP decoded as {}x{}, header says {}x{}",
            w, h, header.width, header.height
        )));
    }

    debug!("loaded {}x{} BMP ({})", w, h, if header.top_down { "top-down" } else { "bottom-up" });
    PixelBuffer::from_raw(w, h, ColorKind::Truecolor24, decoded.into_raw())
}

/// Read and decode a BMP file.
pub fn load_bmp(path: &Path) -> Result<PixelBuffer> {
    let data = fs::read(path).map_err(|source| ImageError::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bmp(&data)
}
