//! Owned raster storage used by every stage of the encode and decode paths.
//!
//! A `PixelBuffer` holds tightly packed rows (no stride padding) in one of three
//! layouts. Truecolor rasters store `R, G, B` per pixel; gray and binary rasters
//! store one byte per pixel, binary ones using only 0 and 255.

use crate::error::{try_alloc_zeroed, ImageError, Result};

/// Layout tag of a [`PixelBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKind {
    /// RGBRGB..., 3 bytes per pixel
    Truecolor24,
    /// One 0-255 gray value per pixel
    Gray8,
    /// One byte per pixel, 0 (off) or 255 (on)
    Binary8,
}

impl ColorKind {
    /// Bytes used by one pixel of this kind
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorKind::Truecolor24 => 3,
            ColorKind::Gray8 | ColorKind::Binary8 => 1,
        }
    }
}

/// Raster with its geometry and layout.
///
/// Invariant: `data.len() == width * height * kind.bytes_per_pixel()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    kind: ColorKind,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer.
    pub fn new(width: usize, height: usize, kind: ColorKind) -> Result<Self> {
        let len = byte_len(width, height, kind)?;
        Ok(Self {
            width,
            height,
            kind,
            data: try_alloc_zeroed(len)?,
        })
    }

    /// Wrap existing bytes, checking the length invariant.
    pub fn from_raw(width: usize, height: usize, kind: ColorKind, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height, kind)?;
        if data.len() != expected {
            return Err(ImageError::InvalidParameter(format!(
                "data length {} doesn't match {}x{}x{} = {}",
                data.len(),
                width,
                height,
                kind.bytes_per_pixel(),
                expected
            )));
        }
        Ok(Self { width, height, kind, data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn kind(&self) -> ColorKind {
        self.kind
    }

    /// Number of pixels
    #[inline]
    pub fn len_pixels(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Reshape to new geometry and kind, reusing the allocation when possible.
    pub(crate) fn reshape(&mut self, width: usize, height: usize, kind: ColorKind) -> Result<()> {
        let len = byte_len(width, height, kind)?;
        if len > self.data.len() {
            self.data
                .try_reserve_exact(len - self.data.len())
                .map_err(|_| ImageError::Allocation { bytes: len })?;
        }
        self.data.resize(len, 0);
        self.width = width;
        self.height = height;
        self.kind = kind;
        Ok(())
    }

    /// Truecolor pixel at (x, y)
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        debug_assert_eq!(self.kind, ColorKind::Truecolor24);
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Expand a gray or binary raster to truecolor (R = G = B).
    pub fn to_truecolor(&self) -> Result<PixelBuffer> {
        match self.kind {
            ColorKind::Truecolor24 => Ok(self.clone()),
            ColorKind::Gray8 | ColorKind::Binary8 => {
                let mut out = PixelBuffer::new(self.width, self.height, ColorKind::Truecolor24)?;
                for (dst, &v) in out.data.chunks_exact_mut(3).zip(&self.data) {
                    dst.fill(v);
                }
                Ok(out)
            }
        }
    }
}

fn byte_len(width: usize, height: usize, kind: ColorKind) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(kind.bytes_per_pixel()))
        .ok_or_else(|| ImageError::InvalidParameter(format!("{}x{} raster is too large", width, height)))
}
