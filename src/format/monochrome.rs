//! 1-bit-per-pixel packing shared by the eight monochrome formats.
//!
//! The variants differ along three axes (scan order, plane layout, bit order).
//! `MonoLayout` turns a pixel coordinate into a byte index and bit mask, and
//! `PackedBits` is a bit-addressable view over a byte slice using that layout.

use crate::error::{ImageError, Result};
use crate::pixel::{ColorKind, PixelBuffer};

/// Direction in which consecutive pixels fill a byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    /// 8 horizontally adjacent pixels share a byte
    Row,
    /// 8 vertically adjacent pixels share a byte
    Column,
}

/// How bytes are arranged in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneLayout {
    /// Bytes follow the scan order: a full row (or column) after another
    Packed,
    /// Bytes run across the other axis first, one 8-pixel band at a time
    Split,
}

/// Which bit of a byte holds the first pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    Lsb,
    Msb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonoLayout {
    pub scan: ScanOrder,
    pub planes: PlaneLayout,
    pub bit_order: BitOrder,
}

impl MonoLayout {
    /// Byte index and bit mask of pixel (x, y) in a `width` x `height` image.
    #[inline]
    pub fn locate(&self, x: usize, y: usize, width: usize, height: usize) -> (usize, u8) {
        let (index, bit) = match (self.scan, self.planes) {
            (ScanOrder::Row, PlaneLayout::Packed) => (y * width.div_ceil(8) + (x >> 3), x & 7),
            (ScanOrder::Column, PlaneLayout::Packed) => (x * height.div_ceil(8) + (y >> 3), y & 7),
            (ScanOrder::Row, PlaneLayout::Split) => (y + height * (x >> 3), x & 7),
            (ScanOrder::Column, PlaneLayout::Split) => (x + width * (y >> 3), y & 7),
        };
        let mask = match self.bit_order {
            BitOrder::Lsb => 1u8 << bit,
            BitOrder::Msb => 0x80u8 >> bit,
        };
        (index, mask)
    }

    /// Bytes needed for a `width` x `height` image
    pub fn byte_len(&self, width: usize, height: usize) -> Option<usize> {
        match self.scan {
            ScanOrder::Row => height.checked_mul(width.div_ceil(8)),
            ScanOrder::Column => height.div_ceil(8).checked_mul(width),
        }
    }

    fn checked_len(&self, width: usize, height: usize) -> Result<usize> {
        self.byte_len(width, height).ok_or_else(|| {
            ImageError::InvalidParameter(format!("{}x{} bitmap is too large", width, height))
        })
    }
}

/// Bit-addressable view over packed monochrome bytes.
pub struct PackedBits<B> {
    bytes: B,
    layout: MonoLayout,
    width: usize,
    height: usize,
}

impl<B: AsRef<[u8]>> PackedBits<B> {
    /// Wrap `bytes`, which must hold at least `layout.byte_len(width, height)` bytes.
    pub fn new(bytes: B, layout: MonoLayout, width: usize, height: usize) -> Result<Self> {
        let needed = layout.checked_len(width, height)?;
        let actual = bytes.as_ref().len();
        if actual < needed {
            return Err(ImageError::BufferTooSmall { needed, actual });
        }
        Ok(Self { bytes, layout, width, height })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        let (index, mask) = self.layout.locate(x, y, self.width, self.height);
        self.bytes.as_ref()[index] & mask != 0
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> PackedBits<B> {
    /// Turn pixel (x, y) on. Bits are never cleared.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        let (index, mask) = self.layout.locate(x, y, self.width, self.height);
        self.bytes.as_mut()[index] |= mask;
    }
}

/// Pack a gray or binary raster: a pixel is on when its value is >= 128.
///
/// `dst` is zeroed over the packed length before any bit is set.
pub fn encode(layout: MonoLayout, src: &PixelBuffer, dst: &mut [u8]) -> Result<()> {
    if src.kind() == ColorKind::Truecolor24 {
        return Err(ImageError::InvalidParameter(
            "monochrome encode needs a gray or binary raster".to_string(),
        ));
    }
    let (width, height) = (src.width(), src.height());
    let len = layout.checked_len(width, height)?;
    let mut bits = PackedBits::new(dst, layout, width, height)?;
    bits.bytes[..len].fill(0);

    let pixels = src.as_bytes();
    for y in 0..height {
        let row = &pixels[y * width..(y + 1) * width];
        for (x, &v) in row.iter().enumerate() {
            if v >= 128 {
                bits.set(x, y);
            }
        }
    }
    Ok(())
}

/// Unpack into a truecolor raster: set bits become white, clear bits black.
pub fn decode(layout: MonoLayout, src: &[u8], dst: &mut PixelBuffer) -> Result<()> {
    let (width, height) = (dst.width(), dst.height());
    let bits = PackedBits::new(src, layout, width, height)?;
    dst.reshape(width, height, ColorKind::Truecolor24)?;
    let out = dst.as_bytes_mut();
    out.fill(0);

    for y in 0..height {
        for x in 0..width {
            if bits.get(x, y) {
                let i = (y * width + x) * 3;
                out[i..i + 3].fill(255);
            }
        }
    }
    Ok(())
}
