//! Per-sample rounding rules used during error diffusion.

use crate::format::web;

/// Rounds one channel value to the target's representable set.
pub trait Quantizer {
    /// Returns the rounded value and the error `input - output`.
    fn quantize(&self, v: u8) -> (u8, i8);
}

/// 1-bit target: values above 127 become 255, everything else 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapThreshold;

impl Quantizer for BitmapThreshold {
    #[inline]
    fn quantize(&self, v: u8) -> (u8, i8) {
        if v > 127 {
            (255, (v as i16 - 255) as i8)
        } else {
            (0, v as i8)
        }
    }
}

/// Web-safe palette target: snap to the nearest of the six channel levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSafe;

impl Quantizer for WebSafe {
    #[inline]
    fn quantize(&self, v: u8) -> (u8, i8) {
        let out = web::quantize(v);
        (out, (v as i16 - out as i16) as i8)
    }
}

/// 16-bit targets: drop the low three bits and carry them forward as error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Truncate5;

impl Quantizer for Truncate5 {
    #[inline]
    fn quantize(&self, v: u8) -> (u8, i8) {
        (v & 0xF8, (v & 0x07) as i8)
    }
}
