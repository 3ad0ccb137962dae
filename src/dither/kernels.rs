/// Error diffusion kernels.
///
/// Provides:
/// - `ErrorKernel`: compile-time kernel description (taps and denominator)
/// - `FloydSteinberg`: the classic 2-row kernel
/// - `diffuse`: spread one pixel's error over a padded canvas

use crate::effects::canvas::PaddedCanvas;

/// Error diffusion kernel trait.
///
/// Taps are `(dx, dy, weight)` relative to the pixel being quantized; every tap
/// must land inside a 1-pixel border around the image.
pub trait ErrorKernel {
    const TAPS: &'static [(isize, usize, i32)];
    const DENOMINATOR: i32;
}

/// Floyd-Steinberg kernel
///
/// ```text
///       *  7
///    3  5  1    (/16)
/// ```
pub struct FloydSteinberg;

impl ErrorKernel for FloydSteinberg {
    const TAPS: &'static [(isize, usize, i32)] = &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)];
    const DENOMINATOR: i32 = 16;
}

/// Add `err * weight / DENOMINATOR` to each tap of (px, py), clamping to 0..=255.
///
/// Coordinates are padded-canvas coordinates. Division truncates toward zero.
#[inline]
pub fn diffuse<K: ErrorKernel>(canvas: &mut PaddedCanvas, px: usize, py: usize, c: usize, err: i8) {
    if err == 0 {
        return;
    }
    let err = err as i32;
    for &(dx, dy, weight) in K::TAPS {
        let nx = px.wrapping_add_signed(dx);
        let ny = py + dy;
        let n = canvas.get(nx, ny, c) as i32 + err * weight / K::DENOMINATOR;
        canvas.set(nx, ny, c, n.clamp(0, 255) as u8);
    }
}
