//! Floyd-Steinberg error diffusion over gray or truecolor rasters.
//!
//! The kernel (`kernels`) and the per-sample rounding rule (`quantize`) are
//! independent: the same diffusion loop serves the 1-bit threshold, the
//! web-safe palette and 5-bit truncation.

pub mod kernels;
pub mod quantize;

pub use kernels::{ErrorKernel, FloydSteinberg};
pub use quantize::{BitmapThreshold, Quantizer, Truncate5, WebSafe};

use crate::effects::canvas::PaddedCanvas;
use crate::error::Result;
use crate::pixel::PixelBuffer;

/// Dither `src` into `dst` (same geometry and kind) with kernel `K`.
///
/// Pixels are visited in row-major order and each channel is quantized and
/// diffused on its own.
pub fn error_diffuse<K: ErrorKernel, Q: Quantizer>(src: &PixelBuffer, dst: &mut PixelBuffer, quantizer: &Q) -> Result<()> {
    let channels = src.kind().bytes_per_pixel();
    let mut canvas = PaddedCanvas::from_interleaved(src.as_bytes(), src.width(), src.height(), channels)?;

    for py in 1..=src.height() {
        for px in 1..=src.width() {
            for c in 0..channels {
                let (out, err) = quantizer.quantize(canvas.get(px, py, c));
                canvas.set(px, py, c, out);
                kernels::diffuse::<K>(&mut canvas, px, py, c, err);
            }
        }
    }

    canvas.write_interior(dst.as_bytes_mut());
    Ok(())
}

/// Floyd-Steinberg with the given rounding rule.
pub fn floyd_steinberg<Q: Quantizer>(src: &PixelBuffer, dst: &mut PixelBuffer, quantizer: &Q) -> Result<()> {
    error_diffuse::<FloydSteinberg, Q>(src, dst, quantizer)
}
