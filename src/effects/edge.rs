//! Sobel edge detection on gray rasters.

use crate::effects::canvas::PaddedCanvas;
use crate::error::Result;
use crate::pixel::PixelBuffer;

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

#[inline]
fn convolve(canvas: &PaddedCanvas, px: usize, py: usize, kernel: &[[i32; 3]; 3]) -> i32 {
    let mut sum = 0;
    for (ky, row) in kernel.iter().enumerate() {
        for (kx, &k) in row.iter().enumerate() {
            sum += k * canvas.get(px + kx - 1, py + ky - 1, 0) as i32;
        }
    }
    sum
}

/// Gradient magnitude, approximated as `|gx / 2| + |gy / 2|` clamped to 255.
pub fn sobel(src: &PixelBuffer, dst: &mut PixelBuffer) -> Result<()> {
    let (w, h) = (src.width(), src.height());
    let canvas = PaddedCanvas::from_interleaved(src.as_bytes(), w, h, 1)?;
    let out = dst.as_bytes_mut();

    for y in 0..h {
        for x in 0..w {
            let mut v = 0i32;
            for kernel in [&SOBEL_X, &SOBEL_Y] {
                v = (v + (convolve(&canvas, x + 1, y + 1, kernel) / 2).abs()).min(255);
            }
            out[y * w + x] = v as u8;
        }
    }
    Ok(())
}
