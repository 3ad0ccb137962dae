/// Padded working canvas for neighborhood operations.
///
/// The interior is surrounded by a 1-pixel border replicated from the nearest
/// edge pixel (corners from the corner pixels), so 3x3 convolutions and error
/// diffusion never need bounds checks.

use crate::error::{try_alloc_zeroed, Result};

pub struct PaddedCanvas {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PaddedCanvas {
    /// Build from interleaved `width` x `height` x `channels` pixels.
    pub fn from_interleaved(src: &[u8], width: usize, height: usize, channels: usize) -> Result<Self> {
        debug_assert_eq!(src.len(), width * height * channels);
        let pw = width + 2;
        let ph = height + 2;
        let mut canvas = Self {
            width,
            height,
            channels,
            data: try_alloc_zeroed(pw * ph * channels)?,
        };
        if width == 0 || height == 0 {
            return Ok(canvas);
        }

        // Interior
        let row_len = width * channels;
        for y in 0..height {
            let dst = canvas.offset(1, y + 1);
            canvas.data[dst..dst + row_len].copy_from_slice(&src[y * row_len..(y + 1) * row_len]);
        }

        // Left and right columns, then top and bottom rows (which brings the corners along)
        for py in 1..=height {
            canvas.copy_pixel((1, py), (0, py));
            canvas.copy_pixel((width, py), (width + 1, py));
        }
        let full_row = pw * channels;
        let top = canvas.offset(0, 1);
        canvas.data.copy_within(top..top + full_row, 0);
        let bottom = canvas.offset(0, height);
        let below = canvas.offset(0, height + 1);
        canvas.data.copy_within(bottom..bottom + full_row, below);

        Ok(canvas)
    }

    #[inline]
    fn offset(&self, px: usize, py: usize) -> usize {
        (py * (self.width + 2) + px) * self.channels
    }

    fn copy_pixel(&mut self, from: (usize, usize), to: (usize, usize)) {
        let src = self.offset(from.0, from.1);
        let dst = self.offset(to.0, to.1);
        self.data.copy_within(src..src + self.channels, dst);
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
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Sample at padded coordinates (interior starts at (1, 1)).
    #[inline]
    pub fn get(&self, px: usize, py: usize, c: usize) -> u8 {
        self.data[self.offset(px, py) + c]
    }

    #[inline]
    pub fn set(&mut self, px: usize, py: usize, c: usize, v: u8) {
        let i = self.offset(px, py) + c;
        self.data[i] = v;
    }

    /// Copy the interior back out as interleaved pixels.
    pub fn write_interior(&self, dst: &mut [u8]) {
        let row_len = self.width * self.channels;
        for y in 0..self.height {
            let src = self.offset(1, y + 1);
            dst[y * row_len..(y + 1) * row_len].copy_from_slice(&self.data[src..src + row_len]);
        }
    }
}
