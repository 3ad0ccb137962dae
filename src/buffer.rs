//! Double-buffered working storage for the effects pipeline.
//!
//! Each effect reads from the current buffer and writes into the next one,
//! then the pair is swapped. Ownership of both buffers stays with the
//! `PingPong`, so no step ever aliases its own input.

use crate::error::Result;
use crate::pixel::{ColorKind, PixelBuffer};

// ============================================================================
// PingPong - current/next buffer pair
// ============================================================================

/// A pair of equally sized working buffers with a "current" selector.
#[derive(Debug, Clone)]
pub struct PingPong {
    buffers: [PixelBuffer; 2],
    current: usize,
}

impl PingPong {
    /// Allocate both buffers as truecolor `width` x `height`.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            buffers: [
                PixelBuffer::new(width, height, ColorKind::Truecolor24)?,
                PixelBuffer::new(width, height, ColorKind::Truecolor24)?,
            ],
            current: 0,
        })
    }

    /// Load `source` into the current buffer and reset the selector.
    pub fn load(&mut self, source: &PixelBuffer) -> Result<()> {
        self.current = 0;
        let dst = &mut self.buffers[0];
        dst.reshape(source.width(), source.height(), source.kind())?;
        dst.as_bytes_mut().copy_from_slice(source.as_bytes());
        Ok(())
    }

    #[inline]
    pub fn current(&self) -> &PixelBuffer {
        &self.buffers[self.current]
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffers[self.current]
    }

    /// Borrow the current buffer for reading and the next one for writing.
    ///
    /// The next buffer is reshaped to `kind` with the current geometry.
    pub fn split(&mut self, kind: ColorKind) -> Result<(&PixelBuffer, &mut PixelBuffer)> {
        let (w, h) = (self.current().width(), self.current().height());
        let (a, b) = self.buffers.split_at_mut(1);
        let (cur, next) = if self.current == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        };
        next.reshape(w, h, kind)?;
        Ok((cur, next))
    }

    /// Make the next buffer current.
    #[inline]
    pub fn swap(&mut self) {
        self.current ^= 1;
    }

    /// Consume the pair, returning the current buffer.
    pub fn into_current(self) -> PixelBuffer {
        let [a, b] = self.buffers;
        if self.current == 0 { a } else { b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_alternates() {
        let mut pp = PingPong::new(2, 1).unwrap();
        let src = PixelBuffer::from_raw(2, 1, ColorKind::Truecolor24, vec![1, 2, 3, 4, 5, 6]).unwrap();
        pp.load(&src).unwrap();
        assert_eq!(pp.current().as_bytes(), src.as_bytes());

        {
            let (cur, next) = pp.split(ColorKind::Gray8).unwrap();
            for (i, px) in cur.as_bytes().chunks_exact(3).enumerate() {
                next.as_bytes_mut()[i] = px[0];
            }
        }
        pp.swap();
        assert_eq!(pp.current().kind(), ColorKind::Gray8);
        assert_eq!(pp.current().as_bytes(), &[1, 4]);

        pp.swap();
        assert_eq!(pp.current().as_bytes(), src.as_bytes());
    }

    #[test]
    fn test_into_current() {
        let mut pp = PingPong::new(1, 1).unwrap();
        pp.swap();
        pp.current_mut().as_bytes_mut().copy_from_slice(&[9, 9, 9]);
        assert_eq!(pp.into_current().as_bytes(), &[9, 9, 9]);
    }
}
