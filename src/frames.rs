//! Frame bookkeeping for files holding fixed-size frames back to back.

use log::warn;

use crate::error::{ImageError, Result};

/// Navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSeek {
    Prev,
    Next,
    Head,
    Tail,
    /// Absolute 0-based frame index
    Goto(i64),
}

/// Current position within a sequence of `count` frames of `frame_size` bytes
/// starting `offset` bytes into the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameIndex {
    offset: u64,
    frame_size: u64,
    count: usize,
    index: usize,
}

impl FrameIndex {
    pub fn new(file_len: u64, offset: u64, frame_size: usize) -> Result<Self> {
        if frame_size == 0 {
            return Err(ImageError::InvalidParameter("frame size must be non-zero".to_string()));
        }
        let frame_size = frame_size as u64;
        let available = file_len.saturating_sub(offset);
        let count = (available / frame_size) as usize;
        let trailing = available % frame_size;
        if trailing != 0 {
            warn!(
                "{} trailing bytes after {} frames of {} bytes",
                trailing, count, frame_size
            );
        }
        Ok(Self { offset, frame_size, count, index: 0 })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Current 0-based frame index
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size as usize
    }

    /// File offset of the current frame
    #[inline]
    pub fn position(&self) -> u64 {
        self.offset + self.index as u64 * self.frame_size
    }

    /// Move according to `seek`. On error the index is unchanged.
    pub fn seek(&mut self, seek: FrameSeek) -> Result<usize> {
        let target = match seek {
            FrameSeek::Prev => {
                if self.index == 0 {
                    return Err(ImageError::AtFileHead);
                }
                self.index - 1
            }
            FrameSeek::Next => {
                if self.index + 1 >= self.count {
                    return Err(ImageError::AtFileTail);
                }
                self.index + 1
            }
            FrameSeek::Head => 0,
            FrameSeek::Tail => {
                if self.count == 0 {
                    return Err(ImageError::SeekOutOfRange { requested: -1, count: 0 });
                }
                self.count - 1
            }
            FrameSeek::Goto(n) => {
                if n < 0 || n as u64 >= self.count as u64 {
                    return Err(ImageError::SeekOutOfRange { requested: n, count: self.count });
                }
                n as usize
            }
        };
        self.index = target;
        Ok(target)
    }
}
