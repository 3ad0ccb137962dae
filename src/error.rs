//! Error types shared by the codecs, the effects pipeline and the sessions.

use std::path::PathBuf;

/// Errors reported by encode and decode operations.
///
/// `AtFileHead` and `AtFileTail` are sequence boundaries rather than failures;
/// use [`ImageError::is_sequence_boundary`] to tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// A required argument was not supplied.
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// A parameter is out of range or not recognized.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The caller's output buffer cannot hold the result.
    #[error("output buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// The input file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `PREV` was requested on the first frame.
    #[error("already at the first frame")]
    AtFileHead,

    /// `NEXT` was requested on the last frame.
    #[error("already at the last frame")]
    AtFileTail,

    /// `GOTO` target is outside the frame sequence.
    #[error("frame {requested} out of range (sequence has {count} frames)")]
    SeekOutOfRange { requested: i64, count: usize },

    /// A working buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes")]
    Allocation { bytes: usize },

    /// The container magic was not recognized.
    #[error("unrecognized file format")]
    FormatUnknown,

    /// The container is recognized but uses an unsupported variant.
    #[error("unsupported file format: {0}")]
    FormatUnsupported(String),

    /// The container is recognized but its contents are inconsistent.
    #[error("malformed file: {0}")]
    FormatMalformed(String),

    /// Fewer bytes were available than one frame needs.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImageError {
    /// True for the expected at-file-head / at-file-tail outcomes of frame navigation.
    pub fn is_sequence_boundary(&self) -> bool {
        matches!(self, ImageError::AtFileHead | ImageError::AtFileTail)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Allocate a zero-filled byte vector, reporting allocation failure instead of aborting.
pub(crate) fn try_alloc_zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ImageError::Allocation { bytes: len })?;
    buf.resize(len, 0);
    Ok(buf)
}
