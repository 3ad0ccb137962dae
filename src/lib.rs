//! panelpix - truecolor images to and from embedded display pixel formats
//!
//! Encoding loads a 24-bit BMP, prepares it with the effects pipeline
//! (grayscale, luminance/contrast, edges, dithering, inversion) and packs it
//! into one of 13 formats: eight 1-bit monochrome layouts, the 216-color
//! web-safe palette and four 16-bit color formats. Decoding walks a file of
//! fixed-size packed frames and unpacks any of them back to RGB888.

pub mod bmp;
pub mod buffer;
pub mod decode;
pub mod dither;
pub mod effects;
pub mod encode;
pub mod error;
pub mod format;
pub mod frames;
pub mod output;
pub mod pixel;

pub use decode::{DecodeParams, DecodeSession};
pub use encode::{EncodeParams, EncodeSession};
pub use error::{ImageError, Result};
pub use format::{FormatClass, PixelFormat};
pub use frames::{FrameIndex, FrameSeek};
pub use pixel::{ColorKind, PixelBuffer};
