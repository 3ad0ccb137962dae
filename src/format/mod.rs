//! Target pixel formats and their codecs.
//!
//! - `pixel_format`: the 13-entry catalog, names, identifiers and size formulas
//! - `monochrome`: bit-addressable view shared by the 8 one-bit variants
//! - `color16`: RGB565, BGR565, ARGB1555, BGRA5551
//! - `web`: 216-color web-safe palette
//! - `codec`: dispatch from a `PixelFormat` to the matching encoder/decoder

pub mod codec;
pub mod color16;
pub mod monochrome;
pub mod pixel_format;
pub mod web;

pub use codec::CodecOptions;
pub use pixel_format::{FormatClass, PixelFormat};
