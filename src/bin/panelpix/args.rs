//! Command-line argument definitions for the panelpix CLI.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use panelpix::encode::parse_color_key;
use panelpix::PixelFormat;

fn parse_format(s: &str) -> Result<PixelFormat, String> {
    s.parse().map_err(|e: panelpix::ImageError| e.to_string())
}

fn parse_key(s: &str) -> Result<u32, String> {
    parse_color_key(s).map_err(|e| e.to_string())
}

// ============================================================================
// Command Line Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "panelpix")]
#[command(author, version, about = "Convert images to and from embedded display pixel formats", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a 24-bit BMP into packed panel bytes
    Encode(EncodeArgs),
    /// Convert packed panel frames back into viewable images
    Decode(DecodeArgs),
}

#[derive(ClapArgs, Debug)]
pub struct EncodeArgs {
    /// Input BMP path (uncompressed, 24 bits per pixel)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target format: name (BITMAP_RL, rcl, RGB565, WEB, ...) or identifier 1-13
    #[arg(short, long, value_parser = parse_format, default_value = "BITMAP_RL")]
    pub format: PixelFormat,

    /// Store 16-bit pixels most significant byte first
    #[arg(long)]
    pub big_endian: bool,

    /// Invert monochrome output
    #[arg(long)]
    pub invert: bool,

    /// Run Sobel edge detection before thresholding (monochrome only)
    #[arg(long)]
    pub edge_detect: bool,

    /// Floyd-Steinberg dithering toward the target format
    #[arg(long)]
    pub dither: bool,

    /// Luminance adjustment, -100 to 100 (monochrome only)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub luminance: i32,

    /// Contrast adjustment, -100 to 100 (monochrome only)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub contrast: i32,

    /// Color written as transparent by ARGB1555/BGRA5551 (0xRRGGBB, #RRGGBB or decimal)
    #[arg(long, value_parser = parse_key, default_value = "0")]
    pub transparent_key: u32,

    /// Output raw packed bytes
    #[arg(long)]
    pub output_raw: Option<PathBuf>,

    /// Output packed bytes as a C array source file
    #[arg(long)]
    pub output_c: Option<PathBuf>,

    /// Output a P6 preview of what the panel will show
    #[arg(long)]
    pub output_ppm: Option<PathBuf>,

    /// Output a PNG preview of what the panel will show
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output JSON metadata usable as `decode --input-metadata`
    #[arg(long)]
    pub output_meta: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct DecodeArgs {
    /// Input file of packed frames
    #[arg(short, long)]
    pub input: PathBuf,

    /// Frame description as JSON text or a path to a JSON file
    ///
    /// Fields: format, width, height, big_endian, offset, head, tail.
    /// Explicit flags override fields from the metadata.
    ///
    /// Example: '{"format": "RGB565", "width": 128, "height": 64}'
    #[arg(long, value_name = "JSON")]
    pub input_metadata: Option<String>,

    /// Packed format: name or identifier 1-13
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<PixelFormat>,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,

    /// 16-bit pixels are stored most significant byte first
    #[arg(long)]
    pub big_endian: bool,

    /// Bytes to skip at the start of the file
    #[arg(long)]
    pub offset: Option<u64>,

    /// Padding bytes before each frame
    #[arg(long)]
    pub head: Option<usize>,

    /// Padding bytes after each frame
    #[arg(long)]
    pub tail: Option<usize>,

    /// Frame to decode (0-based)
    #[arg(long, conflicts_with = "all", allow_hyphen_values = true)]
    pub frame: Option<i64>,

    /// Decode every frame, suffixing output names with _NNNN
    #[arg(long)]
    pub all: bool,

    /// Output P6 preview
    #[arg(long)]
    pub output_ppm: Option<PathBuf>,

    /// Output PNG
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
