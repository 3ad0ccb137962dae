//! panelpix CLI
//!
//! `encode`: BMP -> effects -> packed bytes (raw, C array) plus previews and metadata.
//! `decode`: packed frames -> PPM/PNG previews, one frame or all of them.

mod args;

use args::*;
use clap::Parser;
use log::{info, warn};
use std::fs;
use std::path::Path;

use panelpix::output::{
    frame_path, save_png_rgb, write_c_array, write_metadata, write_ppm, write_raw,
};
use panelpix::{DecodeParams, DecodeSession, EncodeParams, EncodeSession, FrameSeek, PixelBuffer};

fn run_encode(args: &EncodeArgs) -> panelpix::Result<()> {
    if args.output_raw.is_none()
        && args.output_c.is_none()
        && args.output_ppm.is_none()
        && args.output.is_none()
        && args.output_meta.is_none()
    {
        warn!("no outputs requested, nothing will be written");
    }

    let mut session = EncodeSession::open(&args.input)?;
    session.configure(EncodeParams {
        format: args.format,
        big_endian: args.big_endian,
        invert: args.invert,
        edge_detect: args.edge_detect,
        dither: args.dither,
        luminance: args.luminance,
        contrast: args.contrast,
        transparent_key: args.transparent_key,
    })?;

    let (w, h) = (session.width(), session.height());
    if args.output_raw.is_some() || args.output_c.is_some() {
        let packed = session.encode()?;
        info!("{} {}x{}: {} bytes", args.format, w, h, packed.len());
        if let Some(ref path) = args.output_raw {
            write_raw(path, &packed)?;
        }
        if let Some(ref path) = args.output_c {
            write_c_array(path, &packed, args.format, w, h)?;
        }
    }

    if args.output_ppm.is_some() || args.output.is_some() {
        let preview = session.preview()?;
        write_previews(&preview, args.output_ppm.as_deref(), args.output.as_deref())?;
    }

    if let Some(ref path) = args.output_meta {
        write_metadata(path, &session.decode_params()?)?;
    }

    session.close();
    Ok(())
}

fn write_previews(image: &PixelBuffer, ppm: Option<&Path>, png: Option<&Path>) -> panelpix::Result<()> {
    if let Some(path) = ppm {
        write_ppm(path, image)?;
    }
    if let Some(path) = png {
        save_png_rgb(path, image)?;
    }
    Ok(())
}

/// Merge `--input-metadata` with explicit flags, flags winning.
fn resolve_decode_params(args: &DecodeArgs) -> panelpix::Result<DecodeParams> {
    let mut params = match args.input_metadata {
        Some(ref meta) if meta.trim_start().starts_with('{') => DecodeParams::from_json(meta)?,
        Some(ref meta) => DecodeParams::from_json(&fs::read_to_string(meta)?)?,
        None => DecodeParams::default(),
    };
    if args.input_metadata.is_none() && args.format.is_none() {
        return Err(panelpix::ImageError::MissingArgument("--format or --input-metadata"));
    }
    if let Some(format) = args.format {
        params.format = format;
    }
    if let Some(width) = args.width {
        params.width = width;
    }
    if let Some(height) = args.height {
        params.height = height;
    }
    if args.big_endian {
        params.big_endian = true;
    }
    if let Some(offset) = args.offset {
        params.offset = offset;
    }
    if let Some(head) = args.head {
        params.head = head;
    }
    if let Some(tail) = args.tail {
        params.tail = tail;
    }
    Ok(params)
}

fn run_decode(args: &DecodeArgs) -> panelpix::Result<()> {
    let params = resolve_decode_params(args)?;
    let mut session = DecodeSession::open(&args.input)?;
    session.configure(params)?;
    let count = session.frame_count()?;
    info!(
        "{}: {} frames of {} bytes ({} {}x{})",
        args.input.display(),
        count,
        session.frame_size()?,
        params.format,
        params.width,
        params.height
    );

    if args.all {
        for i in 0..count {
            session.seek(FrameSeek::Goto(i as i64))?;
            let frame = session.decode_frame()?;
            let ppm = args.output_ppm.as_deref().map(|p| frame_path(p, i));
            let png = args.output.as_deref().map(|p| frame_path(p, i));
            write_previews(frame, ppm.as_deref(), png.as_deref())?;
        }
    } else {
        session.seek(FrameSeek::Goto(args.frame.unwrap_or(0)))?;
        let frame = session.decode_frame()?;
        write_previews(frame, args.output_ppm.as_deref(), args.output.as_deref())?;
    }

    session.close();
    Ok(())
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    match args.command {
        Command::Encode(ref encode) => run_encode(encode),
        Command::Decode(ref decode) => run_decode(decode),
    }
    .map_err(|e| e.to_string())
}
