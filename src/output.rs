/// Output writers for packed bytes and previews.
///
/// - raw packed bytes
/// - C source array (`const unsigned char name[len] = { ... };`)
/// - `P6` portable pixmap preview
/// - PNG preview
/// - JSON decode metadata sidecar

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb};
use log::info;

use crate::decode::DecodeParams;
use crate::error::{ImageError, Result};
use crate::format::PixelFormat;
use crate::pixel::{ColorKind, PixelBuffer};

const C_BYTES_PER_LINE: usize = 16;

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data)?;
    info!("wrote {} ({} bytes)", path.display(), data.len());
    Ok(())
}

pub fn write_raw(path: &Path, data: &[u8]) -> Result<()> {
    write_file(path, data)
}

/// Turn a file stem into a valid C identifier.
pub fn c_identifier(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    let mut ident: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Format packed bytes as a C array definition with a descriptive comment.
pub fn c_array(ident: &str, data: &[u8], format: PixelFormat, width: usize, height: usize) -> String {
    let mut out = String::with_capacity(data.len() * 6 + 128);
    let _ = writeln!(out, "/* {} {}x{}, {} bytes */", format, width, height, data.len());
    let _ = writeln!(out, "const unsigned char {}[{}] = {{", ident, data.len());
    for line in data.chunks(C_BYTES_PER_LINE) {
        out.push_str("   ");
        for b in line {
            let _ = write!(out, " 0x{:02X},", b);
        }
        out.push('\n');
    }
    out.push_str("};\n");
    out
}

pub fn write_c_array(path: &Path, data: &[u8], format: PixelFormat, width: usize, height: usize) -> Result<()> {
    let text = c_array(&c_identifier(path), data, format, width, height);
    write_file(path, text.as_bytes())
}

fn truecolor(image: &PixelBuffer) -> Result<Cow<'_, PixelBuffer>> {
    match image.kind() {
        ColorKind::Truecolor24 => Ok(Cow::Borrowed(image)),
        _ => Ok(Cow::Owned(image.to_truecolor()?)),
    }
}

/// `P6 <w> <h> 255 ` header followed by RGB888 pixels.
pub fn ppm_bytes(image: &PixelBuffer) -> Result<Vec<u8>> {
    let rgb = truecolor(image)?;
    let header = format!("P6 {} {} 255 ", rgb.width(), rgb.height());
    let mut out = Vec::with_capacity(header.len() + rgb.as_bytes().len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(rgb.as_bytes());
    Ok(out)
}

pub fn write_ppm(path: &Path, image: &PixelBuffer) -> Result<()> {
    write_file(path, &ppm_bytes(image)?)
}

pub fn save_png_rgb(path: &Path, image: &PixelBuffer) -> Result<()> {
    let rgb = truecolor(image)?;
    let (w, h) = (rgb.width() as u32, rgb.height() as u32);
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(w, h, rgb.as_bytes().to_vec())
        .ok_or_else(|| ImageError::InvalidParameter("failed to create RGB image buffer".to_string()))?;
    img.save(path)
        .map_err(|e| ImageError::Io(std::io::Error::other(format!("failed to save {}: {}", path.display(), e))))?;
    info!("wrote {}", path.display());
    Ok(())
}

pub fn write_metadata(path: &Path, params: &DecodeParams) -> Result<()> {
    let mut json = params.to_json()?;
    json.push('\n');
    write_file(path, json.as_bytes())
}

/// `dir/name.ext` -> `dir/name_0003.ext` for frame 3 of a multi-frame export.
pub fn frame_path(path: &Path, index: usize) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{:04}.{}", stem, index, ext),
        None => format!("{}_{:04}", stem, index),
    };
    path.with_file_name(name)
}
