//! Encode session: truecolor image in, packed panel bytes out.

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::bmp;
use crate::buffer::PingPong;
use crate::decode::DecodeParams;
use crate::effects::EffectsPipeline;
use crate::error::{ImageError, Result};
use crate::format::{codec, CodecOptions, FormatClass, PixelFormat};
use crate::pixel::{ColorKind, PixelBuffer};

/// Parameters for one encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeParams {
    pub format: PixelFormat,
    /// Swap the bytes of 16-bit pixels
    pub big_endian: bool,
    pub invert: bool,
    pub edge_detect: bool,
    pub dither: bool,
    /// -100..=100
    pub luminance: i32,
    /// -100..=100
    pub contrast: i32,
    /// `0x00RRGGBB` encoded as transparent by ARGB1555 and BGRA5551
    pub transparent_key: u32,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            format: PixelFormat::BitmapRl,
            big_endian: false,
            invert: false,
            edge_detect: false,
            dither: false,
            luminance: 0,
            contrast: 0,
            transparent_key: 0,
        }
    }
}

impl EncodeParams {
    pub fn validate(&self) -> Result<()> {
        if !(-100..=100).contains(&self.luminance) {
            return Err(ImageError::InvalidParameter(format!(
                "luminance {} is not in -100..=100",
                self.luminance
            )));
        }
        if !(-100..=100).contains(&self.contrast) {
            return Err(ImageError::InvalidParameter(format!(
                "contrast {} is not in -100..=100",
                self.contrast
            )));
        }
        if self.transparent_key > 0x00FF_FFFF {
            return Err(ImageError::InvalidParameter(format!(
                "transparency key {:#x} has bits above 0xFFFFFF",
                self.transparent_key
            )));
        }
        Ok(())
    }

    pub fn effects(&self) -> EffectsPipeline {
        EffectsPipeline {
            luminance: self.luminance,
            contrast: self.contrast,
            edge_detect: self.edge_detect,
            dither: self.dither,
            invert: self.invert,
        }
    }

    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            big_endian: self.big_endian,
            transparent_key: self.transparent_key,
        }
    }
}

/// Parse a `0x00RRGGBB` color written as `0xRRGGBB`, `#RRGGBB` or decimal.
pub fn parse_color_key(s: &str) -> Result<u32> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(hex) = s.strip_prefix('#') {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse::<u32>()
    };
    match parsed {
        Ok(v) if v <= 0x00FF_FFFF => Ok(v),
        _ => Err(ImageError::InvalidParameter(format!("invalid color key '{}'", s))),
    }
}

/// Owns the source image, the effects working buffers and the active parameters.
#[derive(Debug)]
pub struct EncodeSession {
    original: PixelBuffer,
    buffers: PingPong,
    params: Option<EncodeParams>,
}

impl EncodeSession {
    /// Load a 24-bit BMP file.
    pub fn open(path: &Path) -> Result<Self> {
        let image = bmp::load_bmp(path)?;
        info!("loaded {} ({}x{})", path.display(), image.width(), image.height());
        Self::from_raster(image)
    }

    /// Start from an already decoded truecolor raster.
    pub fn from_raster(image: PixelBuffer) -> Result<Self> {
        if image.kind() != ColorKind::Truecolor24 {
            return Err(ImageError::InvalidParameter("encode input must be truecolor".to_string()));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(ImageError::InvalidParameter("encode input has zero size".to_string()));
        }
        let buffers = PingPong::new(image.width(), image.height())?;
        Ok(Self { original: image, buffers, params: None })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.original.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.original.height()
    }

    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    pub fn params(&self) -> Option<&EncodeParams> {
        self.params.as_ref()
    }

    /// Set parameters and run the effects pipeline on a fresh copy of the source.
    ///
    /// Reconfiguring is allowed; on failure the session is left unconfigured.
    pub fn configure(&mut self, params: EncodeParams) -> Result<()> {
        self.params = None;
        params.validate()?;
        debug!("encode configured: {:?}", params);

        self.buffers.load(&self.original)?;
        params.effects().run(params.format.class(), &mut self.buffers)?;
        self.params = Some(params);
        Ok(())
    }

    fn active(&self) -> Result<&EncodeParams> {
        self.params.as_ref().ok_or(ImageError::MissingArgument("encode parameters"))
    }

    /// Packed size in bytes for the configured format.
    pub fn encoded_size(&self) -> Result<usize> {
        let params = self.active()?;
        params.format.payload_size(self.width(), self.height())
    }

    /// Write the packed bytes into `dst`, returning the number written.
    pub fn encode_into(&self, dst: &mut [u8]) -> Result<usize> {
        let params = self.active()?;
        let needed = params.format.payload_size(self.width(), self.height())?;
        if dst.len() < needed {
            return Err(ImageError::BufferTooSmall { needed, actual: dst.len() });
        }
        dst[..needed].fill(0);
        codec::encode(params.format, self.buffers.current(), &params.codec_options(), dst)
    }

    /// Packed bytes for the configured format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = crate::error::try_alloc_zeroed(self.encoded_size()?)?;
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Size of the RGB888 preview
    pub fn preview_size(&self) -> usize {
        self.width() * self.height() * 3
    }

    /// Truecolor image of what the panel will show.
    ///
    /// Monochrome targets expand the binarized buffer; color targets decode
    /// the packed bytes again so the preview matches them exactly.
    pub fn preview(&self) -> Result<PixelBuffer> {
        let params = self.active()?;
        match params.format.class() {
            FormatClass::Monochrome => self.buffers.current().to_truecolor(),
            FormatClass::WebPalette | FormatClass::Color16 => {
                let mut packed = self.encode()?;
                let mut out = PixelBuffer::new(self.width(), self.height(), ColorKind::Truecolor24)?;
                codec::decode(params.format, &mut packed, &params.codec_options(), &mut out)?;
                Ok(out)
            }
        }
    }

    /// Write the preview as RGB888 into `dst`, returning the number of bytes written.
    pub fn preview_into(&self, dst: &mut [u8]) -> Result<usize> {
        let needed = self.preview_size();
        if dst.len() < needed {
            return Err(ImageError::BufferTooSmall { needed, actual: dst.len() });
        }
        let preview = self.preview()?;
        dst[..needed].copy_from_slice(preview.as_bytes());
        Ok(needed)
    }

    /// Decode parameters that read this session's output back.
    pub fn decode_params(&self) -> Result<DecodeParams> {
        let params = self.active()?;
        Ok(DecodeParams {
            format: params.format,
            width: self.width(),
            height: self.height(),
            big_endian: params.big_endian,
            ..DecodeParams::default()
        })
    }

    /// Release the session's buffers.
    pub fn close(self) {}
}
