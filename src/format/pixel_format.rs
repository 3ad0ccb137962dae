//! The closed catalog of target pixel formats.
//!
//! Each format has a numeric identifier (1-13, stable across the CLI and the
//! JSON sidecar), a canonical name, a byte-size formula and, for the eight
//! monochrome variants, a bit addressing layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ImageError, Result};
use crate::format::monochrome::{BitOrder, MonoLayout, PlaneLayout, ScanOrder};

/// Broad family a format belongs to; selects the effects applied before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    /// 1 bit per pixel
    Monochrome,
    /// 1 byte per pixel, index into the 216-color web-safe cube
    WebPalette,
    /// 2 bytes per pixel
    Color16,
}

/// Target pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FormatRepr", into = "String")]
pub enum PixelFormat {
    /// Row scan, packed rows, LSB first
    BitmapRl,
    /// Row scan, packed rows, MSB first
    BitmapRm,
    /// Column scan, packed columns, LSB first
    BitmapCl,
    /// Column scan, packed columns, MSB first
    BitmapCm,
    /// Row scan stored in 8-pixel-wide column planes, LSB first
    BitmapRcl,
    /// Row scan stored in 8-pixel-wide column planes, MSB first
    BitmapRcm,
    /// Column scan stored in 8-pixel-tall row planes, LSB first
    BitmapCrl,
    /// Column scan stored in 8-pixel-tall row planes, MSB first
    BitmapCrm,
    /// Web-safe palette index
    Web,
    Rgb565,
    Bgr565,
    Argb1555,
    Bgra5551,
}

impl PixelFormat {
    /// Every format, in identifier order
    pub const ALL: [PixelFormat; 13] = [
        PixelFormat::BitmapRl,
        PixelFormat::BitmapRm,
        PixelFormat::BitmapCl,
        PixelFormat::BitmapCm,
        PixelFormat::BitmapRcl,
        PixelFormat::BitmapRcm,
        PixelFormat::BitmapCrl,
        PixelFormat::BitmapCrm,
        PixelFormat::Web,
        PixelFormat::Rgb565,
        PixelFormat::Bgr565,
        PixelFormat::Argb1555,
        PixelFormat::Bgra5551,
    ];

    /// Look up a format by its numeric identifier (1-13).
    pub fn from_id(id: u32) -> Result<Self> {
        if id == 0 || id as usize > Self::ALL.len() {
            return Err(ImageError::InvalidParameter(format!(
                "format identifier {} is not in 1..={}",
                id,
                Self::ALL.len()
            )));
        }
        Ok(Self::ALL[id as usize - 1])
    }

    /// Numeric identifier (1-13)
    pub fn id(self) -> u32 {
        match self {
            PixelFormat::BitmapRl => 1,
            PixelFormat::BitmapRm => 2,
            PixelFormat::BitmapCl => 3,
            PixelFormat::BitmapCm => 4,
            PixelFormat::BitmapRcl => 5,
            PixelFormat::BitmapRcm => 6,
            PixelFormat::BitmapCrl => 7,
            PixelFormat::BitmapCrm => 8,
            PixelFormat::Web => 9,
            PixelFormat::Rgb565 => 10,
            PixelFormat::Bgr565 => 11,
            PixelFormat::Argb1555 => 12,
            PixelFormat::Bgra5551 => 13,
        }
    }

    /// Canonical upper-case name
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::BitmapRl => "BITMAP_RL",
            PixelFormat::BitmapRm => "BITMAP_RM",
            PixelFormat::BitmapCl => "BITMAP_CL",
            PixelFormat::BitmapCm => "BITMAP_CM",
            PixelFormat::BitmapRcl => "BITMAP_RCL",
            PixelFormat::BitmapRcm => "BITMAP_RCM",
            PixelFormat::BitmapCrl => "BITMAP_CRL",
            PixelFormat::BitmapCrm => "BITMAP_CRM",
            PixelFormat::Web => "WEB",
            PixelFormat::Rgb565 => "RGB565",
            PixelFormat::Bgr565 => "BGR565",
            PixelFormat::Argb1555 => "ARGB1555",
            PixelFormat::Bgra5551 => "BGRA5551",
        }
    }

    pub fn class(self) -> FormatClass {
        match self {
            PixelFormat::Web => FormatClass::WebPalette,
            PixelFormat::Rgb565
            | PixelFormat::Bgr565
            | PixelFormat::Argb1555
            | PixelFormat::Bgra5551 => FormatClass::Color16,
            _ => FormatClass::Monochrome,
        }
    }

    /// Bit addressing for the monochrome variants, `None` for color formats.
    pub fn mono_layout(self) -> Option<MonoLayout> {
        use BitOrder::*;
        use PlaneLayout::*;
        use ScanOrder::*;
        let (scan, planes, bit_order) = match self {
            PixelFormat::BitmapRl => (Row, Packed, Lsb),
            PixelFormat::BitmapRm => (Row, Packed, Msb),
            PixelFormat::BitmapCl => (Column, Packed, Lsb),
            PixelFormat::BitmapCm => (Column, Packed, Msb),
            PixelFormat::BitmapRcl => (Row, Split, Lsb),
            PixelFormat::BitmapRcm => (Row, Split, Msb),
            PixelFormat::BitmapCrl => (Column, Split, Lsb),
            PixelFormat::BitmapCrm => (Column, Split, Msb),
            _ => return None,
        };
        Some(MonoLayout { scan, planes, bit_order })
    }

    /// True for the formats affected by the big-endian byte swap
    pub fn is_16bit(self) -> bool {
        self.class() == FormatClass::Color16
    }

    /// True for the formats carrying a transparency bit
    pub fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Argb1555 | PixelFormat::Bgra5551)
    }

    /// Packed pixel bytes for a `width` x `height` image, without padding.
    pub fn payload_size(self, width: usize, height: usize) -> Result<usize> {
        let size = match self.mono_layout() {
            Some(layout) => layout.byte_len(width, height),
            None => match self.class() {
                FormatClass::WebPalette => width.checked_mul(height),
                _ => width.checked_mul(height).and_then(|n| n.checked_mul(2)),
            },
        };
        size.ok_or_else(|| {
            ImageError::InvalidParameter(format!("{} {}x{} is too large", self, width, height))
        })
    }

    /// Full per-frame size including head and tail padding.
    pub fn frame_size(self, width: usize, height: usize, head: usize, tail: usize) -> Result<usize> {
        self.payload_size(width, height)?
            .checked_add(head)
            .and_then(|n| n.checked_add(tail))
            .ok_or_else(|| {
                ImageError::InvalidParameter(format!("frame padding {}+{} is too large", head, tail))
            })
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = ImageError;

    /// Accepts the canonical name, the name without its `BITMAP_` prefix, or the
    /// numeric identifier. Case-insensitive; `-` is treated as `_`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<u32>() {
            return Self::from_id(id);
        }
        let normalized = trimmed.to_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|f| {
                let name = f.name();
                name == normalized || name.strip_prefix("BITMAP_") == Some(normalized.as_str())
            })
            .ok_or_else(|| ImageError::InvalidParameter(format!("unknown pixel format '{}'", s)))
    }
}

/// Serialized form accepted for a format: its identifier or any accepted name.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormatRepr {
    Id(u32),
    Name(String),
}

impl TryFrom<FormatRepr> for PixelFormat {
    type Error = ImageError;

    fn try_from(repr: FormatRepr) -> Result<Self> {
        match repr {
            FormatRepr::Id(id) => PixelFormat::from_id(id),
            FormatRepr::Name(name) => name.parse(),
        }
    }
}

impl From<PixelFormat> for String {
    fn from(format: PixelFormat) -> String {
        format.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for (i, f) in PixelFormat::ALL.iter().enumerate() {
            assert_eq!(f.id() as usize, i + 1);
            assert_eq!(PixelFormat::from_id(f.id()).unwrap(), *f);
        }
        assert!(matches!(PixelFormat::from_id(0), Err(ImageError::InvalidParameter(_))));
        assert!(matches!(PixelFormat::from_id(14), Err(ImageError::InvalidParameter(_))));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("bitmap_rl".parse::<PixelFormat>().unwrap(), PixelFormat::BitmapRl);
        assert_eq!("crm".parse::<PixelFormat>().unwrap(), PixelFormat::BitmapCrm);
        assert_eq!("Rgb565".parse::<PixelFormat>().unwrap(), PixelFormat::Rgb565);
        assert_eq!("bitmap-rcl".parse::<PixelFormat>().unwrap(), PixelFormat::BitmapRcl);
        assert_eq!("13".parse::<PixelFormat>().unwrap(), PixelFormat::Bgra5551);
        assert!("rgb888".parse::<PixelFormat>().is_err());
        assert!("0".parse::<PixelFormat>().is_err());
    }

    #[test]
    fn test_size_formulas() {
        let (w, h, head, tail) = (15, 9, 3, 5);
        for f in PixelFormat::ALL {
            let expected = match f {
                PixelFormat::BitmapRl | PixelFormat::BitmapRm | PixelFormat::BitmapRcl | PixelFormat::BitmapRcm => {
                    h * 2 + head + tail
                }
                PixelFormat::BitmapCl | PixelFormat::BitmapCm | PixelFormat::BitmapCrl | PixelFormat::BitmapCrm => {
                    2 * w + head + tail
                }
                PixelFormat::Web => w * h + head + tail,
                _ => 2 * w * h + head + tail,
            };
            assert_eq!(f.frame_size(w, h, head, tail).unwrap(), expected, "{}", f);
        }
    }

    #[test]
    fn test_size_overflow_is_an_error() {
        for f in PixelFormat::ALL {
            assert!(matches!(f.payload_size(1 << 33, 1 << 31), Err(ImageError::InvalidParameter(_))), "{}", f);
            assert!(matches!(f.frame_size(8, 8, usize::MAX, 0), Err(ImageError::InvalidParameter(_))), "{}", f);
            assert!(matches!(f.frame_size(8, 8, 1, usize::MAX), Err(ImageError::InvalidParameter(_))), "{}", f);
        }
    }

    #[test]
    fn test_classes() {
        assert_eq!(PixelFormat::BitmapCrm.class(), FormatClass::Monochrome);
        assert_eq!(PixelFormat::Web.class(), FormatClass::WebPalette);
        assert_eq!(PixelFormat::Bgra5551.class(), FormatClass::Color16);
        assert!(PixelFormat::Web.mono_layout().is_none());
        assert!(PixelFormat::Argb1555.has_alpha());
        assert!(!PixelFormat::Rgb565.has_alpha());
    }

    #[test]
    fn test_serde_name_and_id() {
        let json = serde_json::to_string(&PixelFormat::Argb1555).unwrap();
        assert_eq!(json, "\"ARGB1555\"");
        let back: PixelFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PixelFormat::Argb1555);
        let by_id: PixelFormat = serde_json::from_str("9").unwrap();
        assert_eq!(by_id, PixelFormat::Web);
        assert!(serde_json::from_str::<PixelFormat>("42").is_err());
    }
}
