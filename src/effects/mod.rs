//! Image effects applied before lossy encoding.
//!
//! Monochrome targets always go through grayscale, luminance/contrast and the
//! final binarization; Sobel edges, dithering and inversion are optional and
//! run in that order in between. Color targets only have optional dithering
//! with the target's own rounding rule.

pub mod canvas;
pub mod edge;
pub mod tone;

use log::debug;

use crate::buffer::PingPong;
use crate::dither::{self, BitmapThreshold, Truncate5, WebSafe};
use crate::error::Result;
use crate::format::FormatClass;
use crate::pixel::{ColorKind, PixelBuffer};

/// Effect switches and levels for one encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectsPipeline {
    /// -100..=100, 0 leaves tones unchanged
    pub luminance: i32,
    /// -100..=100, 0 leaves tones unchanged
    pub contrast: i32,
    pub edge_detect: bool,
    pub dither: bool,
    pub invert: bool,
}

/// Run one step from the current buffer into the next one, then swap.
fn step<F>(buffers: &mut PingPong, kind: ColorKind, name: &str, f: F) -> Result<()>
where
    F: FnOnce(&PixelBuffer, &mut PixelBuffer) -> Result<()>,
{
    debug!("effect: {}", name);
    let (current, next) = buffers.split(kind)?;
    f(current, next)?;
    buffers.swap();
    Ok(())
}

impl EffectsPipeline {
    /// Apply the enabled steps for `class` to the current buffer of `buffers`.
    ///
    /// On return the current buffer is Binary8 for monochrome targets and
    /// Truecolor24 otherwise.
    pub fn run(&self, class: FormatClass, buffers: &mut PingPong) -> Result<()> {
        match class {
            FormatClass::Monochrome => self.run_monochrome(buffers),
            FormatClass::WebPalette => self.run_color(buffers, &WebSafe),
            FormatClass::Color16 => self.run_color(buffers, &Truncate5),
        }
    }

    fn run_monochrome(&self, buffers: &mut PingPong) -> Result<()> {
        step(buffers, ColorKind::Gray8, "grayscale", tone::to_gray)?;

        let (luminance, contrast) = (self.luminance, self.contrast);
        step(buffers, ColorKind::Gray8, "luminance/contrast", |src, dst| {
            tone::adjust_levels(src, dst, luminance, contrast);
            Ok(())
        })?;

        if self.edge_detect {
            step(buffers, ColorKind::Gray8, "sobel", edge::sobel)?;
        }
        if self.dither {
            step(buffers, ColorKind::Gray8, "floyd-steinberg", |src, dst| {
                dither::floyd_steinberg(src, dst, &BitmapThreshold)
            })?;
        }
        if self.invert {
            step(buffers, ColorKind::Gray8, "invert", |src, dst| {
                tone::invert(src, dst);
                Ok(())
            })?;
        }

        step(buffers, ColorKind::Binary8, "binarize", |src, dst| {
            tone::binarize(src, dst);
            Ok(())
        })
    }

    fn run_color<Q: dither::Quantizer>(&self, buffers: &mut PingPong, quantizer: &Q) -> Result<()> {
        if self.dither {
            step(buffers, ColorKind::Truecolor24, "floyd-steinberg", |src, dst| {
                dither::floyd_steinberg(src, dst, quantizer)
            })?;
        }
        Ok(())
    }
}
