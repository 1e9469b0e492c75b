//! Page rasterization
//!
//! This module turns print markup into page images:
//! - The [`Rasterizer`] seam used by the exporter
//! - The built-in SVG rasterizer
//! - Pixel transforms applied before composition

mod svg;

pub use svg::*;

use crate::constants::DEFAULT_PIXEL_RATIO;
use crate::layout::PageBox;
use crate::markdown::PrintMarkup;
use crate::types::{Result, Theme};
use image::RgbaImage;

/// How a page is rasterized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSpec {
    /// Page box in CSS pixels
    pub page_box: PageBox,
    /// Device pixels per CSS pixel
    pub pixel_ratio: f32,
    pub theme: Theme,
}

impl Default for RasterSpec {
    fn default() -> Self {
        Self {
            page_box: PageBox::default(),
            pixel_ratio: DEFAULT_PIXEL_RATIO,
            theme: Theme::default(),
        }
    }
}

impl RasterSpec {
    /// Output image size in device pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        let width = (self.page_box.width * self.pixel_ratio).round().max(1.0);
        let height = (self.page_box.height * self.pixel_ratio).round().max(1.0);
        (width as u32, height as u32)
    }
}

/// Renders page markup to an image.
///
/// A rasterizer may hold an off-screen surface between [`attach`] and
/// [`detach`]; the exporter attaches once per export and always detaches,
/// whether or not the export succeeds.
///
/// [`attach`]: Rasterizer::attach
/// [`detach`]: Rasterizer::detach
pub trait Rasterizer: Send + Sync {
    /// Acquire the off-screen surface
    fn attach(&self) -> Result<()> {
        Ok(())
    }

    /// Render one page at `spec.pixel_ratio`
    fn rasterize(&self, markup: &PrintMarkup, spec: &RasterSpec) -> Result<RgbaImage>;

    /// Release the off-screen surface
    fn detach(&self) {}
}

/// Rotate an image by 180°
pub fn rotate_half_turn(image: &RgbaImage) -> RgbaImage {
    image::imageops::rotate180(image)
}
