//! Surface that paints into an RGBA image.
//!
//! No font is bundled, so labels are drawn as solid chips sized to the text
//! rather than glyphs. Box geometry and colors are exact.

use std::path::Path;

use image::{Rgba, RgbaImage};

use super::{DrawingSurface, LabelFont};
use crate::color::token_to_rgb;
use crate::error::Result;
use crate::model::{Point, Rect};

/// Approximate advance of one monospace glyph relative to the font size.
const GLYPH_ADVANCE: f32 = 0.6;

/// Raster drawing surface backed by an [`RgbaImage`].
///
/// Clearing restores the backdrop the surface was created with, so boxes
/// can be drawn over a scaled copy of the annotated image.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    canvas: RgbaImage,
    backdrop: RgbaImage,
}

impl RasterSurface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let backdrop = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
        Self {
            canvas: backdrop.clone(),
            backdrop,
        }
    }

    /// Surface showing `backdrop` underneath all drawing.
    pub fn with_backdrop(backdrop: RgbaImage) -> Self {
        Self {
            canvas: backdrop.clone(),
            backdrop,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// Write the current frame as a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.canvas.save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Wrote {}x{} frame to {}", self.canvas.width(), self.canvas.height(), path.display());
        Ok(())
    }

    /// Clamp a display-space span to pixel indices, `None` if fully outside.
    fn span(start: f32, end: f32, limit: u32) -> Option<(u32, u32)> {
        let lo = start.floor().max(0.0);
        let hi = end.ceil().min(limit as f32);
        if hi <= lo {
            return None;
        }
        Some((lo as u32, hi as u32))
    }

    fn fill(&mut self, rect: Rect, color: Rgba<u8>) {
        let (w, h) = self.canvas.dimensions();
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::span(rect.x, rect.x + rect.width, w),
            Self::span(rect.y, rect.y + rect.height, h),
        ) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.canvas.put_pixel(x, y, color);
            }
        }
    }
}

fn rgba(token: &str) -> Rgba<u8> {
    let [r, g, b] = token_to_rgb(token);
    Rgba([r, g, b, 255])
}

impl DrawingSurface for RasterSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self, rect: Rect) {
        let (w, h) = self.canvas.dimensions();
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::span(rect.x, rect.x + rect.width, w),
            Self::span(rect.y, rect.y + rect.height, h),
        ) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let pixel = *self.backdrop.get_pixel(x, y);
                self.canvas.put_pixel(x, y, pixel);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f32) {
        let color = rgba(color);
        // Line centered on the rectangle edge
        let half = width / 2.0;
        let outer_x = rect.x - half;
        let outer_y = rect.y - half;
        let outer_w = rect.width + width;
        let outer_h = rect.height + width;

        self.fill(Rect::new(outer_x, outer_y, outer_w, width), color);
        self.fill(Rect::new(outer_x, outer_y + outer_h - width, outer_w, width), color);
        self.fill(Rect::new(outer_x, outer_y, width, outer_h), color);
        self.fill(Rect::new(outer_x + outer_w - width, outer_y, width, outer_h), color);
    }

    fn fill_text(&mut self, text: &str, position: Point, color: &str, font: &LabelFont) {
        let advance = font.size * GLYPH_ADVANCE;
        let chip_width = advance * text.chars().count() as f32;
        // Cap height sits above the baseline
        let chip_height = font.size * 0.7;
        self.fill(
            Rect::new(position.x, position.y - chip_height, chip_width, chip_height),
            rgba(color),
        );
    }
}
