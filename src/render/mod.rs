//! Rendering of annotation boxes and labels onto a drawing surface.
//!
//! The [`Renderer`] is stateless: every redraw clears the surface and paints
//! the given annotation list, in order, followed by the box currently being
//! dragged. Surfaces implement [`DrawingSurface`]; two are provided:
//! [`RecordingSurface`] keeps draw commands in memory and
//! [`RasterSurface`] paints into an RGBA image.

mod raster;
mod recording;

pub use raster::RasterSurface;
pub use recording::{DrawCommand, RecordingSurface};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::coords::CoordinateMapper;
use crate::model::{Annotation, Point, Rect};

/// Font description for box labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelFont {
    pub family: String,
    /// Size in display pixels
    pub size: f32,
    #[serde(default)]
    pub bold: bool,
}

impl LabelFont {
    /// CSS-style shorthand, e.g. `"bold 14px monospace"`.
    pub fn shorthand(&self) -> String {
        if self.bold {
            format!("bold {}px {}", self.size, self.family)
        } else {
            format!("{}px {}", self.size, self.family)
        }
    }
}

impl Default for LabelFont {
    fn default() -> Self {
        Self {
            family: constants::LABEL_FONT_FAMILY.to_string(),
            size: constants::LABEL_FONT_SIZE,
            bold: true,
        }
    }
}

/// Something annotation boxes can be painted on.
///
/// All coordinates are display-space pixels relative to the surface origin.
pub trait DrawingSurface {
    /// Surface size in display pixels.
    fn size(&self) -> (f32, f32);

    /// Erase everything inside `rect`.
    fn clear(&mut self, rect: Rect);

    /// Outline `rect` with a line of `width` pixels.
    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f32);

    /// Draw `text` with its baseline starting at `position`.
    fn fill_text(&mut self, text: &str, position: Point, color: &str, font: &LabelFont);
}

/// Visual style of boxes and labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Outline width for boxes
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,

    /// Color of the live box and of boxes still waiting for a category
    #[serde(default = "default_placeholder_color")]
    pub placeholder_color: String,

    /// Label offset from the box's top-left corner
    #[serde(default = "default_label_offset")]
    pub label_offset: (f32, f32),

    /// Label font
    #[serde(default)]
    pub font: LabelFont,
}

fn default_stroke_width() -> f32 {
    constants::STROKE_WIDTH
}

fn default_placeholder_color() -> String {
    constants::PLACEHOLDER_COLOR.to_string()
}

fn default_label_offset() -> (f32, f32) {
    (constants::LABEL_OFFSET_X, constants::LABEL_OFFSET_Y)
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            stroke_width: default_stroke_width(),
            placeholder_color: default_placeholder_color(),
            label_offset: default_label_offset(),
            font: LabelFont::default(),
        }
    }
}

/// Per-image display tags: `"<category><ordinal>"` for named boxes, where the
/// ordinal counts boxes of the same category seen so far in list order.
/// Unnamed boxes get `None`.
pub fn display_tags(annotations: &[Annotation]) -> Vec<Option<String>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    annotations
        .iter()
        .map(|annotation| {
            annotation.category_name().map(|name| {
                let count = counts.entry(name).or_insert(0);
                *count += 1;
                format!("{}{}", name, count)
            })
        })
        .collect()
}

/// Paints annotations onto a [`DrawingSurface`].
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: RenderStyle,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Clear `surface` and paint `annotations` followed by `live_box`.
    ///
    /// `live_box` is already in display space; annotations are mapped from
    /// natural space with `mapper`.
    pub fn redraw<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        annotations: &[Annotation],
        live_box: Option<Rect>,
        mapper: &CoordinateMapper,
    ) {
        let (width, height) = surface.size();
        surface.clear(Rect::new(0.0, 0.0, width, height));

        let tags = display_tags(annotations);
        for (annotation, tag) in annotations.iter().zip(&tags) {
            let rect = mapper.to_display(annotation.rect());
            let color = annotation.category.color.as_str();
            surface.stroke_rect(rect, color, self.style.stroke_width);

            if let Some(tag) = tag {
                let (dx, dy) = self.style.label_offset;
                surface.fill_text(tag, rect.top_left().translate(dx, dy), color, &self.style.font);
            }
        }

        if let Some(live) = live_box {
            surface.stroke_rect(live, &self.style.placeholder_color, self.style.stroke_width);
        }

        log::trace!(
            "Redrew {} annotations{}",
            annotations.len(),
            if live_box.is_some() { " + live box" } else { "" }
        );
    }
}
