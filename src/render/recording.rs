//! In-memory surface that records draw commands.

use super::{DrawingSurface, LabelFont};
use crate::model::{Point, Rect};

/// A draw command issued to a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        rect: Rect,
    },
    StrokeRect {
        rect: Rect,
        color: String,
        width: f32,
    },
    FillText {
        text: String,
        position: Point,
        color: String,
        font: LabelFont,
    },
}

/// Surface that keeps what is currently visible as a list of commands.
///
/// Clearing the full surface drops everything recorded before it, so the
/// command list always reflects a single frame.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    /// Number of full-surface clears seen
    frames: usize,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            frames: 0,
        }
    }

    /// Commands of the current frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of full redraws performed so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Outlined rectangles of the current frame with their colors.
    pub fn rects(&self) -> Vec<(Rect, &str)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::StrokeRect { rect, color, .. } => Some((*rect, color.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Label texts of the current frame, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn covers_surface(&self, rect: &Rect) -> bool {
        rect.x <= 0.0
            && rect.y <= 0.0
            && rect.x + rect.width >= self.width
            && rect.y + rect.height >= self.height
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, rect: Rect) {
        if self.covers_surface(&rect) {
            self.commands.clear();
            self.frames += 1;
        }
        self.commands.push(DrawCommand::Clear { rect });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: color.to_string(),
            width,
        });
    }

    fn fill_text(&mut self, text: &str, position: Point, color: &str, font: &LabelFont) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            position,
            color: color.to_string(),
            font: font.clone(),
        });
    }
}
