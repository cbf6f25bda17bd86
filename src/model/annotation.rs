//! Annotation data model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::geometry::Rect;

/// A labeled box in natural image space.
///
/// Serializes to exactly the persisted shape
/// `{id, x, y, width, height, category: {id, name, color}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique identifier.
    pub id: Uuid,
    /// Top-left X in natural pixels.
    pub x: f32,
    /// Top-left Y in natural pixels.
    pub y: f32,
    /// Width in natural pixels.
    pub width: f32,
    /// Height in natural pixels.
    pub height: f32,
    /// The category this box belongs to.
    pub category: Category,
}

impl Annotation {
    /// Create an annotation covering `rect` (natural space) with a fresh ID.
    pub fn new(rect: Rect, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            category,
        }
    }

    /// Create an annotation that still awaits its category.
    pub fn pending(rect: Rect, placeholder_color: &str) -> Self {
        Self::new(rect, Category::pending(placeholder_color))
    }

    /// The box geometry in natural space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Check if the annotation is still waiting for a category.
    pub fn is_pending(&self) -> bool {
        !self.category.is_named()
    }

    /// Name of the category, if assigned.
    pub fn category_name(&self) -> Option<&str> {
        self.category.name.as_deref()
    }
}
