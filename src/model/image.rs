//! Image data model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::annotation::Annotation;
use crate::error::{AnnotatorError, Result};

/// An image of the project together with its annotation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: Uuid,
    /// Where the caller loads the pixels from
    pub url: String,
    /// Natural width in pixels
    pub width: u32,
    /// Natural height in pixels
    pub height: u32,
    pub filename: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Image {
    /// Create an image without annotations.
    pub fn new(url: &str, filename: &str, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.to_string(),
            width,
            height,
            filename: filename.to_string(),
            annotations: Vec::new(),
        }
    }

    /// Attach existing annotations.
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    /// Natural dimensions, validated to be usable as a scale divisor.
    pub fn natural_size(&self) -> Result<(u32, u32)> {
        if self.width == 0 || self.height == 0 {
            return Err(AnnotatorError::invalid_image_size(self.width, self.height));
        }
        Ok((self.width, self.height))
    }
}
