//! Category data model for annotation labels.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An annotation category with a name and color token.
///
/// `name` is `None` only while a freshly drawn box waits for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier for the category
    pub id: Uuid,
    /// Lowercase display name of the category
    pub name: Option<String>,
    /// Named color token (e.g. `"teal"`)
    pub color: String,
}

impl Category {
    /// Create a named category with a fresh ID.
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            color: color.to_string(),
        }
    }

    /// Create the unnamed category carried by a box awaiting classification.
    pub fn pending(color: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            color: color.to_string(),
        }
    }

    /// Check whether the category has been assigned a name.
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// Check if this category has the given (already normalized) name.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}
