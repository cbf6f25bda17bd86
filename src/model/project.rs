//! Project data model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;

/// A project: a name plus the category set shared by all of its images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    /// Ordered category list; names are lowercase and unique
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Project {
    /// Create an empty project.
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            categories: Vec::new(),
        }
    }

    /// Set the initial categories.
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// Find a category by normalized name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.has_name(name))
    }

    /// Colors currently used by the project's categories.
    pub fn colors(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.color.as_str()).collect()
    }

    /// Category names in project order.
    pub fn category_names(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter_map(|c| c.name.as_deref())
            .collect()
    }
}
