//! Category resolution for newly drawn boxes.
//!
//! A box is labeled either by picking an existing project category or by
//! typing a name. Typed names are matched case-insensitively against the
//! project; unknown names mint a new category with a color that no other
//! category of the project uses.

use crate::color::ColorAllocator;
use crate::error::Result;
use crate::model::{Annotation, Category, Project};

/// Outcome of resolving a typed or selected category name.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Input was blank; the pending box must be discarded.
    Empty,
    /// Name matched a project category.
    Existing(Category),
    /// A new category was created and appended to the project.
    Created(Category),
}

impl Resolution {
    /// The category to label with, if any.
    pub fn category(&self) -> Option<&Category> {
        match self {
            Resolution::Empty => None,
            Resolution::Existing(c) | Resolution::Created(c) => Some(c),
        }
    }
}

/// Normalize user input into a category name (trimmed, lowercase).
///
/// Returns `None` for blank input.
pub fn normalize_name(input: &str) -> Option<String> {
    let name = input.trim().to_lowercase();
    if name.is_empty() { None } else { Some(name) }
}

/// Resolves category names against a project, minting new ones as needed.
#[derive(Debug, Default)]
pub struct CategoryAssigner {
    allocator: ColorAllocator,
}

impl CategoryAssigner {
    pub fn new(allocator: ColorAllocator) -> Self {
        Self { allocator }
    }

    /// Resolve `input` against `project`.
    ///
    /// Only the creation path mutates the project. Fails only when a new
    /// category is needed and the palette is exhausted.
    pub fn resolve(&mut self, input: &str, project: &mut Project) -> Result<Resolution> {
        let Some(name) = normalize_name(input) else {
            log::debug!("Blank category input");
            return Ok(Resolution::Empty);
        };

        if let Some(existing) = project.category(&name) {
            log::debug!("Reusing category '{}' ({})", name, existing.color);
            return Ok(Resolution::Existing(existing.clone()));
        }

        let color = self.allocator.allocate(&project.colors())?;
        let category = Category::new(&name, &color);
        project.categories.push(category.clone());
        log::info!(
            "Created category '{}' with color '{}' ({} categories)",
            name,
            color,
            project.categories.len()
        );
        Ok(Resolution::Created(category))
    }

    /// Build the initial categories of a new project from a `;`-separated
    /// class list such as `"car; Person;tree"`.
    ///
    /// Names are normalized, blanks and duplicates dropped, and each class
    /// gets a distinct color.
    pub fn parse_class_list(&mut self, classes: &str) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = Vec::new();
        for name in classes.split(';').filter_map(normalize_name) {
            if categories.iter().any(|c| c.has_name(&name)) {
                continue;
            }
            let used: Vec<&str> = categories.iter().map(|c| c.color.as_str()).collect();
            let color = self.allocator.allocate(&used)?;
            categories.push(Category::new(&name, &color));
        }
        Ok(categories)
    }
}

/// Label `annotation` with a resolved category.
///
/// Reusing an existing category keeps the box's own category ID and copies
/// name and color; a freshly created category is attached as-is so the box
/// and the project entry share one identity. Returns false for
/// [`Resolution::Empty`].
pub fn attach(annotation: &mut Annotation, resolution: &Resolution) -> bool {
    match resolution {
        Resolution::Empty => false,
        Resolution::Existing(category) => {
            annotation.category.name = category.name.clone();
            annotation.category.color = category.color.clone();
            true
        }
        Resolution::Created(category) => {
            annotation.category = category.clone();
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PALETTE;
    use crate::error::AnnotatorError;
    use crate::model::Rect;

    fn assigner() -> CategoryAssigner {
        CategoryAssigner::new(ColorAllocator::seeded(5))
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Car "), Some("car".to_string()));
        assert_eq!(normalize_name("   "), None);
        assert_eq!(normalize_name(""), None);
    }

    #[test]
    fn test_blank_input_is_empty() {
        let mut project = Project::new("p");
        let resolution = assigner().resolve(" \t", &mut project).unwrap();
        assert_eq!(resolution, Resolution::Empty);
        assert!(project.categories.is_empty());
    }

    #[test]
    fn test_case_insensitive_reuse() {
        let mut project = Project::new("p");
        let mut assigner = assigner();

        let first = assigner.resolve("Cat", &mut project).unwrap();
        let second = assigner.resolve("cat", &mut project).unwrap();

        assert!(matches!(first, Resolution::Created(_)));
        assert!(matches!(second, Resolution::Existing(_)));
        assert_eq!(project.categories.len(), 1);
        assert_eq!(project.categories[0].name.as_deref(), Some("cat"));
        assert_eq!(first.category(), second.category());
    }

    #[test]
    fn test_new_category_gets_unused_color() {
        let used: Vec<Category> = PALETTE[..PALETTE.len() - 1]
            .iter()
            .enumerate()
            .map(|(i, color)| Category::new(&format!("class{}", i), color))
            .collect();
        let mut project = Project::new("p").with_categories(used);

        let resolution = assigner().resolve("last", &mut project).unwrap();
        let category = resolution.category().unwrap();
        assert_eq!(category.color, PALETTE[PALETTE.len() - 1]);
    }

    #[test]
    fn test_palette_exhaustion_surfaces_error() {
        let used: Vec<Category> = PALETTE
            .iter()
            .enumerate()
            .map(|(i, color)| Category::new(&format!("class{}", i), color))
            .collect();
        let mut project = Project::new("p").with_categories(used);

        let result = assigner().resolve("one-too-many", &mut project);
        assert!(matches!(result, Err(AnnotatorError::PaletteExhausted { .. })));
        assert_eq!(project.categories.len(), PALETTE.len());

        // Existing names still resolve
        let existing = assigner().resolve("CLASS3", &mut project).unwrap();
        assert!(matches!(existing, Resolution::Existing(_)));
    }

    #[test]
    fn test_attach_existing_keeps_box_identity() {
        let mut project = Project::new("p").with_categories(vec![Category::new("car", "teal")]);
        let mut annotation = Annotation::pending(Rect::new(0.0, 0.0, 10.0, 10.0), "red");
        let box_category_id = annotation.category.id;

        let resolution = assigner().resolve("CAR", &mut project).unwrap();
        assert!(attach(&mut annotation, &resolution));
        assert_eq!(annotation.category.id, box_category_id);
        assert_eq!(annotation.category_name(), Some("car"));
        assert_eq!(annotation.category.color, "teal");
    }

    #[test]
    fn test_attach_created_shares_project_entry() {
        let mut project = Project::new("p");
        let mut annotation = Annotation::pending(Rect::new(0.0, 0.0, 10.0, 10.0), "red");

        let resolution = assigner().resolve("bus", &mut project).unwrap();
        assert!(attach(&mut annotation, &resolution));
        assert_eq!(annotation.category, project.categories[0]);
    }

    #[test]
    fn test_attach_empty_is_rejected() {
        let mut annotation = Annotation::pending(Rect::new(0.0, 0.0, 10.0, 10.0), "red");
        assert!(!attach(&mut annotation, &Resolution::Empty));
        assert!(annotation.is_pending());
    }

    #[test]
    fn test_parse_class_list() {
        let categories = assigner().parse_class_list("car; Person ;;car;TREE").unwrap();
        let names: Vec<_> = categories.iter().filter_map(|c| c.name.as_deref()).collect();
        assert_eq!(names, vec!["car", "person", "tree"]);

        let mut colors: Vec<_> = categories.iter().map(|c| c.color.as_str()).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 3);
    }
}
