//! Category popups shown after a box is committed.

use uuid::Uuid;

use crate::constants::{NEW_CATEGORY_OPTION, popup};
use crate::model::Point;

/// Which popup to show.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupKind {
    /// Menu of project categories followed by the "Add New" entry.
    CategoryMenu { options: Vec<String> },
    /// Free text input for a new category name.
    NameInput,
}

/// A popup attached to a pending box.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub annotation_id: Uuid,
    /// Requested top-left corner in display space (the box's bottom-right).
    pub anchor: Point,
    pub kind: PopupKind,
}

impl Popup {
    /// Category menu with only the "Add New" entry; see [`Popup::with_categories`].
    pub fn category_menu(annotation_id: Uuid, anchor: Point) -> Self {
        Self {
            annotation_id,
            anchor,
            kind: PopupKind::CategoryMenu {
                options: vec![NEW_CATEGORY_OPTION.to_string()],
            },
        }
    }

    pub fn name_input(annotation_id: Uuid, anchor: Point) -> Self {
        Self {
            annotation_id,
            anchor,
            kind: PopupKind::NameInput,
        }
    }

    /// Fill a category menu with the given names, keeping "Add New" last.
    /// Other popups are returned unchanged.
    pub fn with_categories<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        if let PopupKind::CategoryMenu { options } = &mut self.kind {
            *options = names
                .iter()
                .map(|name| name.as_ref().to_string())
                .chain(std::iter::once(NEW_CATEGORY_OPTION.to_string()))
                .collect();
        }
        self
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            PopupKind::CategoryMenu { .. } => "select a class",
            PopupKind::NameInput => "enter a new class",
        }
    }

    /// Number of rows the popup body needs.
    pub fn rows(&self) -> usize {
        match &self.kind {
            PopupKind::CategoryMenu { options } => options.len(),
            PopupKind::NameInput => popup::INPUT_ROWS,
        }
    }

    /// Estimated popup size in display pixels.
    pub fn size(&self) -> (f32, f32) {
        (
            popup::WIDTH,
            self.rows() as f32 * popup::ROW_HEIGHT + popup::CHROME_HEIGHT,
        )
    }

    /// Top-left position that keeps the popup inside `viewport`.
    ///
    /// A popup overflowing the right or bottom edge is pulled back so it ends
    /// a margin away from that edge. Never moves above or left of the origin.
    pub fn clamped(&self, viewport: (f32, f32)) -> Point {
        let (width, height) = self.size();
        let (viewport_width, viewport_height) = viewport;

        let mut x = self.anchor.x;
        let mut y = self.anchor.y;
        if x + width > viewport_width {
            x = viewport_width - width - popup::EDGE_MARGIN;
        }
        if y + height > viewport_height {
            y = viewport_height - height - popup::EDGE_MARGIN;
        }
        Point::new(x.max(0.0), y.max(0.0))
    }
}
