//! Global constants for the annotation engine

/// Width of the fixed-size drawing surface, in display pixels
pub const DISPLAY_WIDTH: f32 = 900.0;

/// Height of the fixed-size drawing surface, in display pixels
pub const DISPLAY_HEIGHT: f32 = 400.0;

/// Boxes narrower or shorter than this (display pixels) are discarded on release
pub const MIN_BOX_DISPLAY_SIZE: f32 = 5.0;

/// Stroke width for annotation rectangles
pub const STROKE_WIDTH: f32 = 2.0;

/// Color of the box being dragged and of boxes awaiting a category
pub const PLACEHOLDER_COLOR: &str = "red";

/// Offset of a label from its box's top-left corner (display pixels)
pub const LABEL_OFFSET_X: f32 = 4.0;
pub const LABEL_OFFSET_Y: f32 = 12.0;

/// Font used for box labels
pub const LABEL_FONT_FAMILY: &str = "monospace";
pub const LABEL_FONT_SIZE: f32 = 14.0;

/// Menu entry that switches the category popup to free-text input
pub const NEW_CATEGORY_OPTION: &str = "Add New";

/// Popup geometry used when keeping popups inside the viewport
pub mod popup {
    /// Popup width
    pub const WIDTH: f32 = 200.0;
    /// Height of one menu row
    pub const ROW_HEIGHT: f32 = 36.0;
    /// Title and padding height added to the rows
    pub const CHROME_HEIGHT: f32 = 40.0;
    /// Rows reserved by the text-input popup
    pub const INPUT_ROWS: usize = 3;
    /// Distance kept from the viewport edge
    pub const EDGE_MARGIN: f32 = 10.0;
}
