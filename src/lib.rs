//! bbox_annotator - Interactive bounding-box annotation engine
//!
//! Draw rectangles over an image with the pointer, label them with project
//! categories (existing or newly created), and hand labeled snapshots to the
//! caller for saving. Boxes are kept in natural image pixels and painted on a
//! fixed-size display surface.
//!
//! ```no_run
//! use bbox_annotator::{AnnotationSession, CategoryChoice, Image, Project, RecordingSurface};
//!
//! # fn main() -> bbox_annotator::Result<()> {
//! let project = Project::new("streets");
//! let image = Image::new("https://example.com/a.jpg", "a.jpg", 800, 600);
//! let mut session = AnnotationSession::open(project, vec![image])?;
//! let mut surface = RecordingSurface::new(900.0, 400.0);
//!
//! let mut board = session.bind(&mut surface);
//! board.pointer_down(100.0, 100.0)?;
//! board.pointer_move(300.0, 250.0)?;
//! board.pointer_up()?;
//! board.choose(CategoryChoice::CreateNew)?;
//! board.submit_name(Some("car"))?;
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod color;
pub mod config;
pub mod constants;
pub mod controller;
pub mod coords;
pub mod error;
pub mod export;
pub mod model;
pub mod persist;
pub mod render;
pub mod session;
pub mod store;

#[cfg(test)]
mod tests;

pub use category::{CategoryAssigner, Resolution};
pub use color::ColorAllocator;
pub use config::{AnnotatorConfig, ConfigError, LogLevel};
pub use controller::{CategoryChoice, ControllerOutput, InteractionController, InteractionEvent, Popup};
pub use coords::CoordinateMapper;
pub use error::{AnnotatorError, Result};
pub use model::{Annotation, Category, Image, Point, Project, Rect};
pub use persist::{AnnotationSink, MemorySink, SaveRequest};
pub use render::{DrawingSurface, RasterSurface, RecordingSurface, Renderer};
pub use session::{AnnotationSession, PointerBinding, Route, SessionCommand};
pub use store::AnnotationStore;
