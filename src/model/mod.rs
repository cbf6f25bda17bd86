//! Data models for the annotation engine.

mod annotation;
mod category;
mod geometry;
mod image;
mod project;

pub use annotation::Annotation;
pub use category::Category;
pub use geometry::{Point, Rect};
pub use image::Image;
pub use project::Project;
