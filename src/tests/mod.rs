//! End-to-end tests driving a session the way an embedding UI would.
//!
//! Each test opens a session over a small project, binds a recording surface,
//! and checks the store, the rendered frame and the returned commands.


use crate::color::ColorAllocator;
use crate::controller::CategoryChoice;
use crate::error::Result;
use crate::model::{Category, Image, Project};
use crate::render::{DrawingSurface, RecordingSurface};
use crate::session::{AnnotationSession, PointerBinding};

const EPSILON: f32 = 0.05;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Project with a `car` category and two images of different sizes.
fn street_project() -> (Project, Vec<Image>) {
    let project = Project::new("Streets").with_categories(vec![Category::new("car", "teal")]);
    let images = vec![
        Image::new("https://img/a.jpg", "a.jpg", 800, 600),
        Image::new("https://img/b.jpg", "b.jpg", 1800, 800),
    ];
    (project, images)
}

fn open_session() -> AnnotationSession {
    let (project, images) = street_project();
    AnnotationSession::open(project, images)
        .unwrap()
        .with_allocator(ColorAllocator::seeded(17))
}

fn surface() -> RecordingSurface {
    RecordingSurface::new(900.0, 400.0)
}

/// Drag from `from` to `to` on a bound surface.
fn drag<S: DrawingSurface + ?Sized>(board: &mut PointerBinding<'_, S>, from: (f32, f32), to: (f32, f32)) -> Result<()> {
    board.pointer_down(from.0, from.1)?;
    board.pointer_move(to.0, to.1)?;
    board.pointer_up()?;
    Ok(())
}

/// Drag a box and label it with an existing category.
fn draw_existing<S: DrawingSurface + ?Sized>(
    board: &mut PointerBinding<'_, S>,
    from: (f32, f32),
    to: (f32, f32),
    name: &str,
) -> Result<()> {
    drag(board, from, to)?;
    board.choose(CategoryChoice::Existing(name.to_string()))?;
    Ok(())
}

/// Drag a box and label it by typing a name.
fn draw_typed<S: DrawingSurface + ?Sized>(
    board: &mut PointerBinding<'_, S>,
    from: (f32, f32),
    to: (f32, f32),
    name: &str,
) -> Result<()> {
    drag(board, from, to)?;
    board.choose(CategoryChoice::CreateNew)?;
    board.submit_name(Some(name))?;
    Ok(())
}
