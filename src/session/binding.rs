//! Scoped connection between a session and a drawing surface.

use uuid::Uuid;

use super::{AnnotationSession, SessionCommand};
use crate::controller::{CategoryChoice, ControllerOutput, InteractionEvent};
use crate::error::Result;
use crate::model::Point;
use crate::render::DrawingSurface;

/// Pointer subscription of a session on one surface.
///
/// Events reach the session only while the binding lives. Dropping it
/// aborts any drag or pending box and repaints, so nothing half-drawn
/// survives the surface going away.
pub struct PointerBinding<'a, S: DrawingSurface + ?Sized> {
    session: &'a mut AnnotationSession,
    surface: &'a mut S,
}

impl<'a, S: DrawingSurface + ?Sized> PointerBinding<'a, S> {
    pub(super) fn new(session: &'a mut AnnotationSession, surface: &'a mut S) -> Self {
        session.redraw(surface);
        log::debug!("Bound surface {:?}", surface.size());
        Self { session, surface }
    }

    pub fn session(&self) -> &AnnotationSession {
        &*self.session
    }

    pub fn surface(&self) -> &S {
        &*self.surface
    }

    /// Forward a raw event.
    pub fn handle(&mut self, event: InteractionEvent) -> Result<Vec<ControllerOutput>> {
        self.session.handle(event, self.surface)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> Result<Vec<ControllerOutput>> {
        self.handle(InteractionEvent::PointerDown(Point::new(x, y)))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<Vec<ControllerOutput>> {
        self.handle(InteractionEvent::PointerMove(Point::new(x, y)))
    }

    pub fn pointer_up(&mut self) -> Result<Vec<ControllerOutput>> {
        self.handle(InteractionEvent::PointerUp)
    }

    /// Report the category menu's result.
    pub fn choose(&mut self, choice: CategoryChoice) -> Result<Vec<ControllerOutput>> {
        self.handle(InteractionEvent::CategorySelected(choice))
    }

    /// Report the name input's result; `None` when it was dismissed.
    pub fn submit_name(&mut self, name: Option<&str>) -> Result<Vec<ControllerOutput>> {
        self.handle(InteractionEvent::CategoryNameSubmitted(name.map(str::to_string)))
    }

    pub fn cancel(&mut self) -> Result<Vec<ControllerOutput>> {
        self.handle(InteractionEvent::Cancel)
    }

    pub fn select_image(&mut self, image_id: Uuid) -> Result<Vec<SessionCommand>> {
        self.session.select_image(image_id, self.surface)
    }

    pub fn next_image(&mut self) -> Result<Vec<SessionCommand>> {
        self.session.next_image(self.surface)
    }

    pub fn prev_image(&mut self) -> Result<Vec<SessionCommand>> {
        self.session.prev_image(self.surface)
    }

    pub fn clear(&mut self) -> Result<Vec<ControllerOutput>> {
        self.session.clear(self.surface)
    }

    pub fn delete_annotation(&mut self, annotation_id: Uuid) -> Result<Vec<ControllerOutput>> {
        self.session.delete_annotation(annotation_id, self.surface)
    }

    pub fn save(&mut self) -> Result<SessionCommand> {
        self.session.save()
    }

    pub fn finish(&mut self) -> Result<Vec<SessionCommand>> {
        self.session.finish(self.surface)
    }
}

impl<S: DrawingSurface + ?Sized> Drop for PointerBinding<'_, S> {
    fn drop(&mut self) {
        if !self.session.controller().state().is_idle() {
            log::debug!("Binding released mid-interaction, aborting it");
            self.session.reset_interaction(self.surface);
        }
    }
}
