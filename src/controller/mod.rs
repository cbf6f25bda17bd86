//! Interactive box drawing and labeling.
//!
//! [`InteractionController`] feeds events through the pure state machine
//! ([`InteractionState::transition`]) and applies the resulting effects to the
//! annotation store, the project, and the drawing surface.

mod popup;
mod state;

pub use popup::{Popup, PopupKind};
pub use state::{CategoryChoice, Effect, InteractionEvent, InteractionState, Transition};

use uuid::Uuid;

use crate::category::{self, CategoryAssigner, Resolution};
use crate::constants;
use crate::coords::CoordinateMapper;
use crate::error::{AnnotatorError, Result};
use crate::model::{Annotation, Project};
use crate::render::{DrawingSurface, Renderer};
use crate::store::AnnotationStore;

/// Notification for the embedding UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerOutput {
    /// The active image's list changed; carries a snapshot.
    AnnotationsChanged(Vec<Annotation>),
    ShowPopup(Popup),
    HidePopup,
}

/// Everything an event may touch, borrowed for the duration of one event.
pub struct EditContext<'a, S: DrawingSurface + ?Sized> {
    pub store: &'a mut AnnotationStore,
    pub project: &'a mut Project,
    pub assigner: &'a mut CategoryAssigner,
    pub renderer: &'a Renderer,
    pub mapper: &'a CoordinateMapper,
    pub surface: &'a mut S,
}

/// Drives the interaction state machine for the active image.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    /// Smallest display-space extent a committed box may have
    min_box: f32,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(constants::MIN_BOX_DISPLAY_SIZE)
    }
}

impl InteractionController {
    pub fn new(min_box: f32) -> Self {
        Self {
            state: InteractionState::Idle,
            min_box,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn min_box(&self) -> f32 {
        self.min_box
    }

    /// Handle one event.
    ///
    /// The state always advances, even if applying an effect fails. On
    /// failure the pending box is dropped so the store never keeps an
    /// unlabeled box.
    pub fn handle<S: DrawingSurface + ?Sized>(
        &mut self,
        event: InteractionEvent,
        ctx: &mut EditContext<'_, S>,
    ) -> Result<Vec<ControllerOutput>> {
        let previous = self.state;
        let Transition { state, effects } = previous.transition(event, self.min_box);
        if state != previous {
            log::debug!("Interaction {:?} -> {:?}", previous, state);
        }
        self.state = state;

        let mut outputs = Vec::new();
        for effect in effects {
            if let Err(err) = self.apply(effect, ctx, &mut outputs) {
                self.recover(ctx, &mut outputs);
                return Err(err);
            }
        }
        Ok(outputs)
    }

    /// Abort a drag or discard a pending box, as if the user cancelled.
    pub fn reset<S: DrawingSurface + ?Sized>(&mut self, ctx: &mut EditContext<'_, S>) -> Vec<ControllerOutput> {
        // Cancel never fails: it only discards and redraws
        match self.handle(InteractionEvent::Cancel, ctx) {
            Ok(outputs) => outputs,
            Err(err) => {
                log::warn!("Reset failed: {}", err);
                Vec::new()
            }
        }
    }

    /// Repaint the surface from the store and the live box.
    pub fn redraw<S: DrawingSurface + ?Sized>(&self, ctx: &mut EditContext<'_, S>) {
        ctx.renderer
            .redraw(ctx.surface, ctx.store.annotations(), self.state.live_box(), ctx.mapper);
    }

    fn apply<S: DrawingSurface + ?Sized>(
        &self,
        effect: Effect,
        ctx: &mut EditContext<'_, S>,
        outputs: &mut Vec<ControllerOutput>,
    ) -> Result<()> {
        match effect {
            Effect::Commit {
                annotation_id,
                display_rect,
            } => {
                let rect = ctx.mapper.to_natural_rect(display_rect);
                let annotation = Annotation {
                    id: annotation_id,
                    ..Annotation::pending(rect, &ctx.renderer.style().placeholder_color)
                };
                log::info!(
                    "Committed box {:.1},{:.1} {:.1}x{:.1} (natural)",
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height
                );
                ctx.store.push(annotation);
                outputs.push(ControllerOutput::AnnotationsChanged(ctx.store.snapshot()));
            }
            Effect::AssignExisting {
                annotation_id,
                name,
            } => {
                let resolution = category::normalize_name(&name)
                    .and_then(|name| ctx.project.category(&name).cloned())
                    .map(Resolution::Existing);
                match resolution {
                    Some(resolution) => self.label(annotation_id, &resolution, ctx, outputs)?,
                    None => {
                        log::warn!("Category '{}' is not in the project, discarding box", name);
                        self.discard(annotation_id, ctx, outputs);
                    }
                }
            }
            Effect::AssignNew {
                annotation_id,
                name,
            } => {
                let resolution = ctx.assigner.resolve(&name, ctx.project)?;
                if resolution == Resolution::Empty {
                    self.discard(annotation_id, ctx, outputs);
                } else {
                    self.label(annotation_id, &resolution, ctx, outputs)?;
                }
            }
            Effect::Discard { annotation_id } => self.discard(annotation_id, ctx, outputs),
            Effect::OpenPopup(popup) => {
                let names = ctx.project.category_names();
                outputs.push(ControllerOutput::ShowPopup(popup.with_categories(&names)));
            }
            Effect::ClosePopup => outputs.push(ControllerOutput::HidePopup),
            Effect::Redraw => self.redraw(ctx),
        }
        Ok(())
    }

    fn label<S: DrawingSurface + ?Sized>(
        &self,
        annotation_id: Uuid,
        resolution: &Resolution,
        ctx: &mut EditContext<'_, S>,
        outputs: &mut Vec<ControllerOutput>,
    ) -> Result<()> {
        let mut annotation = ctx
            .store
            .get(annotation_id)
            .cloned()
            .ok_or(AnnotatorError::AnnotationNotFound(annotation_id))?;
        category::attach(&mut annotation, resolution);
        ctx.store.set_category(annotation_id, annotation.category);
        outputs.push(ControllerOutput::AnnotationsChanged(ctx.store.snapshot()));
        Ok(())
    }

    fn discard<S: DrawingSurface + ?Sized>(
        &self,
        annotation_id: Uuid,
        ctx: &mut EditContext<'_, S>,
        outputs: &mut Vec<ControllerOutput>,
    ) {
        if ctx.store.remove(annotation_id).is_some() {
            log::debug!("Discarded pending box {}", annotation_id);
            outputs.push(ControllerOutput::AnnotationsChanged(ctx.store.snapshot()));
        }
    }

    fn recover<S: DrawingSurface + ?Sized>(
        &mut self,
        ctx: &mut EditContext<'_, S>,
        outputs: &mut Vec<ControllerOutput>,
    ) {
        let stale: Vec<Uuid> = ctx
            .store
            .annotations()
            .iter()
            .filter(|a| a.is_pending())
            .map(|a| a.id)
            .collect();
        for id in stale {
            self.discard(id, ctx, outputs);
        }
        self.state = InteractionState::Idle;
        outputs.push(ControllerOutput::HidePopup);
        self.redraw(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorAllocator, PALETTE};
    use crate::model::{Category, Point, Rect};
    use crate::render::RecordingSurface;

    struct Fixture {
        store: AnnotationStore,
        project: Project,
        assigner: CategoryAssigner,
        renderer: Renderer,
        mapper: CoordinateMapper,
        surface: RecordingSurface,
        controller: InteractionController,
    }

    impl Fixture {
        fn new(project: Project) -> Self {
            Self {
                store: AnnotationStore::new(),
                project,
                assigner: CategoryAssigner::new(ColorAllocator::seeded(9)),
                renderer: Renderer::default(),
                mapper: CoordinateMapper::new((800, 600), (900.0, 400.0)).unwrap(),
                surface: RecordingSurface::new(900.0, 400.0),
                controller: InteractionController::default(),
            }
        }

        fn send(&mut self, event: InteractionEvent) -> Result<Vec<ControllerOutput>> {
            let mut ctx = EditContext {
                store: &mut self.store,
                project: &mut self.project,
                assigner: &mut self.assigner,
                renderer: &self.renderer,
                mapper: &self.mapper,
                surface: &mut self.surface,
            };
            self.controller.handle(event, &mut ctx)
        }

        fn drag(&mut self, from: (f32, f32), to: (f32, f32)) -> Vec<ControllerOutput> {
            let mut outputs = Vec::new();
            for event in [
                InteractionEvent::PointerDown(Point::new(from.0, from.1)),
                InteractionEvent::PointerMove(Point::new(to.0, to.1)),
                InteractionEvent::PointerUp,
            ] {
                outputs.extend(self.send(event).unwrap());
            }
            outputs
        }
    }

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.1
    }

    #[test]
    fn test_commit_stores_natural_pending_box() {
        let mut fx = Fixture::new(Project::new("p"));
        let outputs = fx.drag((100.0, 100.0), (300.0, 250.0));

        assert_eq!(fx.store.len(), 1);
        let ann = &fx.store.annotations()[0];
        assert!(ann.is_pending());
        assert_eq!(ann.category.color, "red");
        assert!(approx_eq(ann.x, 88.9));
        assert!(approx_eq(ann.y, 150.0));
        assert!(approx_eq(ann.width, 177.8));
        assert!(approx_eq(ann.height, 225.0));

        assert!(outputs
            .iter()
            .any(|o| matches!(o, ControllerOutput::AnnotationsChanged(list) if list.len() == 1)));
        assert!(outputs.iter().any(|o| matches!(o, ControllerOutput::ShowPopup(_))));
    }

    #[test]
    fn test_live_box_is_drawn_while_dragging() {
        let mut fx = Fixture::new(Project::new("p"));
        fx.send(InteractionEvent::PointerDown(Point::new(10.0, 10.0))).unwrap();
        fx.send(InteractionEvent::PointerMove(Point::new(60.0, 40.0))).unwrap();

        assert_eq!(fx.surface.rects(), vec![(Rect::new(10.0, 10.0, 50.0, 30.0), "red")]);
        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_menu_lists_project_categories() {
        let project = Project::new("p").with_categories(vec![Category::new("car", "teal")]);
        let mut fx = Fixture::new(project);
        let outputs = fx.drag((10.0, 10.0), (50.0, 50.0));

        let popup = outputs
            .iter()
            .find_map(|o| match o {
                ControllerOutput::ShowPopup(p) => Some(p.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            popup.kind,
            PopupKind::CategoryMenu {
                options: vec!["car".into(), "Add New".into()]
            }
        );
        assert_eq!(popup.anchor, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_existing_selection_labels_box() {
        let project = Project::new("p").with_categories(vec![Category::new("car", "teal")]);
        let mut fx = Fixture::new(project);
        fx.drag((10.0, 10.0), (50.0, 50.0));
        let outputs = fx
            .send(InteractionEvent::CategorySelected(CategoryChoice::Existing("car".into())))
            .unwrap();

        let ann = &fx.store.annotations()[0];
        assert_eq!(ann.category_name(), Some("car"));
        assert_eq!(ann.category.color, "teal");
        assert!(outputs.contains(&ControllerOutput::HidePopup));
        assert_eq!(fx.surface.texts(), vec!["car1"]);
        assert!(fx.controller.state().is_idle());
    }

    #[test]
    fn test_unknown_existing_name_discards() {
        let mut fx = Fixture::new(Project::new("p"));
        fx.drag((10.0, 10.0), (50.0, 50.0));
        fx.send(InteractionEvent::CategorySelected(CategoryChoice::Existing("ghost".into())))
            .unwrap();
        assert!(fx.store.is_empty());
        assert!(fx.project.categories.is_empty());
    }

    #[test]
    fn test_new_name_creates_category() {
        let mut fx = Fixture::new(Project::new("p"));
        fx.drag((10.0, 10.0), (50.0, 50.0));
        fx.send(InteractionEvent::CategorySelected(CategoryChoice::CreateNew)).unwrap();
        fx.send(InteractionEvent::CategoryNameSubmitted(Some("Truck".into())))
            .unwrap();

        assert_eq!(fx.project.categories.len(), 1);
        let ann = &fx.store.annotations()[0];
        assert_eq!(ann.category, fx.project.categories[0]);
        assert_eq!(ann.category_name(), Some("truck"));
    }

    #[test]
    fn test_dismiss_removes_pending_box() {
        let mut fx = Fixture::new(Project::new("p"));
        fx.drag((10.0, 10.0), (50.0, 50.0));
        let version = fx.store.version();
        fx.send(InteractionEvent::CategorySelected(CategoryChoice::Dismissed)).unwrap();

        assert!(fx.store.is_empty());
        assert!(fx.store.version() > version);
        assert!(fx.surface.rects().is_empty());
    }

    #[test]
    fn test_small_drag_never_reaches_store() {
        let mut fx = Fixture::new(Project::new("p"));
        let outputs = fx.drag((10.0, 10.0), (14.0, 200.0));
        assert!(fx.store.is_empty());
        assert!(outputs.is_empty());
        assert_eq!(fx.store.version(), 0);
    }

    #[test]
    fn test_palette_exhaustion_drops_pending_box() {
        let used: Vec<Category> = PALETTE
            .iter()
            .enumerate()
            .map(|(i, color)| Category::new(&format!("c{}", i), color))
            .collect();
        let mut fx = Fixture::new(Project::new("p").with_categories(used));
        fx.drag((10.0, 10.0), (50.0, 50.0));
        fx.send(InteractionEvent::CategorySelected(CategoryChoice::CreateNew)).unwrap();

        let result = fx.send(InteractionEvent::CategoryNameSubmitted(Some("extra".into())));
        assert!(matches!(result, Err(AnnotatorError::PaletteExhausted { .. })));
        assert!(fx.store.is_empty());
        assert!(fx.controller.state().is_idle());
    }

    #[test]
    fn test_reset_discards_pending() {
        let mut fx = Fixture::new(Project::new("p"));
        fx.drag((10.0, 10.0), (50.0, 50.0));
        let mut ctx = EditContext {
            store: &mut fx.store,
            project: &mut fx.project,
            assigner: &mut fx.assigner,
            renderer: &fx.renderer,
            mapper: &fx.mapper,
            surface: &mut fx.surface,
        };
        let outputs = fx.controller.reset(&mut ctx);
        assert!(outputs.contains(&ControllerOutput::HidePopup));
        assert!(fx.store.is_empty());
    }
}
