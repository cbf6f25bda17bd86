//! Annotation board: the project, its images, and the editor for the active one.
//!
//! [`AnnotationSession`] owns all state. Annotations of the active image live
//! in the [`AnnotationStore`]; every other image keeps its own list. Switching
//! images moves lists between the two. Side effects the embedding application
//! must perform (saving, leaving the board) are returned as
//! [`SessionCommand`]s.

mod binding;

pub use binding::PointerBinding;

use uuid::Uuid;

use crate::category::CategoryAssigner;
use crate::color::ColorAllocator;
use crate::config::AnnotatorConfig;
use crate::controller::{ControllerOutput, EditContext, InteractionController, InteractionEvent};
use crate::coords::CoordinateMapper;
use crate::error::{AnnotatorError, Result};
use crate::model::{Annotation, Image, Project, Rect};
use crate::persist::SaveRequest;
use crate::render::{DrawingSurface, Renderer, display_tags};
use crate::store::AnnotationStore;

/// Where the application should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Project overview
    Home,
}

/// Side effect for the caller to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Save a snapshot of one image.
    Persist(SaveRequest),
    /// Leave the board.
    Navigate(Route),
}

/// Row of the annotation list shown next to the board.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationEntry {
    pub id: Uuid,
    /// `"<category><ordinal>"`, `None` while the box awaits a category
    pub tag: Option<String>,
    pub color: String,
}

/// Editing session over one project.
#[derive(Debug)]
pub struct AnnotationSession {
    project: Project,
    images: Vec<Image>,
    /// Index into `images` of the image in the store
    active: Option<usize>,
    store: AnnotationStore,
    controller: InteractionController,
    assigner: CategoryAssigner,
    renderer: Renderer,
    mapper: CoordinateMapper,
    display: (f32, f32),
    next_sequence: u64,
}

impl AnnotationSession {
    /// Open a session with default settings; the first image becomes active.
    pub fn open(project: Project, images: Vec<Image>) -> Result<Self> {
        Self::with_config(project, images, &AnnotatorConfig::default())
    }

    /// Open a session using display and style settings from `config`.
    pub fn with_config(project: Project, images: Vec<Image>, config: &AnnotatorConfig) -> Result<Self> {
        let display = (config.display.width, config.display.height);
        // Validates the display size up front
        CoordinateMapper::new((1, 1), display)?;
        validate_images(&images)?;

        let mut session = Self {
            project,
            images,
            active: None,
            store: AnnotationStore::new(),
            controller: InteractionController::new(config.display.min_box_size),
            assigner: CategoryAssigner::default(),
            renderer: Renderer::new(config.style.clone()),
            mapper: CoordinateMapper::identity(),
            display,
            next_sequence: 1,
        };

        if !session.images.is_empty() {
            session.activate(0)?;
        }
        log::info!(
            "Opened project '{}' with {} images and {} categories",
            session.project.name,
            session.images.len(),
            session.project.categories.len()
        );
        Ok(session)
    }

    /// Replace the color source for new categories.
    pub fn with_allocator(mut self, allocator: ColorAllocator) -> Self {
        self.assigner = CategoryAssigner::new(allocator);
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn display_size(&self) -> (f32, f32) {
        self.display
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Version of the active image's list.
    pub fn version(&self) -> u64 {
        self.store.version()
    }

    /// All images. The active image's own `annotations` field is stale while
    /// it is being edited; use [`AnnotationSession::image_annotations`].
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn active_image(&self) -> Option<&Image> {
        self.active.map(|i| &self.images[i])
    }

    pub fn active_image_id(&self) -> Option<Uuid> {
        self.store.image_id()
    }

    /// Annotations of the active image, in draw order.
    pub fn annotations(&self) -> &[Annotation] {
        self.store.annotations()
    }

    /// Annotations of any image.
    pub fn image_annotations(&self, image_id: Uuid) -> Result<&[Annotation]> {
        if self.store.image_id() == Some(image_id) {
            return Ok(self.store.annotations());
        }
        self.images
            .iter()
            .find(|img| img.id == image_id)
            .map(|img| img.annotations.as_slice())
            .ok_or(AnnotatorError::ImageNotFound(image_id))
    }

    /// Copy of every image with its current annotations, for export.
    pub fn snapshot_images(&self) -> Vec<Image> {
        self.images
            .iter()
            .map(|img| {
                if self.store.image_id() == Some(img.id) {
                    img.clone().with_annotations(self.store.snapshot())
                } else {
                    img.clone()
                }
            })
            .collect()
    }

    /// Annotation list of the active image with display tags.
    pub fn annotation_list(&self) -> Vec<AnnotationEntry> {
        let annotations = self.store.annotations();
        annotations
            .iter()
            .zip(display_tags(annotations))
            .map(|(annotation, tag)| AnnotationEntry {
                id: annotation.id,
                tag,
                color: annotation.category.color.clone(),
            })
            .collect()
    }

    /// Route pointer and popup events to the surface through a scoped binding.
    ///
    /// Binding paints the active image's boxes. Dropping the binding aborts a
    /// drag or pending box still in progress.
    pub fn bind<'a, S: DrawingSurface + ?Sized>(&'a mut self, surface: &'a mut S) -> PointerBinding<'a, S> {
        PointerBinding::new(self, surface)
    }

    /// Feed one interaction event.
    pub fn handle<S: DrawingSurface + ?Sized>(
        &mut self,
        event: InteractionEvent,
        surface: &mut S,
    ) -> Result<Vec<ControllerOutput>> {
        if self.active.is_none() {
            return Err(AnnotatorError::NoActiveImage);
        }
        let mut ctx = EditContext {
            store: &mut self.store,
            project: &mut self.project,
            assigner: &mut self.assigner,
            renderer: &self.renderer,
            mapper: &self.mapper,
            surface,
        };
        self.controller.handle(event, &mut ctx)
    }

    /// Abort an in-progress drag or pending box.
    pub fn reset_interaction<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Vec<ControllerOutput> {
        if self.controller.state().is_idle() {
            return Vec::new();
        }
        let mut ctx = EditContext {
            store: &mut self.store,
            project: &mut self.project,
            assigner: &mut self.assigner,
            renderer: &self.renderer,
            mapper: &self.mapper,
            surface,
        };
        self.controller.reset(&mut ctx)
    }

    /// Repaint the active image's boxes.
    pub fn redraw<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        if self.active.is_none() {
            let (width, height) = surface.size();
            surface.clear(Rect::new(0.0, 0.0, width, height));
            return;
        }
        self.renderer.redraw(
            surface,
            self.store.annotations(),
            self.controller.state().live_box(),
            &self.mapper,
        );
    }

    /// Make `image_id` the active image.
    ///
    /// The image being left loses any unlabeled box and is returned for
    /// saving. Selecting the active image again does nothing.
    pub fn select_image<S: DrawingSurface + ?Sized>(
        &mut self,
        image_id: Uuid,
        surface: &mut S,
    ) -> Result<Vec<SessionCommand>> {
        let index = self
            .index_of(image_id)
            .ok_or(AnnotatorError::ImageNotFound(image_id))?;
        if self.active == Some(index) {
            return Ok(Vec::new());
        }
        // Fail before touching anything if the target cannot be displayed
        self.images[index].natural_size()?;

        let mut commands = Vec::new();
        if self.active.is_some() {
            self.reset_interaction(surface);
            commands.push(SessionCommand::Persist(self.save_request()?));
        }
        self.activate(index)?;
        self.redraw(surface);
        Ok(commands)
    }

    /// Move to the next image, wrapping from the last to the first.
    pub fn next_image<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<Vec<SessionCommand>> {
        self.step(1, surface)
    }

    /// Move to the previous image, wrapping from the first to the last.
    pub fn prev_image<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<Vec<SessionCommand>> {
        self.step(-1, surface)
    }

    fn step<S: DrawingSurface + ?Sized>(&mut self, delta: isize, surface: &mut S) -> Result<Vec<SessionCommand>> {
        let count = self.images.len();
        if count == 0 {
            return Err(AnnotatorError::NoActiveImage);
        }
        let target = match self.active {
            Some(current) => (current as isize + delta).rem_euclid(count as isize) as usize,
            None => 0,
        };
        if self.active == Some(target) {
            // Single image: still save, as moving would have
            return Ok(vec![SessionCommand::Persist(self.save_request()?)]);
        }
        let id = self.images[target].id;
        self.select_image(id, surface)
    }

    /// Save request for the active image.
    pub fn save(&mut self) -> Result<SessionCommand> {
        Ok(SessionCommand::Persist(self.save_request()?))
    }

    /// Save and leave the board.
    pub fn finish<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<Vec<SessionCommand>> {
        let mut commands = Vec::new();
        if self.active.is_some() {
            self.reset_interaction(surface);
            commands.push(SessionCommand::Persist(self.save_request()?));
        }
        commands.push(SessionCommand::Navigate(Route::Home));
        log::info!("Finished annotating '{}'", self.project.name);
        Ok(commands)
    }

    /// Remove every box of the active image.
    pub fn clear<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<Vec<ControllerOutput>> {
        if self.active.is_none() {
            return Err(AnnotatorError::NoActiveImage);
        }
        let mut outputs = self.reset_interaction(surface);
        let removed = self.store.clear();
        log::info!("Cleared {} annotations", removed);
        self.redraw(surface);
        outputs.push(ControllerOutput::AnnotationsChanged(self.store.snapshot()));
        Ok(outputs)
    }

    /// Delete one box of the active image.
    pub fn delete_annotation<S: DrawingSurface + ?Sized>(
        &mut self,
        annotation_id: Uuid,
        surface: &mut S,
    ) -> Result<Vec<ControllerOutput>> {
        if self.controller.state().pending_annotation() == Some(annotation_id) {
            return Ok(self.reset_interaction(surface));
        }
        self.store
            .remove(annotation_id)
            .ok_or(AnnotatorError::AnnotationNotFound(annotation_id))?;
        log::debug!("Deleted annotation {}", annotation_id);
        self.redraw(surface);
        Ok(vec![ControllerOutput::AnnotationsChanged(self.store.snapshot())])
    }

    /// Append images. The first one becomes active if nothing was.
    pub fn add_images<S: DrawingSurface + ?Sized>(
        &mut self,
        images: Vec<Image>,
        surface: &mut S,
    ) -> Result<Vec<SessionCommand>> {
        validate_images(&images)?;
        let first_new = images.first().map(|img| img.id);
        log::info!("Adding {} images", images.len());
        self.images.extend(images);
        match (self.active, first_new) {
            (None, Some(id)) => self.select_image(id, surface),
            _ => Ok(Vec::new()),
        }
    }

    /// Remove an image and return it with its annotations.
    ///
    /// Removing the active image activates the one after it (wrapping to the
    /// first), or nothing when it was the only image.
    pub fn remove_image<S: DrawingSurface + ?Sized>(&mut self, image_id: Uuid, surface: &mut S) -> Result<Image> {
        let index = self
            .index_of(image_id)
            .ok_or(AnnotatorError::ImageNotFound(image_id))?;

        let Some(active) = self.active else {
            return Ok(self.images.remove(index));
        };

        if active != index {
            let removed = self.images.remove(index);
            if index < active {
                self.active = Some(active - 1);
            }
            log::info!("Removed image '{}'", removed.filename);
            return Ok(removed);
        }

        // Index of the successor once `index` is gone
        let remaining = self.images.len() - 1;
        let next = (remaining > 0).then(|| index % remaining);
        if let Some(next) = next {
            let successor = if next >= index { next + 1 } else { next };
            self.images[successor].natural_size()?;
        }

        self.reset_interaction(surface);
        let (_, annotations) = self.store.swap(None, Vec::new());
        self.active = None;
        let removed = self.images.remove(index).with_annotations(annotations);

        if let Some(next) = next {
            self.activate(next)?;
        }
        self.redraw(surface);
        log::info!("Removed image '{}'", removed.filename);
        Ok(removed)
    }

    fn index_of(&self, image_id: Uuid) -> Option<usize> {
        self.images.iter().position(|img| img.id == image_id)
    }

    fn save_request(&mut self) -> Result<SaveRequest> {
        let image_id = self.store.image_id().ok_or(AnnotatorError::NoActiveImage)?;
        let request = SaveRequest::new(self.next_sequence, image_id, self.store.annotations());
        self.next_sequence += 1;
        log::debug!(
            "Save #{} for image {} ({} annotations)",
            request.sequence,
            image_id,
            request.annotations.len()
        );
        Ok(request)
    }

    /// Load `images[index]` into the store, handing the current list back.
    fn activate(&mut self, index: usize) -> Result<()> {
        let natural = self.images[index].natural_size()?;
        let mapper = CoordinateMapper::new(natural, self.display)?;

        let incoming = std::mem::take(&mut self.images[index].annotations);
        let (previous_id, previous) = self.store.swap(Some(self.images[index].id), incoming);
        if let Some(slot) = previous_id.and_then(|id| self.images.iter_mut().find(|img| img.id == id)) {
            slot.annotations = previous;
        }

        self.active = Some(index);
        self.mapper = mapper;
        log::info!(
            "Active image '{}' ({}x{}, {} annotations)",
            self.images[index].filename,
            natural.0,
            natural.1,
            self.store.len()
        );
        Ok(())
    }
}

/// Reject any image whose natural size cannot be mapped.
fn validate_images(images: &[Image]) -> Result<()> {
    for image in images {
        image.natural_size()?;
    }
    Ok(())
}
