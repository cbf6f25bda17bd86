//! Annotation storage for the image being edited.
//!
//! The store owns the ordered annotation list of exactly one image at a time.
//! Switching images moves lists in and out instead of copying them, and every
//! mutation bumps a version counter so callers can tell snapshots apart.

use uuid::Uuid;

use crate::model::{Annotation, Category};

/// Ordered, versioned annotation list of the active image.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    /// Image the list belongs to, `None` before any image is loaded.
    image_id: Option<Uuid>,
    /// Annotations in insertion (and render) order.
    annotations: Vec<Annotation>,
    /// Incremented on every mutation.
    version: u64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// ID of the image whose list is loaded.
    pub fn image_id(&self) -> Option<Uuid> {
        self.image_id
    }

    /// Current version. Changes whenever the list changes.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    /// Swap in the list of another image.
    ///
    /// Returns the previously loaded image ID and its list, which the caller
    /// hands back to its owner.
    pub fn swap(
        &mut self,
        image_id: Option<Uuid>,
        annotations: Vec<Annotation>,
    ) -> (Option<Uuid>, Vec<Annotation>) {
        let previous_id = std::mem::replace(&mut self.image_id, image_id);
        let previous = std::mem::replace(&mut self.annotations, annotations);
        self.bump();
        log::debug!(
            "Store swapped {:?} -> {:?} ({} annotations loaded)",
            previous_id,
            self.image_id,
            self.annotations.len()
        );
        (previous_id, previous)
    }

    /// Append an annotation.
    pub fn push(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
        self.bump();
    }

    /// Remove an annotation by ID.
    pub fn remove(&mut self, id: Uuid) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id == id)?;
        let removed = self.annotations.remove(index);
        self.bump();
        Some(removed)
    }

    /// Replace the category of an annotation.
    ///
    /// Returns false if no annotation has this ID.
    pub fn set_category(&mut self, id: Uuid, category: Category) -> bool {
        match self.annotations.iter_mut().find(|a| a.id == id) {
            Some(annotation) => {
                annotation.category = category;
                self.bump();
                true
            }
            None => false,
        }
    }

    /// Get an annotation by ID.
    pub fn get(&self, id: Uuid) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Get all annotations in order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Copy of the current list, for persistence and change notifications.
    pub fn snapshot(&self) -> Vec<Annotation> {
        self.annotations.clone()
    }

    /// Get the number of annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if there are no annotations.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Remove all annotations, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.annotations.len();
        if count > 0 {
            self.annotations.clear();
            self.bump();
        }
        count
    }
}
