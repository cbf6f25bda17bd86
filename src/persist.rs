//! Persistence of annotation snapshots.
//!
//! The engine never saves anything itself. The session hands out
//! [`SaveRequest`]s, each carrying a by-value snapshot of one image's list and
//! a sequence number, and the caller dispatches them to a sink of its choice.
//! Requests for the same image are last-write-wins: a sink may drop a request
//! whose sequence is older than the one it already holds.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::model::Annotation;

/// Snapshot of one image's annotations, ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Monotonic per session; higher means newer
    pub sequence: u64,
    pub image_id: Uuid,
    pub annotations: Vec<Annotation>,
}

impl SaveRequest {
    /// Build a request from the labeled boxes of `annotations`.
    ///
    /// Boxes still waiting for a category are left out.
    pub fn new(sequence: u64, image_id: Uuid, annotations: &[Annotation]) -> Self {
        Self {
            sequence,
            image_id,
            annotations: annotations.iter().filter(|a| !a.is_pending()).cloned().collect(),
        }
    }

    /// Persisted JSON of the snapshot.
    pub fn to_json(&self) -> Result<String> {
        to_json(&self.annotations)
    }
}

/// Serialize an annotation list to its persisted JSON shape.
pub fn to_json(annotations: &[Annotation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(annotations)?)
}

/// Parse a persisted annotation list.
pub fn from_json(json: &str) -> Result<Vec<Annotation>> {
    Ok(serde_json::from_str(json)?)
}

/// Destination for save requests.
pub trait AnnotationSink {
    /// Store a snapshot. Returns false when it was dropped as stale.
    fn save(&mut self, request: SaveRequest) -> Result<bool>;
}

/// Keeps the newest snapshot per image in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    latest: HashMap<Uuid, SaveRequest>,
    dropped: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest saved list of an image.
    pub fn get(&self, image_id: Uuid) -> Option<&[Annotation]> {
        self.latest.get(&image_id).map(|r| r.annotations.as_slice())
    }

    /// Latest request stored for an image.
    pub fn request(&self, image_id: Uuid) -> Option<&SaveRequest> {
        self.latest.get(&image_id)
    }

    /// Number of requests dropped as stale.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

impl AnnotationSink for MemorySink {
    fn save(&mut self, request: SaveRequest) -> Result<bool> {
        let newest = self.latest.get(&request.image_id).map(|r| r.sequence);
        if newest.is_some_and(|sequence| sequence > request.sequence) {
            log::debug!(
                "Dropping stale save #{} for {} (have #{:?})",
                request.sequence,
                request.image_id,
                newest
            );
            self.dropped += 1;
            return Ok(false);
        }
        self.latest.insert(request.image_id, request);
        Ok(true)
    }
}

/// Writes each image's list to `<dir>/<image id>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, image_id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", image_id))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AnnotationSink for DirectorySink {
    fn save(&mut self, request: SaveRequest) -> Result<bool> {
        let path = self.path_for(request.image_id);
        std::fs::write(&path, request.to_json()?)?;
        log::info!(
            "Saved {} annotations to {:?} (#{})",
            request.annotations.len(),
            path,
            request.sequence
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Rect};

    fn labeled(name: &str) -> Annotation {
        Annotation::new(Rect::new(1.0, 2.0, 3.0, 4.0), Category::new(name, "teal"))
    }

    #[test]
    fn test_request_skips_pending_boxes() {
        let list = vec![
            labeled("car"),
            Annotation::pending(Rect::new(0.0, 0.0, 9.0, 9.0), "red"),
        ];
        let request = SaveRequest::new(1, Uuid::new_v4(), &list);
        assert_eq!(request.annotations.len(), 1);
        assert_eq!(request.annotations[0].category_name(), Some("car"));
    }

    #[test]
    fn test_persisted_shape() {
        let ann = labeled("car");
        let json = to_json(std::slice::from_ref(&ann)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entry = &value[0];

        let mut keys: Vec<_> = entry.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["category", "height", "id", "width", "x", "y"]);

        let mut category_keys: Vec<_> = entry["category"].as_object().unwrap().keys().cloned().collect();
        category_keys.sort();
        assert_eq!(category_keys, vec!["color", "id", "name"]);
        assert_eq!(entry["category"]["name"], "car");

        assert_eq!(from_json(&json).unwrap(), vec![ann]);
    }

    #[test]
    fn test_memory_sink_last_write_wins() {
        let mut sink = MemorySink::new();
        let image = Uuid::new_v4();

        assert!(sink.save(SaveRequest::new(2, image, &[labeled("a"), labeled("b")])).unwrap());
        // An older request arriving late is dropped
        assert!(!sink.save(SaveRequest::new(1, image, &[labeled("a")])).unwrap());
        assert_eq!(sink.get(image).unwrap().len(), 2);
        assert_eq!(sink.dropped(), 1);

        assert!(sink.save(SaveRequest::new(3, image, &[])).unwrap());
        assert!(sink.get(image).unwrap().is_empty());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_directory_sink_writes_json() {
        let dir = std::env::temp_dir().join(format!("bbox-annotator-sink-{}", Uuid::new_v4()));
        let mut sink = DirectorySink::new(&dir).unwrap();
        let image = Uuid::new_v4();
        sink.save(SaveRequest::new(1, image, &[labeled("car")])).unwrap();

        let written = std::fs::read_to_string(sink.path_for(image)).unwrap();
        assert_eq!(from_json(&written).unwrap().len(), 1);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
