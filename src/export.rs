//! COCO-style dataset export.
//!
//! A project exports as one JSON document with `images`, `categories` and
//! `annotations` sections, packaged in a zip archive named after the
//! project. Boxes reference project categories by name, so a box keeps
//! pointing at the right category even when its own category ID differs.

use std::collections::HashMap;
use std::io::{Seek, Write};

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::Result;
use crate::model::{Image, Project};

/// Name of the dataset document inside the archive.
pub const ANNOTATIONS_ENTRY: &str = "annotations.json";

/// Exported dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoDataset {
    /// Lowercase project name
    pub name: String,
    pub images: Vec<CocoImage>,
    pub categories: Vec<CocoCategory>,
    pub annotations: Vec<CocoAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: Uuid,
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub id: Uuid,
    pub image_id: Uuid,
    pub category_id: Uuid,
    pub iscrowd: u8,
    pub area: f32,
    /// `[x, y, width, height]` in natural pixels
    pub bbox: [f32; 4],
}

/// Build the dataset for `project` from `images` and their annotations.
///
/// Boxes without a category, or whose category is not in the project, are
/// skipped with a warning.
pub fn coco_dataset(project: &Project, images: &[Image]) -> CocoDataset {
    let categories: Vec<CocoCategory> = project
        .categories
        .iter()
        .filter_map(|c| {
            c.name.as_ref().map(|name| CocoCategory {
                id: c.id,
                name: name.clone(),
            })
        })
        .collect();
    let by_name: HashMap<&str, Uuid> = categories.iter().map(|c| (c.name.as_str(), c.id)).collect();

    let mut annotations = Vec::new();
    let mut skipped = 0usize;
    for image in images {
        for ann in &image.annotations {
            let Some(category_id) = ann.category_name().and_then(|name| by_name.get(name)) else {
                skipped += 1;
                continue;
            };
            annotations.push(CocoAnnotation {
                id: ann.id,
                image_id: image.id,
                category_id: *category_id,
                iscrowd: 0,
                area: ann.width * ann.height,
                bbox: [ann.x, ann.y, ann.width, ann.height],
            });
        }
    }
    if skipped > 0 {
        log::warn!("Skipped {} boxes without a project category", skipped);
    }

    let images = images
        .iter()
        .map(|img| CocoImage {
            id: img.id,
            filename: img.filename.clone(),
            width: img.width,
            height: img.height,
        })
        .collect::<Vec<_>>();

    log::info!(
        "Exported {} images with {} annotations in {} categories",
        images.len(),
        annotations.len(),
        categories.len()
    );

    CocoDataset {
        name: project.name.to_lowercase(),
        images,
        categories,
        annotations,
    }
}

/// Archive file name for a project: `"<lowercase name>_annotations.zip"`.
pub fn archive_filename(project: &Project) -> String {
    format!("{}_annotations.zip", project.name.to_lowercase())
}

/// Write `dataset` as a zip archive.
///
/// The archive holds [`ANNOTATIONS_ENTRY`] and, for each `(name, bytes)` in
/// `files`, an entry `images/<name>`. Returns the inner writer.
pub fn write_archive<W: Write + Seek>(writer: W, dataset: &CocoDataset, files: &[(&str, &[u8])]) -> Result<W> {
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    zip.start_file(ANNOTATIONS_ENTRY, options)?;
    zip.write_all(serde_json::to_string_pretty(dataset)?.as_bytes())?;

    for (name, bytes) in files {
        zip.start_file(format!("images/{}", name), options)?;
        zip.write_all(bytes)?;
    }

    let writer = zip.finish()?;
    log::debug!("Wrote archive with {} image files", files.len());
    Ok(writer)
}
