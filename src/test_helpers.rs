//! Shared test utilities for the covergrid test suite.
//!
//! Fixture builders for groups, candidates, and synthetic thumbnail
//! files, plus helpers for collecting run events from a context.

use crate::catalog::{Group, Item};
use crate::run::{RunContext, RunEvent};
use crate::select::Candidate;
use image::{ImageEncoder, RgbImage};
use std::path::Path;
use std::sync::mpsc::Receiver;

/// Write a small valid JPEG with a position-dependent gradient, so
/// decoded composites have non-background pixels to assert on.
pub fn write_thumb(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([((x * 7) % 200 + 40) as u8, ((y * 5) % 200 + 40) as u8, 160])
    });
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Decode an in-memory JPEG back into pixels for assertions.
pub fn decode_jpeg(bytes: &[u8]) -> RgbImage {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
        .unwrap()
        .to_rgb8()
}

/// A group with no members and no cover, stored at `path`.
pub fn group_at(id: &str, name: &str, path: &Path) -> Group {
    Group {
        id: id.to_string(),
        name: name.to_string(),
        path: path.to_path_buf(),
        cover: None,
        items: Vec::new(),
    }
}

/// A coverless group whose members have the given item ids; item names
/// mirror their ids.
pub fn group_with_items(id: &str, name: &str, path: &Path, item_ids: &[impl AsRef<str>]) -> Group {
    let mut group = group_at(id, name, path);
    group.items = item_ids
        .iter()
        .map(|item_id| Item {
            id: item_id.as_ref().to_string(),
            name: item_id.as_ref().to_string(),
        })
        .collect();
    group
}

pub fn candidate(item_id: &str, name: &str, path: &Path) -> Candidate {
    Candidate {
        item_id: item_id.to_string(),
        name: name.to_string(),
        path: path.to_path_buf(),
    }
}

/// A context wired to an event channel. Drop the context (or finish the
/// run) before draining so the receiver disconnects.
pub fn event_context() -> (RunContext, Receiver<RunEvent>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (RunContext::with_events(tx), rx)
}

/// Collect every event sent before the context was dropped.
pub fn drain_events(rx: Receiver<RunEvent>) -> Vec<RunEvent> {
    rx.try_iter().collect()
}
