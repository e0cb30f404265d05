//! Candidate selection: usable-thumbnail filtering and random sampling.
//!
//! Stage 1 of the per-group pipeline. A member item is *usable* when the
//! resolver knows a thumbnail path for it and that file exists on disk at
//! check time. From the usable set a uniform random sample is drawn
//! without replacement, capped at the configured collage size.
//!
//! Filtering is deliberately forgiving: an unresolved item, an empty
//! path, or a filesystem error while checking existence all exclude that
//! one item rather than failing the group. Libraries with thousands of
//! entries always contain a few broken references.
//!
//! The sample's order is arbitrary; only its composition matters, since
//! grid placement order carries no meaning.

use crate::catalog::{Group, ItemResolver};
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};

/// A sampled item with its resolved thumbnail path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub item_id: String,
    pub name: String,
    pub path: PathBuf,
}

/// Whether a resolved thumbnail path points at a real file right now.
///
/// Transient filesystem errors count as "missing": excluding one item is
/// cheaper than aborting the whole group over a flaky mount.
fn thumbnail_exists(path: &Path) -> bool {
    if path.as_os_str().is_empty() {
        return false;
    }
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Draw up to `max_count` usable candidates from the group's members.
///
/// Returns an empty vector when no member has a usable thumbnail; the
/// caller skips the group, this is not an error. Randomness comes from
/// the injected `rng` so callers can seed deterministic draws.
pub fn select_candidates(
    group: &Group,
    resolver: &dyn ItemResolver,
    max_count: usize,
    rng: &mut impl Rng,
) -> Vec<Candidate> {
    let usable: Vec<Candidate> = group
        .items
        .iter()
        .filter_map(|item| {
            let path = resolver.thumbnail_path(item)?;
            thumbnail_exists(&path).then(|| Candidate {
                item_id: item.id.clone(),
                name: item.name.clone(),
                path,
            })
        })
        .collect();

    if usable.is_empty() {
        return Vec::new();
    }

    let sample_size = max_count.min(usable.len());
    usable
        .choose_multiple(rng, sample_size)
        .cloned()
        .collect()
}
