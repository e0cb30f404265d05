//! Catalog collaborator interfaces and the group/item data model.
//!
//! The pipeline does not own the media library. It consumes two narrow
//! contracts:
//!
//! - [`Catalog`]: enumerate groups and notify the library when a group's
//!   cover changed so the host picks it up.
//! - [`ItemResolver`]: map a member item to its locally cached thumbnail
//!   file, if one exists.
//!
//! The shippable implementation is [`ManifestCatalog`], backed by a JSON
//! manifest describing groups, their storage directories, and per-item
//! thumbnail paths. Anything that can emit that manifest (a media-server
//! export script, a test fixture) can drive the pipeline.
//!
//! ## Manifest Format
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "id": "b1946ac9",
//!       "name": "Action Movies",
//!       "path": "/library/collections/Action Movies",
//!       "cover": null,
//!       "items": [
//!         { "id": "4b227777", "name": "Die Hard",
//!           "thumbnail": "/library/cache/4b227777-poster.jpg" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `cover` is the group's existing primary image path; groups with a
//! non-empty `cover` are never regenerated. `thumbnail` may be null or
//! missing for items with no cached artwork.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest parse error: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("catalog refused group listing: {0}")]
    Listing(String),
    #[error("notification failed for group {group}: {cause}")]
    Notification { group: String, cause: String },
}

/// A named collection of media items that receives one shared cover image.
#[derive(Debug, Clone)]
pub struct Group {
    /// Stable catalog identifier. Also keys the staging file during publish.
    pub id: String,
    pub name: String,
    /// Storage directory the cover is published into.
    pub path: PathBuf,
    /// Existing primary image, if the group already has one.
    pub cover: Option<PathBuf>,
    pub items: Vec<Item>,
}

impl Group {
    /// Whether this group already has usable cover art.
    ///
    /// An empty path counts as "no cover"; some catalogs export `""`
    /// rather than omitting the field.
    pub fn has_cover(&self) -> bool {
        self.cover.as_ref().is_some_and(|p| !p.as_os_str().is_empty())
    }
}

/// An individual media entry belonging to a group.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: String,
    pub name: String,
}

/// Filter for [`Catalog::list_groups`].
///
/// Catalogs hold more than one kind of grouping (collections, playlists,
/// sagas). A run targets one kind; `None` means every group.
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    pub kind: Option<String>,
}

impl GroupFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
        }
    }
}

/// Read-side and notification contract with the media library.
///
/// `refresh_metadata` and `notify_image_updated` may be called any number
/// of times for the same group; implementations must be idempotent.
pub trait Catalog {
    /// All groups matching the filter, in catalog-defined order.
    ///
    /// The order is preserved for progress reporting but carries no other
    /// meaning. Failure here is fatal to a run.
    fn list_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>, CatalogError>;

    /// Ask the library to re-read the group's metadata from disk.
    fn refresh_metadata(&self, group: &Group) -> Result<(), CatalogError>;

    /// Tell the library the group's cover image changed.
    fn notify_image_updated(&self, group: &Group) -> Result<(), CatalogError>;
}

/// Resolves an item to its locally cached thumbnail file.
pub trait ItemResolver {
    /// Path to the item's thumbnail, or `None` when unresolved.
    ///
    /// Returning a path does not guarantee the file exists; selection
    /// re-checks existence at draw time.
    fn thumbnail_path(&self, item: &Item) -> Option<PathBuf>;
}

// ---------------------------------------------------------------------
// JSON manifest catalog
// ---------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ManifestFile {
    groups: Vec<ManifestGroup>,
}

#[derive(Debug, Deserialize)]
struct ManifestGroup {
    id: String,
    name: String,
    path: PathBuf,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    cover: Option<PathBuf>,
    #[serde(default)]
    items: Vec<ManifestItem>,
}

#[derive(Debug, Deserialize)]
struct ManifestItem {
    id: String,
    name: String,
    #[serde(default)]
    thumbnail: Option<PathBuf>,
}

/// File-backed catalog loaded from a JSON manifest.
///
/// Implements both [`Catalog`] and [`ItemResolver`]: the manifest carries
/// thumbnail paths inline, so resolution is a map lookup. The notification
/// calls are acknowledged no-ops; a file-backed catalog has no caches to
/// invalidate, the published `poster.jpg` on disk is the contract.
pub struct ManifestCatalog {
    groups: Vec<(Option<String>, Group)>,
    thumbnails: HashMap<String, PathBuf>,
}

impl ManifestCatalog {
    /// Load a manifest from disk.
    pub fn load(manifest_path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(manifest_path)?;
        Self::from_json(&raw)
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: ManifestFile = serde_json::from_str(raw)?;

        let mut thumbnails = HashMap::new();
        let mut groups = Vec::with_capacity(file.groups.len());

        for mg in file.groups {
            let items = mg
                .items
                .into_iter()
                .map(|mi| {
                    if let Some(thumb) = mi.thumbnail {
                        thumbnails.insert(mi.id.clone(), thumb);
                    }
                    Item {
                        id: mi.id,
                        name: mi.name,
                    }
                })
                .collect();

            groups.push((
                mg.kind,
                Group {
                    id: mg.id,
                    name: mg.name,
                    path: mg.path,
                    cover: mg.cover,
                    items,
                },
            ));
        }

        Ok(Self { groups, thumbnails })
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl Catalog for ManifestCatalog {
    fn list_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>, CatalogError> {
        Ok(self
            .groups
            .iter()
            .filter(|(kind, _)| match &filter.kind {
                Some(wanted) => kind.as_deref() == Some(wanted.as_str()),
                None => true,
            })
            .map(|(_, group)| group.clone())
            .collect())
    }

    fn refresh_metadata(&self, _group: &Group) -> Result<(), CatalogError> {
        Ok(())
    }

    fn notify_image_updated(&self, _group: &Group) -> Result<(), CatalogError> {
        Ok(())
    }
}

impl ItemResolver for ManifestCatalog {
    fn thumbnail_path(&self, item: &Item) -> Option<PathBuf> {
        self.thumbnails.get(&item.id).cloned()
    }
}
