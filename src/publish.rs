//! Artifact publication: crash-safe write of the finished poster.
//!
//! Stage 4 of the per-group pipeline. The host media server watches
//! `<group>/folder/poster.jpg` and caches whatever it finds there, so a
//! half-written file is worse than no file. Publication therefore goes
//! through a staging protocol:
//!
//! 1. Write the encoded bytes to `<staging>/collage-<group-id>.jpg`,
//!    outside the group's directory.
//! 2. Verify the staging file exists and is non-empty.
//! 3. Create `<group>/folder/` (and parents) as needed.
//! 4. Copy the staging file over the destination. Overwriting is safe;
//!    re-running publish with the same bytes reproduces the same state.
//! 5. Ask the catalog to refresh metadata and note the image update.
//!    Notification failure does not roll back the on-disk write; it is
//!    reported and the outcome is marked not-notified.
//! 6. Best-effort delete of the staging file.
//!
//! Staging files are keyed by group id so parallel runs over disjoint
//! groups cannot collide.

use crate::catalog::{Catalog, Group};
use crate::run::{RunContext, RunEvent};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the group's storage path that holds the cover.
pub const COVER_DIR: &str = "folder";
/// Published cover filename.
pub const COVER_FILENAME: &str = "poster.jpg";

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("staging write failed at {}: {source}", .path.display())]
    StagingWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("staging file missing or empty: {}", .0.display())]
    StagingIncomplete(PathBuf),
    #[error("could not create destination directory {}: {source}", .path.display())]
    DestinationCreate {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("final copy to {} failed: {source}", .path.display())]
    FinalCopy {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result of a successful publication.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Final on-disk location of the cover.
    pub destination: PathBuf,
    /// Whether both catalog notifications went through. The file is on
    /// disk either way.
    pub notified: bool,
}

/// Destination path for a group's cover: `<group>/folder/poster.jpg`.
pub fn cover_destination(group: &Group) -> PathBuf {
    group.path.join(COVER_DIR).join(COVER_FILENAME)
}

/// Staging path for a group's in-flight cover, keyed by group id.
pub fn staging_path(staging_dir: &Path, group: &Group) -> PathBuf {
    staging_dir.join(format!("collage-{}.jpg", group.id))
}

/// Publish the encoded poster for `group` and notify the catalog.
///
/// Idempotent: re-running with the same bytes leaves the destination
/// byte-identical and succeeds.
pub fn publish(
    group: &Group,
    encoded: &[u8],
    staging_dir: &Path,
    catalog: &dyn Catalog,
    ctx: &RunContext,
) -> Result<PublishOutcome, PublishError> {
    let staged = staging_path(staging_dir, group);

    std::fs::create_dir_all(staging_dir).map_err(|source| PublishError::StagingWrite {
        path: staged.clone(),
        source,
    })?;
    std::fs::write(&staged, encoded).map_err(|source| PublishError::StagingWrite {
        path: staged.clone(),
        source,
    })?;

    // Re-read the metadata rather than trusting the write's return: the
    // host system only ever sees what actually landed on disk.
    let staged_len = std::fs::metadata(&staged).map(|m| m.len()).unwrap_or(0);
    if staged_len == 0 {
        return Err(PublishError::StagingIncomplete(staged));
    }

    let destination = cover_destination(group);
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(|source| PublishError::DestinationCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::copy(&staged, &destination).map_err(|source| PublishError::FinalCopy {
        path: destination.clone(),
        source,
    })?;

    let notified = notify_catalog(group, catalog, ctx);

    // Stale staging files are harmless; deletion failure is not worth
    // more than a report.
    if let Err(e) = std::fs::remove_file(&staged) {
        ctx.emit(RunEvent::StagingCleanupFailed {
            path: staged,
            cause: e.to_string(),
        });
    }

    Ok(PublishOutcome {
        destination,
        notified,
    })
}

/// Fire both catalog notifications; report failures without unwinding the
/// on-disk write. Returns whether everything was acknowledged.
fn notify_catalog(group: &Group, catalog: &dyn Catalog, ctx: &RunContext) -> bool {
    let mut notified = true;
    if let Err(e) = catalog.refresh_metadata(group) {
        ctx.emit(RunEvent::NotificationFailed {
            group: group.name.clone(),
            cause: e.to_string(),
        });
        notified = false;
    }
    if let Err(e) = catalog.notify_image_updated(group) {
        ctx.emit(RunEvent::NotificationFailed {
            group: group.name.clone(),
            cause: e.to_string(),
        });
        notified = false;
    }
    notified
}
