//! # Covergrid
//!
//! Generates grid-collage cover art for media collections that lack one.
//! A collection's members already have poster thumbnails; covergrid samples
//! a few of them, lays them out in a fixed grid, composites them into a
//! single 1000×1500 poster, and publishes it as the collection's cover.
//!
//! # Architecture: Per-Group Pipeline
//!
//! One run walks every group the catalog knows about and, for each group
//! without a cover, applies four stages in sequence:
//!
//! ```text
//! 1. Select    members  →  sample       (filter usable thumbnails, random draw)
//! 2. Layout    count    →  grid shape   (pure policy table, 1×1 up to 3×3)
//! 3. Compose   sample   →  JPEG bytes   (resize into cells, encode canvas)
//! 4. Publish   bytes    →  poster.jpg   (stage, verify, copy, notify catalog)
//! ```
//!
//! Every stage failure is local to its group: a missing thumbnail, a corrupt
//! source image, or a failed publish never aborts the run. Only two things
//! stop a run early: the catalog refusing to enumerate groups, and a
//! cooperative cancellation request.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Collaborator traits (`Catalog`, `ItemResolver`), group/item model, JSON-manifest catalog |
//! | [`select`] | Stage 1: filters usable thumbnails and draws a random sample |
//! | [`layout`] | Stage 2: pure image-count → grid-shape policy table |
//! | [`compose`] | Stage 3: loads, resizes, and draws samples onto the poster canvas |
//! | [`publish`] | Stage 4: crash-safe staged write of the finished poster |
//! | [`run`] | Drives the per-group loop: progress, cancellation, failure isolation |
//! | [`config`] | `config.toml` loading, validation, and persistence |
//! | [`schedule`] | Daily run time parsing (`HH:mm`) and next-occurrence math |
//! | [`output`] | CLI output formatting, event stream and run summary |
//!
//! # Design Decisions
//!
//! ## Crash-Safe Publication
//!
//! The finished poster is never written directly to its final path. Bytes go
//! to a staging file keyed by group id, are verified non-empty, and only then
//! copied over `<group>/folder/poster.jpg`. A crash mid-run can leave a stale
//! staging file behind, but never a truncated cover that the host media
//! server would cache and serve.
//!
//! ## Blank Cells Over Failed Groups
//!
//! Collections accumulate broken artwork: truncated downloads, renamed
//! files, formats nobody can decode. A collage with one blank cell is still
//! a useful cover, so per-image decode failures skip the cell and keep
//! going. Encoding the finished canvas is the only compositing step allowed
//! to fail the group.
//!
//! ## One Context Object
//!
//! Progress reporting and cancellation travel together in a single
//! [`run::RunContext`] threaded through every stage, rather than as two
//! loose parameters. Cancellation is cooperative: it is checked before each
//! group and before each image load, and an in-progress canvas is discarded
//! rather than published.
//!
//! ## Injectable Randomness
//!
//! Sample selection draws uniformly without replacement through a caller
//! supplied `rand::Rng`. The CLI seeds from entropy; tests seed a `StdRng`
//! and assert exact selections.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod layout;
pub mod output;
pub mod publish;
pub mod run;
pub mod schedule;
pub mod select;

#[cfg(test)]
pub(crate) mod test_helpers;
