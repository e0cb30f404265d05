//! Pipeline driver: the per-group loop with failure isolation and progress.
//!
//! One [`run`] call is one batch: fetch every group from the catalog, and
//! for each group without cover art, select → compose → publish. Groups
//! are strictly sequential and independent; any per-group failure is
//! reported as an event and the loop moves on. The only fatal error is
//! the catalog refusing to enumerate groups at the start.
//!
//! ## Progress and Cancellation
//!
//! Both travel in a single [`RunContext`]. Progress is a monotonic
//! percentage, `100 × processed / total`, advanced once per group
//! whether it was generated, skipped, or failed. Cancellation is
//! cooperative: a [`CancelToken`] flips a shared flag that the driver
//! checks before each group and the compositor checks before each image
//! load. A cancelled composite is discarded, never published, and its
//! group does not advance the counter.
//!
//! Events stream over a `std::sync::mpsc` channel so a CLI printer thread
//! (or a test) can observe the run without the driver knowing about
//! terminals.

use crate::catalog::{Catalog, GroupFilter, ItemResolver};
use crate::compose::{self, ComposeError};
use crate::config::Config;
use crate::publish;
use crate::select::select_candidates;
use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("catalog enumeration failed: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),
}

/// Why a group was passed over without compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The group already has cover art; existing covers are never
    /// regenerated.
    HasCover,
    /// No member had a usable thumbnail on disk.
    NoUsableImages,
}

/// Observable moments of a run, streamed in order.
#[derive(Debug, Clone)]
pub enum RunEvent {
    RunStarted {
        total_groups: usize,
    },
    GroupStarted {
        name: String,
        sample_size: usize,
    },
    GroupSkipped {
        name: String,
        reason: SkipReason,
    },
    GroupCompleted {
        name: String,
        destination: PathBuf,
        filled_cells: usize,
        sample_size: usize,
        notified: bool,
    },
    GroupFailed {
        name: String,
        cause: String,
    },
    /// One collage cell stayed blank because its source would not decode.
    CellSkipped {
        group: String,
        item: String,
        cause: String,
    },
    /// Catalog refresh/notify failed after a successful on-disk write.
    NotificationFailed {
        group: String,
        cause: String,
    },
    /// Best-effort staging cleanup failed; the file is stale but harmless.
    StagingCleanupFailed {
        path: PathBuf,
        cause: String,
    },
    Progress {
        percent: f64,
    },
}

/// Handle for requesting cooperative cancellation from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress reporting and cancellation, threaded through every stage.
#[derive(Debug, Default)]
pub struct RunContext {
    cancel: CancelToken,
    events: Option<Sender<RunEvent>>,
}

impl RunContext {
    /// Context with no event sink and no pre-armed cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that streams events into `tx`.
    pub fn with_events(tx: Sender<RunEvent>) -> Self {
        Self {
            cancel: CancelToken::new(),
            events: Some(tx),
        }
    }

    /// Token that can cancel this run from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Emit an event if anyone is listening. A hung-up receiver is fine;
    /// reporting must never fail the pipeline.
    pub fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every group was visited.
    Completed,
    /// Cancellation was observed; remaining groups were not visited.
    Cancelled,
}

/// Counters for one run. Skips, failures, and successes sum to
/// `processed`; `processed < total_groups` only for cancelled runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub total_groups: usize,
    pub processed: usize,
    pub generated: usize,
    pub skipped_existing: usize,
    pub skipped_empty: usize,
    pub failed: usize,
}

impl RunReport {
    fn new(total_groups: usize) -> Self {
        Self {
            outcome: RunOutcome::Completed,
            total_groups,
            processed: 0,
            generated: 0,
            skipped_existing: 0,
            skipped_empty: 0,
            failed: 0,
        }
    }
}

/// Execute one batch over every group the catalog lists.
///
/// Configuration is read once from `config` and treated as immutable for
/// the run. Randomness for sample draws comes from `rng`.
pub fn run(
    catalog: &dyn Catalog,
    resolver: &dyn ItemResolver,
    filter: &GroupFilter,
    config: &Config,
    staging_dir: &Path,
    ctx: &RunContext,
    rng: &mut impl Rng,
) -> Result<RunReport, RunError> {
    let groups = catalog.list_groups(filter)?;
    let max_images = config.max_images_in_collage as usize;

    let mut report = RunReport::new(groups.len());
    ctx.emit(RunEvent::RunStarted {
        total_groups: report.total_groups,
    });

    for group in &groups {
        if ctx.is_cancelled() {
            report.outcome = RunOutcome::Cancelled;
            return Ok(report);
        }

        if group.has_cover() {
            report.skipped_existing += 1;
            ctx.emit(RunEvent::GroupSkipped {
                name: group.name.clone(),
                reason: SkipReason::HasCover,
            });
            advance(&mut report, ctx);
            continue;
        }

        let sample = select_candidates(group, resolver, max_images, rng);
        if sample.is_empty() {
            report.skipped_empty += 1;
            ctx.emit(RunEvent::GroupSkipped {
                name: group.name.clone(),
                reason: SkipReason::NoUsableImages,
            });
            advance(&mut report, ctx);
            continue;
        }

        ctx.emit(RunEvent::GroupStarted {
            name: group.name.clone(),
            sample_size: sample.len(),
        });

        let composite = match compose::compose(&group.name, &sample, ctx) {
            Ok(composite) => composite,
            Err(ComposeError::Cancelled) => {
                // The partial canvas is dropped here; nothing was written.
                report.outcome = RunOutcome::Cancelled;
                return Ok(report);
            }
            Err(e) => {
                report.failed += 1;
                ctx.emit(RunEvent::GroupFailed {
                    name: group.name.clone(),
                    cause: e.to_string(),
                });
                advance(&mut report, ctx);
                continue;
            }
        };

        match publish::publish(group, &composite.jpeg, staging_dir, catalog, ctx) {
            Ok(outcome) => {
                report.generated += 1;
                ctx.emit(RunEvent::GroupCompleted {
                    name: group.name.clone(),
                    destination: outcome.destination,
                    filled_cells: composite.filled_cells,
                    sample_size: sample.len(),
                    notified: outcome.notified,
                });
            }
            Err(e) => {
                report.failed += 1;
                ctx.emit(RunEvent::GroupFailed {
                    name: group.name.clone(),
                    cause: e.to_string(),
                });
            }
        }
        advance(&mut report, ctx);
    }

    Ok(report)
}

/// Advance the monotonic progress counter after a group, visited or
/// skipped. An empty catalog reports 0%.
fn advance(report: &mut RunReport, ctx: &RunContext) {
    report.processed += 1;
    let percent = if report.total_groups == 0 {
        0.0
    } else {
        100.0 * report.processed as f64 / report.total_groups as f64
    };
    ctx.emit(RunEvent::Progress { percent });
}
