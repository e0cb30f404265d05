//! CLI output formatting for pipeline runs.
//!
//! Follows the same two-level pattern everywhere: a header line carrying
//! the group's identity and what happened to it, with indented context
//! lines for details (destination path, blank cells, warnings). Progress
//! percentages ride along on completion lines instead of getting lines of
//! their own.
//!
//! # Output Format
//!
//! ```text
//! Generating covers for 4 groups
//! Action Movies (4 images, 2x2 grid)
//!     → Action Movies/folder/poster.jpg
//! Classics: skipped (already has cover art)
//! Empty Set: skipped (no usable images)
//! Slow Burn (4 images, 2x2 grid)
//!     blank cell: Tape Backup (decode /cache/t1.jpg: invalid JPEG)
//!     → Slow Burn/folder/poster.jpg
//!     warning: catalog not notified (refresh disabled)
//!
//! Completed: 2 generated, 1 with cover, 1 empty, 0 failed
//! ```
//!
//! Formatting functions return `Vec<String>` so tests can assert lines
//! without capturing stdout; `print_*` wrappers do the actual printing.

use crate::layout::grid_shape;
use crate::run::{RunEvent, RunOutcome, RunReport, SkipReason};

const INDENT: &str = "    ";

/// Lines for one run event. Some events (progress, run start bookkeeping)
/// format to a single line; per-cell and notification details indent
/// under their group's header.
pub fn format_run_event(event: &RunEvent) -> Vec<String> {
    match event {
        RunEvent::RunStarted { total_groups } => match total_groups {
            0 => vec!["No groups in catalog".to_string()],
            1 => vec!["Generating covers for 1 group".to_string()],
            n => vec![format!("Generating covers for {n} groups")],
        },
        RunEvent::GroupStarted { name, sample_size } => {
            let shape = grid_shape(*sample_size);
            vec![format!(
                "{name} ({sample_size} {}, {}x{} grid)",
                plural(*sample_size, "image", "images"),
                shape.rows,
                shape.cols
            )]
        }
        RunEvent::GroupSkipped { name, reason } => {
            let why = match reason {
                SkipReason::HasCover => "already has cover art",
                SkipReason::NoUsableImages => "no usable images",
            };
            vec![format!("{name}: skipped ({why})")]
        }
        RunEvent::GroupCompleted {
            destination,
            filled_cells,
            sample_size,
            notified,
            ..
        } => {
            let mut lines = vec![format!("{INDENT}→ {}", destination.display())];
            let blank = sample_size - filled_cells;
            if blank > 0 {
                lines.insert(
                    0,
                    format!(
                        "{INDENT}{blank} {} left blank",
                        plural(blank, "cell", "cells")
                    ),
                );
            }
            if !notified {
                lines.push(format!("{INDENT}warning: catalog not notified"));
            }
            lines
        }
        RunEvent::GroupFailed { name, cause } => {
            vec![format!("{name}: failed ({cause})")]
        }
        RunEvent::CellSkipped { item, cause, .. } => {
            vec![format!("{INDENT}blank cell: {item} ({cause})")]
        }
        RunEvent::NotificationFailed { cause, .. } => {
            vec![format!("{INDENT}warning: catalog not notified ({cause})")]
        }
        RunEvent::StagingCleanupFailed { path, cause } => {
            vec![format!(
                "{INDENT}warning: staging file left behind at {} ({cause})",
                path.display()
            )]
        }
        // Percentages are implicit in the per-group lines; a bare
        // progress tick adds nothing on a terminal.
        RunEvent::Progress { .. } => Vec::new(),
    }
}

/// One-line summary of a finished run.
pub fn format_run_summary(report: &RunReport) -> String {
    let outcome = match report.outcome {
        RunOutcome::Completed => "Completed",
        RunOutcome::Cancelled => "Cancelled",
    };
    format!(
        "{outcome}: {} generated, {} with cover, {} empty, {} failed",
        report.generated, report.skipped_existing, report.skipped_empty, report.failed
    )
}

pub fn print_run_event(event: &RunEvent) {
    for line in format_run_event(event) {
        println!("{line}");
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
