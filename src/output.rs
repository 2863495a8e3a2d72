//! CLI output formatting for all pipeline stages.
//!
//! Output is **information-centric, not file-centric**: every recipe leads
//! with its positional index and title, with paths and per-record status
//! as trailing context. Failures always carry their reason — a build never
//! fails silently.
//!
//! ```text
//! Recipes
//!     001 Flatbread → breads/flatbread.md (skipped)
//!     002 Tomato Soup → soups/tomato-soup.md (written)
//!     003 broken.json (failed: invalid JSON: expected value at line 1)
//!
//! Cleaned
//!     removed soups/gone.md
//!     removed empty dir soups/
//!
//! Indexes
//!     _all.md (written)
//!     tags.md (written)
//!     2 pages unchanged
//!
//! 1 written, 1 skipped, 1 failed
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::indexes::IndexReport;
use crate::process::{BuildReport, RecordStatus};
use crate::reconcile::ReconcileReport;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

// ============================================================================
// Build stage
// ============================================================================

/// Per-record status lines for a build pass.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Recipes".to_string()];
    if report.outcomes.is_empty() {
        lines.push("    (no recipe sources found)".to_string());
        return lines;
    }

    for (i, outcome) in report.outcomes.iter().enumerate() {
        let index = format_index(i + 1);
        let line = match (&outcome.status, &outcome.output) {
            (RecordStatus::Written, Some(out)) => {
                format!("    {} {} \u{2192} {} (written)", index, outcome.title, out.display())
            }
            (RecordStatus::Skipped, Some(out)) => {
                format!("    {} {} \u{2192} {} (skipped)", index, outcome.title, out.display())
            }
            (RecordStatus::Failed(reason), Some(out)) => {
                format!(
                    "    {} {} \u{2192} {} (failed: {})",
                    index,
                    outcome.title,
                    out.display(),
                    reason
                )
            }
            (RecordStatus::Failed(reason), None) => {
                let name = outcome
                    .source
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| outcome.source.display().to_string());
                format!("    {} {} (failed: {})", index, name, reason)
            }
            // Written/Skipped always carry an output path
            (_, None) => format!("    {} {}", index, outcome.title),
        };
        lines.push(line);
    }
    lines
}

/// The final one-line tally for a build pass.
pub fn format_summary(report: &BuildReport) -> String {
    format!(
        "{} written, {} skipped, {} failed",
        report.written(),
        report.skipped(),
        report.failed()
    )
}

pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Reconcile stage
// ============================================================================

/// Lines for removed orphans and pruned directories. Empty when the pass
/// found nothing to clean, so callers can skip the section entirely.
pub fn format_reconcile_report(report: &ReconcileReport) -> Vec<String> {
    if report.is_clean() {
        return Vec::new();
    }
    let mut lines = vec!["Cleaned".to_string()];
    for rel in &report.removed_files {
        lines.push(format!("    removed {}", rel.display()));
    }
    for rel in &report.removed_dirs {
        lines.push(format!("    removed empty dir {}/", rel.display()));
    }
    lines
}

pub fn print_reconcile_report(report: &ReconcileReport) {
    for line in format_reconcile_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Index stage
// ============================================================================

pub fn format_index_report(report: &IndexReport) -> Vec<String> {
    let mut lines = vec!["Indexes".to_string()];
    for rel in &report.written {
        lines.push(format!("    {} (written)", rel.display()));
    }
    for rel in &report.removed {
        lines.push(format!("    {} (removed)", rel.display()));
    }
    if report.unchanged > 0 {
        lines.push(format!("    {} pages unchanged", report.unchanged));
    }
    if lines.len() == 1 {
        lines.push("    (nothing to do)".to_string());
    }
    lines
}

pub fn print_index_report(report: &IndexReport) {
    for line in format_index_report(report) {
        println!("{}", line);
    }
}
