//! Output reconciliation: orphan removal and directory pruning.
//!
//! After the build driver's pass, the output tree may still contain
//! documents whose source records are gone, were renamed, or moved to a
//! different category. This module diffs what exists on disk against the
//! plan's expected-output set and removes the difference, then prunes
//! directories the removals emptied.
//!
//! ## Ownership boundary
//!
//! Only recipe documents are reconciled. Aggregate pages — the all-recipes
//! listing, category `index.md` files, `tags.md` and the `tags/` subtree —
//! belong to the index builder, which maintains (and removes) them itself.
//! Non-Markdown files are never touched.
//!
//! ## Ordering
//!
//! Reconciliation must run only after the full build pass: the expected
//! set includes records that failed validation this run (their planned
//! paths are claimed by the planner), so a broken source edit leaves the
//! last good document in place. Only a record that has disappeared
//! entirely loses its output.
//!
//! Directory pruning walks deepest-first and stops at the output root;
//! the root itself is never removed.

use crate::indexes;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk output directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What a reconciliation pass removed, as output-root-relative paths.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub removed_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.removed_files.is_empty() && self.removed_dirs.is_empty()
    }
}

/// Delete every recipe document not in the expected set, then prune empty
/// directories bottom-up.
pub fn reconcile(
    expected: &BTreeSet<PathBuf>,
    output_root: &Path,
) -> Result<ReconcileReport, ReconcileError> {
    let mut report = ReconcileReport::default();
    if !output_root.is_dir() {
        return Ok(report);
    }

    let mut doc_files = Vec::new();
    let mut dirs = Vec::new();
    for entry in WalkDir::new(output_root).min_depth(1) {
        let entry = entry?;
        let rel = match entry.path().strip_prefix(output_root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => continue,
        };
        if entry.file_type().is_dir() {
            dirs.push(rel);
        } else if entry.file_type().is_file()
            && rel.extension().is_some_and(|e| e == "md")
            && !indexes::is_aggregate_page(&rel)
        {
            doc_files.push(rel);
        }
    }

    doc_files.sort();
    for rel in doc_files {
        if !expected.contains(&rel) {
            fs::remove_file(output_root.join(&rel))?;
            report.removed_files.push(rel);
        }
    }

    // Deepest directories first, so a parent emptied by a child's removal
    // is itself removed in the same pass.
    dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
    for rel in dirs {
        let path = output_root.join(&rel);
        if fs::read_dir(&path)?.next().is_none() {
            fs::remove_dir(&path)?;
            report.removed_dirs.push(rel);
        }
    }
    report.removed_dirs.sort();

    Ok(report)
}
