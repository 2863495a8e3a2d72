//! The incremental build driver.
//!
//! Walks the build plan and brings the output tree up to date, one recipe
//! at a time:
//!
//! 1. Fingerprint the raw source bytes (already in the plan).
//! 2. Look up the recorded fingerprint of any existing document at the
//!    planned path via the [`FingerprintIndex`].
//! 3. Skip when they match; otherwise strictly deserialize, render, and
//!    overwrite, creating parent directories as needed.
//!
//! A rebuild is **skipped** only when a document exists at the planned
//! path, carries a recorded fingerprint, that fingerprint equals the fresh
//! digest, and `--force` is off. Every other case rewrites.
//!
//! ## Partial-failure semantics
//!
//! One broken recipe must not take the rest of the build down with it.
//! Validation and per-file I/O errors are caught, recorded in the report,
//! and the pass continues; the caller turns any failure into a non-zero
//! exit after the full pass. Only structural problems (the output root
//! itself cannot be created) abort.
//!
//! The driver is the sole writer of recipe documents. Deletion belongs to
//! the reconciler, which runs strictly after this pass completes.

use crate::cache::{self, FingerprintIndex};
use crate::config::SiteConfig;
use crate::plan::BuildPlan;
use crate::recipe::Recipe;
use crate::render;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for one build pass.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Bypass the fingerprint check and re-render everything.
    pub force: bool,
}

/// What happened to one record during the pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordStatus {
    Written,
    Skipped,
    Failed(String),
}

/// Per-record result, one entry per source file.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub source: PathBuf,
    /// Display title (planned, lenient).
    pub title: String,
    /// Document path relative to the output root. `None` when the record
    /// never got far enough to be planned.
    pub output: Option<PathBuf>,
    pub status: RecordStatus,
}

/// Aggregate result of a build pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl BuildReport {
    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, RecordStatus::Written))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, RecordStatus::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, RecordStatus::Failed(_)))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&RecordStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Run the build pass: write or skip every planned record, carrying
/// per-record failures into the report.
pub fn process(
    plan: &BuildPlan,
    output_root: &Path,
    config: &SiteConfig,
    options: &BuildOptions,
) -> Result<BuildReport, ProcessError> {
    fs::create_dir_all(output_root)?;

    let index = if options.force {
        FingerprintIndex::empty()
    } else {
        FingerprintIndex::scan(output_root)
    };

    let mut report = BuildReport::default();

    for failure in &plan.failures {
        report.outcomes.push(RecordOutcome {
            source: failure.source.clone(),
            title: display_stem(&failure.source),
            output: None,
            status: RecordStatus::Failed(failure.error.clone()),
        });
    }

    for record in &plan.records {
        let digest = cache::fingerprint(&record.bytes);
        let rel = record.rel_output_path();

        if !options.force && index.get(&rel) == Some(digest.as_str()) {
            report.outcomes.push(RecordOutcome {
                source: record.source.clone(),
                title: record.title.clone(),
                output: Some(rel),
                status: RecordStatus::Skipped,
            });
            continue;
        }

        let status = match render_record(record, &digest, config) {
            Ok(body) => match write_document(output_root, &rel, &body) {
                Ok(()) => RecordStatus::Written,
                Err(e) => RecordStatus::Failed(e.to_string()),
            },
            Err(e) => RecordStatus::Failed(e),
        };

        report.outcomes.push(RecordOutcome {
            source: record.source.clone(),
            title: record.title.clone(),
            output: Some(rel),
            status,
        });
    }

    Ok(report)
}

/// Strict parse + render. Errors are stringified for the report; the
/// distinction that matters downstream is only failed-vs-not.
fn render_record(
    record: &crate::plan::PlannedRecord,
    digest: &str,
    config: &SiteConfig,
) -> Result<String, String> {
    let recipe = Recipe::from_value(&record.value).map_err(|e| e.to_string())?;
    let rendered = render::render(&recipe, digest, config).map_err(|e| e.to_string())?;
    Ok(rendered.body)
}

fn write_document(output_root: &Path, rel: &Path, body: &str) -> std::io::Result<()> {
    let path = output_root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)
}

fn display_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
