//! Output planning: the authoritative expected-output set.
//!
//! Before anything is written, every source file is read once, parsed, and
//! assigned its output identity `(category, slug)`. The resulting plan
//! serves three masters:
//!
//! - the build driver iterates the planned records (source bytes travel in
//!   the plan, so each file is read exactly once per run)
//! - the reconciler treats the plan's path set as the definition of "not an
//!   orphan"
//! - collision detection runs here, before the first write, so a build that
//!   would overwrite one recipe with another aborts with both source files
//!   named instead of silently losing data
//!
//! ## Lenient identity
//!
//! Identity derivation is deliberately more forgiving than rendering: a
//! missing title falls back to the source file stem. A recipe that will
//! later fail strict validation still claims its output path, which keeps
//! its previously built document out of the reconciler's orphan set — a
//! broken edit to one source file must never cascade into deleting that
//! recipe's last good output.
//!
//! Files that cannot be read or are not JSON at all get no identity and no
//! expected path; they are carried as plan failures for reporting.

use crate::config::SiteConfig;
use crate::naming;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error(
        "output collision: {} and {} both resolve to {category}/{slug}.md",
        .first.display(),
        .second.display()
    )]
    Collision {
        category: String,
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// One source record with its planned output identity.
#[derive(Debug, Clone)]
pub struct PlannedRecord {
    /// Source file path as discovered by the scanner.
    pub source: PathBuf,
    /// Raw source bytes — the fingerprint basis.
    pub bytes: Vec<u8>,
    /// Parsed JSON, strict deserialization deferred to the build driver.
    pub value: Value,
    /// Display title (lenient: falls back to the file stem).
    pub title: String,
    /// Output subdirectory.
    pub category: String,
    /// Output file stem.
    pub slug: String,
}

impl PlannedRecord {
    /// Planned document path relative to the output root.
    pub fn rel_output_path(&self) -> PathBuf {
        PathBuf::from(&self.category).join(format!("{}.md", self.slug))
    }
}

/// A source file that could not be planned (unreadable or not JSON).
#[derive(Debug, Clone)]
pub struct PlanFailure {
    pub source: PathBuf,
    pub error: String,
}

/// The full build plan for one run.
#[derive(Debug, Default)]
pub struct BuildPlan {
    pub records: Vec<PlannedRecord>,
    pub failures: Vec<PlanFailure>,
}

impl BuildPlan {
    /// The expected-output set consumed by the reconciler, as paths
    /// relative to the output root.
    pub fn expected_paths(&self) -> BTreeSet<PathBuf> {
        self.records.iter().map(|r| r.rel_output_path()).collect()
    }
}

/// Read, parse, and assign an output identity to every source file,
/// rejecting the build on the first identity collision.
pub fn plan(sources: &[PathBuf], config: &SiteConfig) -> Result<BuildPlan, PlanError> {
    let mut plan = BuildPlan::default();
    let mut seen: BTreeMap<(String, String), PathBuf> = BTreeMap::new();

    for source in sources {
        let bytes = match std::fs::read(source) {
            Ok(b) => b,
            Err(e) => {
                plan.failures.push(PlanFailure {
                    source: source.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };
        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => {
                plan.failures.push(PlanFailure {
                    source: source.clone(),
                    error: format!("invalid JSON: {}", e),
                });
                continue;
            }
        };

        let stem = file_stem(source);
        let (title, category, slug) = identity(&value, &stem, config);

        if let Some(first) = seen.get(&(category.clone(), slug.clone())) {
            return Err(PlanError::Collision {
                category,
                slug,
                first: first.clone(),
                second: source.clone(),
            });
        }
        seen.insert((category.clone(), slug.clone()), source.clone());

        plan.records.push(PlannedRecord {
            source: source.clone(),
            bytes,
            value,
            title,
            category,
            slug,
        });
    }

    Ok(plan)
}

/// Derive `(title, category, slug)` leniently from a parsed JSON value.
fn identity(value: &Value, stem: &str, config: &SiteConfig) -> (String, String, String) {
    let title = value
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(stem)
        .to_string();

    let explicit_slug = value
        .get("slug")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let slug = naming::resolve_slug(explicit_slug, &title);
    let categories = lenient_list(value.get("categories"));
    let category = naming::resolve_category(&categories, &config.fallback_category);

    (title, category, slug)
}

/// Read a JSON value as a list of strings, accepting a bare string as a
/// one-element list. Matches the recipe model's leniency without requiring
/// a full (possibly failing) deserialization.
fn lenient_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
