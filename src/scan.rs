//! Source discovery.
//!
//! Walks the source root for recipe JSON files. Discovery is deliberately
//! dumb: no parsing happens here, just filename filtering, so a broken
//! recipe file never prevents the rest of the set from being found.
//!
//! ## Exclusions
//!
//! Template files shipped alongside real data are skipped by name:
//! `_example.json`, `example.json`, and anything else starting with
//! `example`. Hidden files and non-JSON files are ignored.
//!
//! A missing or unreadable source root is a structural error — the caller
//! aborts the run rather than treating the source set as empty, which
//! would make the reconciler delete every existing output.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("source directory not found: {}", .0.display())]
    MissingRoot(PathBuf),
}

/// Discover all recipe source files under the root, sorted by path.
pub fn scan(source_root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !source_root.is_dir() {
        return Err(ScanError::MissingRoot(source_root.to_path_buf()));
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(source_root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || is_example_file(&name) {
            continue;
        }
        if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        {
            sources.push(path.to_path_buf());
        }
    }

    sources.sort();
    Ok(sources)
}

/// Template/sample files are excluded from processing by name.
pub fn is_example_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower == "_example.json" || lower.starts_with("example")
}
