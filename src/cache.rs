//! Content fingerprints for incremental builds.
//!
//! Rendering a recipe is cheap, but rewriting every document on every run
//! would defeat change detection downstream (deploy tooling, `git status`,
//! CI caching on the output tree). This module lets the build driver skip
//! re-rendering when a recipe's source bytes haven't changed since the last
//! build.
//!
//! # Design
//!
//! The fingerprint is **content-addressed**: SHA-256 of the raw source file
//! bytes, not an mtime. Content-based hashing survives `git checkout` (which
//! resets modification times) and makes `touch`-only changes free.
//!
//! Each generated document records the fingerprint of the source that
//! produced it in its own front matter (`fingerprint:`). There is no
//! separate manifest file to keep in sync or invalidate: the output tree is
//! the cache, and deleting a document is all it takes to force its rebuild.
//!
//! At the start of a run, [`FingerprintIndex::scan`] walks the existing
//! output tree once and collects every document's recorded fingerprint into
//! an in-memory map keyed by output-root-relative path. The driver then
//! decides skip-vs-rebuild with a single map lookup per recipe.
//!
//! A rebuild is skipped only when all of these hold:
//! 1. A document already exists at the planned output path
//! 2. Its front matter carries a recorded fingerprint
//! 3. That fingerprint equals the fresh digest of the source bytes
//! 4. The build was not started with `--force`
//!
//! Documents with missing or unreadable front matter simply have no index
//! entry, so they are rebuilt — corruption degrades to extra work, never to
//! a wrong skip.

use crate::frontmatter;
use crate::indexes;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// SHA-256 of raw source bytes, as a 64-char lowercase hex string.
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Recorded fingerprints of the existing output tree, built once per run.
#[derive(Debug, Default)]
pub struct FingerprintIndex {
    entries: HashMap<PathBuf, String>,
}

impl FingerprintIndex {
    /// An index with no entries (used for `--force`, or when the output
    /// root does not exist yet).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Walk the output root and record the embedded fingerprint of every
    /// generated document. Aggregate pages (listings, tag pages) carry no
    /// fingerprint and are skipped; unreadable or header-less files are
    /// skipped too, leaving them to be treated as absent.
    pub fn scan(output_root: &Path) -> Self {
        let mut entries = HashMap::new();
        if !output_root.is_dir() {
            return Self { entries };
        }

        for entry in WalkDir::new(output_root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let Ok(rel) = entry.path().strip_prefix(output_root) else {
                continue;
            };
            if rel.extension().is_none_or(|e| e != "md") || indexes::is_aggregate_page(rel) {
                continue;
            }
            let Ok(text) = std::fs::read_to_string(entry.path()) else {
                continue;
            };
            if let Some(fm) = frontmatter::parse(&text)
                && let Some(digest) = fm.fingerprint
            {
                entries.insert(rel.to_path_buf(), digest);
            }
        }

        Self { entries }
    }

    /// Recorded fingerprint for an output-root-relative document path.
    pub fn get(&self, rel_path: &Path) -> Option<&str> {
        self.entries.get(rel_path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_doc(root: &Path, rel: &str, fingerprint_line: Option<&str>) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let fm = match fingerprint_line {
            Some(fp) => format!("---\ntitle: T\nfingerprint: {fp}\n---\n\nbody\n"),
            None => "---\ntitle: T\n---\n\nbody\n".to_string(),
        };
        fs::write(path, fm).unwrap();
    }

    // =========================================================================
    // fingerprint
    // =========================================================================

    #[test]
    fn fingerprint_is_deterministic() {
        let a = fingerprint(b"hello world");
        let b = fingerprint(b"hello world");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn fingerprint_changes_with_content() {
        assert_ne!(fingerprint(b"version 1"), fingerprint(b"version 2"));
    }

    // =========================================================================
    // FingerprintIndex
    // =========================================================================

    #[test]
    fn empty_index_has_no_entries() {
        let idx = FingerprintIndex::empty();
        assert!(idx.is_empty());
        assert_eq!(idx.get(Path::new("soups/x.md")), None);
    }

    #[test]
    fn scan_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let idx = FingerprintIndex::scan(&tmp.path().join("no-such-dir"));
        assert!(idx.is_empty());
    }

    #[test]
    fn scan_collects_recorded_fingerprints() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "soups/tomato-soup.md", Some("aaa111"));
        write_doc(tmp.path(), "breads/flatbread.md", Some("bbb222"));

        let idx = FingerprintIndex::scan(tmp.path());
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.get(Path::new("soups/tomato-soup.md")), Some("aaa111"));
        assert_eq!(idx.get(Path::new("breads/flatbread.md")), Some("bbb222"));
    }

    #[test]
    fn scan_skips_documents_without_fingerprint() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "soups/no-fp.md", None);

        let idx = FingerprintIndex::scan(tmp.path());
        assert_eq!(idx.get(Path::new("soups/no-fp.md")), None);
    }

    #[test]
    fn scan_skips_aggregate_pages() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "_all.md", Some("fp1"));
        write_doc(tmp.path(), "soups/index.md", Some("fp2"));
        write_doc(tmp.path(), "tags/vegan.md", Some("fp3"));
        write_doc(tmp.path(), "soups/real.md", Some("fp4"));

        let idx = FingerprintIndex::scan(tmp.path());
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.get(Path::new("soups/real.md")), Some("fp4"));
    }

    #[test]
    fn scan_skips_non_markdown_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("stray.txt"), "---\nfingerprint: x\n---\n").unwrap();

        let idx = FingerprintIndex::scan(tmp.path());
        assert!(idx.is_empty());
    }

    #[test]
    fn scan_skips_files_without_front_matter() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("soups")).unwrap();
        fs::write(tmp.path().join("soups/hand-edited.md"), "# Not generated\n").unwrap();

        let idx = FingerprintIndex::scan(tmp.path());
        assert!(idx.is_empty());
    }
}
