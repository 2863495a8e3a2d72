//! Cross-reference page generation.
//!
//! The downstream consumer of rendered documents: reads their front matter
//! back (never the source JSON) and maintains the listing pages —
//!
//! - `_all.md` — every recipe, linked by title
//! - `<category>/index.md` — one listing per category directory
//! - `tags.md` — every live tag with its recipe count
//! - `tags/<tag>.md` — one listing per tag
//!
//! These aggregate pages are owned entirely by this module: the reconciler
//! never touches them, and staleness is handled here — a category that
//! empties loses its `index.md` (and the then-empty directory), a tag no
//! recipe references anymore loses its page.
//!
//! Pages are written through [`write_if_changed`], so a rebuild over an
//! unchanged output tree performs zero writes. All orderings come from
//! sorted paths and `BTreeMap`s; output is deterministic.

use crate::config::SiteConfig;
use crate::frontmatter;
use crate::markdown;
use crate::naming;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// The all-recipes listing at the output root.
pub const ALL_PAGE: &str = "_all.md";
/// The tag listing at the output root.
pub const TAGS_PAGE: &str = "tags.md";
/// Subdirectory holding one page per tag.
pub const TAGS_DIR: &str = "tags";
/// Per-category listing filename.
pub const CATEGORY_INDEX: &str = "index.md";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk output directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// True for output-root-relative paths owned by this module rather than
/// the build driver: listings, tag pages, and everything under `tags/`.
pub fn is_aggregate_page(rel: &Path) -> bool {
    rel == Path::new(ALL_PAGE)
        || rel == Path::new(TAGS_PAGE)
        || rel.starts_with(TAGS_DIR)
        || rel.file_name().is_some_and(|n| n == CATEGORY_INDEX)
}

/// What an index pass did, as output-root-relative paths.
#[derive(Debug, Default)]
pub struct IndexReport {
    pub written: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub unchanged: usize,
}

/// One recipe document as seen by the aggregator.
#[derive(Debug)]
struct DocEntry {
    rel: PathBuf,
    title: String,
    tags: Vec<String>,
}

/// Rebuild all listing pages from the documents currently on disk and
/// remove stale ones.
pub fn build_indexes(output_root: &Path, config: &SiteConfig) -> Result<IndexReport, IndexError> {
    fs::create_dir_all(output_root)?;
    let docs = collect_docs(output_root)?;
    let mut report = IndexReport::default();

    build_all_page(output_root, &docs, config, &mut report)?;
    build_category_indexes(output_root, &docs, &mut report)?;
    build_tag_pages(output_root, &docs, config, &mut report)?;

    Ok(report)
}

/// Read back every recipe document's front matter. Files without a parseable
/// header fall back to a filename-derived title and no tags.
fn collect_docs(output_root: &Path) -> Result<Vec<DocEntry>, IndexError> {
    let mut docs = Vec::new();
    for entry in WalkDir::new(output_root).min_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(output_root) else {
            continue;
        };
        if rel.extension().is_none_or(|e| e != "md") || is_aggregate_page(rel) {
            continue;
        }

        let text = fs::read_to_string(entry.path())?;
        let fm = frontmatter::parse(&text).unwrap_or_default();
        let stem = rel
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        docs.push(DocEntry {
            rel: rel.to_path_buf(),
            title: fm.title.unwrap_or_else(|| markdown::display_title(&stem)),
            tags: fm.tags.iter().map(|t| t.trim().to_lowercase()).collect(),
        });
    }
    docs.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(docs)
}

fn build_all_page(
    output_root: &Path,
    docs: &[DocEntry],
    config: &SiteConfig,
    report: &mut IndexReport,
) -> Result<(), IndexError> {
    let page_rel = PathBuf::from(ALL_PAGE);
    let mut lines = vec![format!("# {}", config.pages.all_title), String::new()];
    for doc in docs {
        lines.push(format!(
            "- [{}]({})",
            doc.title,
            markdown::rel_link(&page_rel, &doc.rel)
        ));
    }
    write_page(output_root, &page_rel, &lines.join("\n"), report)
}

fn build_category_indexes(
    output_root: &Path,
    docs: &[DocEntry],
    report: &mut IndexReport,
) -> Result<(), IndexError> {
    let mut category_dirs: Vec<PathBuf> = fs::read_dir(output_root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter(|p| p.file_name().is_some_and(|n| n != TAGS_DIR))
        .collect();
    category_dirs.sort();

    for dir in category_dirs {
        let Some(name) = dir.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        let index_rel = PathBuf::from(&name).join(CATEGORY_INDEX);
        let members: Vec<&DocEntry> = docs
            .iter()
            .filter(|d| d.rel.parent() == Some(Path::new(&name)))
            .collect();

        if members.is_empty() {
            // No recipes left here: drop the stale index, and the directory
            // too once that leaves it empty.
            let index_path = output_root.join(&index_rel);
            if index_path.exists() {
                fs::remove_file(&index_path)?;
                report.removed.push(index_rel);
            }
            if fs::read_dir(&dir)?.next().is_none() {
                fs::remove_dir(&dir)?;
            }
            continue;
        }

        let mut lines = vec![format!("# {}", markdown::display_title(&name)), String::new()];
        for doc in &members {
            lines.push(format!(
                "- [{}]({})",
                doc.title,
                markdown::rel_link(&index_rel, &doc.rel)
            ));
        }
        write_page(output_root, &index_rel, &lines.join("\n"), report)?;
    }
    Ok(())
}

fn build_tag_pages(
    output_root: &Path,
    docs: &[DocEntry],
    config: &SiteConfig,
    report: &mut IndexReport,
) -> Result<(), IndexError> {
    // Keyed by page slug; the label shown in listings is the first-seen
    // spelling of the tag (tags arrive case-folded already).
    struct TagGroup<'a> {
        label: String,
        docs: Vec<&'a DocEntry>,
    }

    let mut groups: BTreeMap<String, TagGroup> = BTreeMap::new();
    for doc in docs {
        for tag in &doc.tags {
            let slug = naming::slug_or(tag, "tag");
            groups
                .entry(slug)
                .or_insert_with(|| TagGroup {
                    label: tag.clone(),
                    docs: Vec::new(),
                })
                .docs
                .push(doc);
        }
    }

    // Master tag listing
    let tags_rel = PathBuf::from(TAGS_PAGE);
    let mut lines = vec![format!("# {}", config.pages.tags_title), String::new()];
    for (slug, group) in &groups {
        lines.push(format!(
            "- [{}]({}/{}.md) ({})",
            group.label,
            TAGS_DIR,
            slug,
            group.docs.len()
        ));
    }
    write_page(output_root, &tags_rel, &lines.join("\n"), report)?;

    // Per-tag pages
    let tags_dir = output_root.join(TAGS_DIR);
    let mut stale: BTreeSet<PathBuf> = if tags_dir.is_dir() {
        fs::read_dir(&tags_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "md"))
            .collect()
    } else {
        BTreeSet::new()
    };

    if !groups.is_empty() {
        fs::create_dir_all(&tags_dir)?;
    }
    for (slug, group) in &groups {
        let page_rel = PathBuf::from(TAGS_DIR).join(format!("{}.md", slug));
        let mut lines = vec![
            format!("# {}", markdown::display_title(slug)),
            String::new(),
        ];
        for doc in &group.docs {
            lines.push(format!(
                "- [{}]({})",
                doc.title,
                markdown::rel_link(&page_rel, &doc.rel)
            ));
        }
        stale.remove(&output_root.join(&page_rel));
        write_page(output_root, &page_rel, &lines.join("\n"), report)?;
    }

    // Whatever is left has no recipes referencing it anymore
    for path in stale {
        fs::remove_file(&path)?;
        if let Ok(rel) = path.strip_prefix(output_root) {
            report.removed.push(rel.to_path_buf());
        }
    }
    if tags_dir.is_dir() && fs::read_dir(&tags_dir)?.next().is_none() {
        fs::remove_dir(&tags_dir)?;
    }

    Ok(())
}

/// Write a page only when its content actually changed, keeping unchanged
/// rebuilds write-free.
fn write_page(
    output_root: &Path,
    rel: &Path,
    content: &str,
    report: &mut IndexReport,
) -> Result<(), IndexError> {
    let body = format!("{}\n", content.trim_end());
    let path = output_root.join(rel);
    if let Ok(existing) = fs::read_to_string(&path)
        && existing == body
    {
        report.unchanged += 1;
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, body)?;
    report.written.push(rel.to_path_buf());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_doc(root: &Path, rel: &str, title: &str, tags: &[&str]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut fm = format!("---\ntitle: \"{}\"\nslug: x\nfingerprint: f\n", title);
        if !tags.is_empty() {
            fm.push_str("tags:\n");
            for t in tags {
                fm.push_str(&format!("  - {}\n", t));
            }
        }
        fm.push_str("---\n\nbody\n");
        fs::write(path, fm).unwrap();
    }

    fn build(root: &Path) -> IndexReport {
        build_indexes(root, &SiteConfig::default()).unwrap()
    }

    // =========================================================================
    // is_aggregate_page
    // =========================================================================

    #[test]
    fn aggregate_page_matching() {
        assert!(is_aggregate_page(Path::new("_all.md")));
        assert!(is_aggregate_page(Path::new("tags.md")));
        assert!(is_aggregate_page(Path::new("tags/vegan.md")));
        assert!(is_aggregate_page(Path::new("soups/index.md")));
        assert!(!is_aggregate_page(Path::new("soups/tomato-soup.md")));
        assert!(!is_aggregate_page(Path::new("tags-of-love.md")));
    }

    // =========================================================================
    // _all.md
    // =========================================================================

    #[test]
    fn all_page_links_every_document() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "soups/tomato-soup.md", "Tomato Soup", &[]);
        write_doc(tmp.path(), "breads/flatbread.md", "Flatbread", &[]);

        build(tmp.path());

        let all = fs::read_to_string(tmp.path().join("_all.md")).unwrap();
        assert!(all.starts_with("# All Recipes\n"));
        assert!(all.contains("- [Flatbread](breads/flatbread.md)"));
        assert!(all.contains("- [Tomato Soup](soups/tomato-soup.md)"));
    }

    #[test]
    fn all_page_written_even_when_empty() {
        let tmp = TempDir::new().unwrap();
        build(tmp.path());
        let all = fs::read_to_string(tmp.path().join("_all.md")).unwrap();
        assert_eq!(all, "# All Recipes\n");
    }

    // =========================================================================
    // Category indexes
    // =========================================================================

    #[test]
    fn category_index_links_members() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "soups/tomato-soup.md", "Tomato Soup", &[]);
        write_doc(tmp.path(), "soups/gazpacho.md", "Gazpacho", &[]);

        build(tmp.path());

        let index = fs::read_to_string(tmp.path().join("soups/index.md")).unwrap();
        assert!(index.starts_with("# Soups\n"));
        assert!(index.contains("- [Gazpacho](gazpacho.md)"));
        assert!(index.contains("- [Tomato Soup](tomato-soup.md)"));
    }

    #[test]
    fn emptied_category_loses_index_and_directory() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "soups/tomato-soup.md", "Tomato Soup", &[]);
        build(tmp.path());
        assert!(tmp.path().join("soups/index.md").is_file());

        // Recipe removed (as the reconciler would)
        fs::remove_file(tmp.path().join("soups/tomato-soup.md")).unwrap();
        let report = build(tmp.path());

        assert!(!tmp.path().join("soups").exists());
        assert!(report.removed.contains(&PathBuf::from("soups/index.md")));
    }

    // =========================================================================
    // Tag pages
    // =========================================================================

    #[test]
    fn tag_pages_and_counts() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "soups/a.md", "A", &["vegan", "winter"]);
        write_doc(tmp.path(), "soups/b.md", "B", &["vegan"]);

        build(tmp.path());

        let tags = fs::read_to_string(tmp.path().join("tags.md")).unwrap();
        assert!(tags.contains("- [vegan](tags/vegan.md) (2)"));
        assert!(tags.contains("- [winter](tags/winter.md) (1)"));

        let vegan = fs::read_to_string(tmp.path().join("tags/vegan.md")).unwrap();
        assert!(vegan.starts_with("# Vegan\n"));
        assert!(vegan.contains("- [A](../soups/a.md)"));
        assert!(vegan.contains("- [B](../soups/b.md)"));
    }

    #[test]
    fn stale_tag_page_removed() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "soups/a.md", "A", &["vegan"]);
        build(tmp.path());
        assert!(tmp.path().join("tags/vegan.md").is_file());

        write_doc(tmp.path(), "soups/a.md", "A", &["winter"]);
        let report = build(tmp.path());

        assert!(!tmp.path().join("tags/vegan.md").exists());
        assert!(tmp.path().join("tags/winter.md").is_file());
        assert!(report.removed.contains(&PathBuf::from("tags/vegan.md")));
    }

    #[test]
    fn tags_dir_removed_when_no_tags_remain() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "soups/a.md", "A", &["vegan"]);
        build(tmp.path());

        write_doc(tmp.path(), "soups/a.md", "A", &[]);
        build(tmp.path());

        assert!(!tmp.path().join("tags").exists());
        let tags = fs::read_to_string(tmp.path().join("tags.md")).unwrap();
        assert_eq!(tags, "# Tags\n");
    }

    #[test]
    fn multi_word_tag_gets_slug_filename() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "soups/a.md", "A", &["south indian"]);

        build(tmp.path());

        assert!(tmp.path().join("tags/south-indian.md").is_file());
        let tags = fs::read_to_string(tmp.path().join("tags.md")).unwrap();
        assert!(tags.contains("- [south indian](tags/south-indian.md) (1)"));
    }

    // =========================================================================
    // Idempotence
    // =========================================================================

    #[test]
    fn unchanged_rebuild_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "soups/a.md", "A", &["vegan"]);

        let first = build(tmp.path());
        assert!(!first.written.is_empty());

        let second = build(tmp.path());
        assert!(second.written.is_empty());
        assert!(second.removed.is_empty());
        assert_eq!(second.unchanged, first.written.len());
    }

    #[test]
    fn title_falls_back_to_filename() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("soups/hand-made.md");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "no front matter here\n").unwrap();

        build(tmp.path());

        let all = fs::read_to_string(tmp.path().join("_all.md")).unwrap();
        assert!(all.contains("- [Hand Made](soups/hand-made.md)"));
    }
}
