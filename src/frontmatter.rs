//! Front-matter reading for generated documents.
//!
//! Every generated recipe document starts with a `---`-delimited header
//! written by the renderer. Two consumers read it back:
//!
//! - the fingerprint index, to recover each document's recorded source
//!   fingerprint for the skip-unchanged decision
//! - the index builder, to collect titles, tags, and categories without
//!   re-parsing source JSON
//!
//! The parser handles exactly the subset the renderer emits: scalar
//! `key: value` lines (values optionally double-quoted) and block lists
//!
//! ```text
//! tags:
//!   - vegan
//!   - winter
//! ```
//!
//! It is tolerant of unknown keys and returns `None` only when the document
//! has no front-matter block at all, so hand-edited or foreign files degrade
//! gracefully instead of failing a build.

/// Parsed header fields of a generated document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub fingerprint: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

/// Parse the front-matter block at the start of a document.
pub fn parse(text: &str) -> Option<FrontMatter> {
    let mut lines = text.lines();
    if lines.next()?.trim_end() != "---" {
        return None;
    }

    let mut fm = FrontMatter::default();
    let mut list_key: Option<String> = None;
    let mut closed = false;

    for line in lines {
        let line = line.trim_end();
        if line == "---" {
            closed = true;
            break;
        }

        if let Some(item) = line.strip_prefix("  - ") {
            match list_key.as_deref() {
                Some("tags") => fm.tags.push(item.trim().to_string()),
                Some("categories") => fm.categories.push(item.trim().to_string()),
                _ => {}
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = unquote(value.trim());

        if value.is_empty() {
            list_key = Some(key.to_string());
            continue;
        }
        list_key = None;

        match key {
            "title" => fm.title = Some(value),
            "slug" => fm.slug = Some(value),
            "fingerprint" => fm.fingerprint = Some(value),
            _ => {}
        }
    }

    if closed { Some(fm) } else { None }
}

/// Strip surrounding double quotes and unescape embedded `\"`.
fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1].replace("\\\"", "\"")
    } else {
        value.to_string()
    }
}
