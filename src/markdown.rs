//! Markdown text utilities: normalization, wrapping, and link building.
//!
//! Shared by the renderer (body normalization before write) and the index
//! builder (relative links between generated pages, display titles from
//! slugs).
//!
//! [`normalize`] enforces the house Markdown style on generated bodies:
//!
//! - Code blocks (``` fences) and table rows (`| …`) pass through untouched
//! - Headings get exactly one blank line before and after
//! - List items and paragraphs wrap to a maximum width, with hanging indent
//!   for continuation lines; words are never broken
//! - Runs of blank lines collapse to one
//!
//! Wrapping runs once, on freshly rendered bodies: the renderer emits each
//! list entry as a single source line, so normalization never has to
//! re-join text it previously wrapped.

use std::path::Path;

/// Normalize a Markdown body: wrap long lines, enforce blank lines around
/// headings, collapse blank runs. Returns text with a single trailing
/// newline.
pub fn normalize(md: &str, width: usize) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_code = false;

    for line in md.lines() {
        let raw = line.trim_end();

        if raw.trim_start().starts_with("```") {
            in_code = !in_code;
            out.push(raw.to_string());
            continue;
        }
        if in_code {
            out.push(raw.to_string());
            continue;
        }
        if raw.trim_start().starts_with('|') {
            out.push(raw.to_string());
            continue;
        }
        if is_heading(raw) {
            if out.last().is_some_and(|l| !l.is_empty()) {
                out.push(String::new());
            }
            out.push(raw.to_string());
            out.push(String::new());
            continue;
        }
        if raw.trim().is_empty() {
            if out.last().is_some_and(|l| !l.is_empty()) {
                out.push(String::new());
            }
            continue;
        }
        if let Some(wrapped) = wrap_list_item(raw, width) {
            out.extend(wrapped);
            continue;
        }
        out.extend(wrap_text(raw.trim(), width, "", ""));
    }

    // Collapse any remaining blank runs
    let mut cleaned: Vec<String> = Vec::new();
    for line in out {
        if !(line.is_empty() && cleaned.last().is_some_and(|l| l.is_empty())) {
            cleaned.push(line);
        }
    }

    let mut text = cleaned.join("\n");
    while text.ends_with('\n') || text.ends_with(' ') {
        text.pop();
    }
    text.push('\n');
    text
}

/// `#` through `######` followed by a space, with optional leading indent.
fn is_heading(line: &str) -> bool {
    let s = line.trim_start();
    let hashes = s.chars().take_while(|&c| c == '#').count();
    (1..=6).contains(&hashes) && s[hashes..].starts_with(' ')
}

/// Wrap a bullet (`- `, `* `) or numbered (`1. `) list item with a hanging
/// indent. Returns `None` for lines that are not list items.
fn wrap_list_item(line: &str, width: usize) -> Option<Vec<String>> {
    let indent_len = line.len() - line.trim_start().len();
    let (indent, rest) = line.split_at(indent_len);

    if let Some(body) = rest.strip_prefix("- ").or_else(|| rest.strip_prefix("* ")) {
        let initial = format!("{}{} ", indent, &rest[..1]);
        let subsequent = format!("{}  ", indent);
        return Some(wrap_text(body.trim(), width, &initial, &subsequent));
    }

    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && rest[digits..].starts_with(". ") {
        let initial = format!("{}{}", indent, &rest[..digits + 2]);
        let subsequent = " ".repeat(initial.len());
        let body = rest[digits + 2..].trim();
        return Some(wrap_text(body, width, &initial, &subsequent));
    }

    None
}

/// Greedy word wrap. Words longer than the width are kept whole on their
/// own line rather than broken.
fn wrap_text(text: &str, width: usize, initial: &str, subsequent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = initial.to_string();
    let mut has_word = false;

    for word in text.split_whitespace() {
        let needed = if has_word { word.len() + 1 } else { word.len() };
        if has_word && current.len() + needed > width {
            lines.push(current);
            current = subsequent.to_string();
            has_word = false;
        }
        if has_word {
            current.push(' ');
        }
        current.push_str(word);
        has_word = true;
    }
    lines.push(current.trim_end().to_string());
    lines
}

/// POSIX-style relative link from one generated page to another, both given
/// relative to the output root.
///
/// `rel_link("soups/index.md", "soups/tomato-soup.md")` → `"tomato-soup.md"`
/// `rel_link("tags/vegan.md", "soups/tomato-soup.md")` → `"../soups/tomato-soup.md"`
pub fn rel_link(from: &Path, target: &Path) -> String {
    let from_dir: Vec<&str> = from
        .parent()
        .map(|p| p.iter().filter_map(|c| c.to_str()).collect())
        .unwrap_or_default();
    let target_parts: Vec<&str> = target.iter().filter_map(|c| c.to_str()).collect();

    let common = from_dir
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from_dir.len() {
        parts.push("..");
    }
    parts.extend(&target_parts[common..]);
    parts.join("/")
}

/// Human-readable title from a slug: dashes become spaces, each word is
/// capitalized. `"main-courses"` → `"Main Courses"`.
pub fn display_title(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // =========================================================================
    // normalize
    // =========================================================================

    #[test]
    fn heading_gets_surrounding_blanks() {
        let out = normalize("text\n## Heading\nmore", 80);
        assert_eq!(out, "text\n\n## Heading\n\nmore\n");
    }

    #[test]
    fn blank_runs_collapse() {
        let out = normalize("a\n\n\n\nb", 80);
        assert_eq!(out, "a\n\nb\n");
    }

    #[test]
    fn code_fences_preserved() {
        let src = "```\nreally long code line that would otherwise wrap at the configured width limit\n```";
        let out = normalize(src, 20);
        assert!(out.contains("really long code line"));
    }

    #[test]
    fn table_rows_preserved() {
        let src = "| a | b |\n|---|---|";
        let out = normalize(src, 5);
        assert_eq!(out, "| a | b |\n|---|---|\n");
    }

    #[test]
    fn bullet_wraps_with_hanging_indent() {
        let out = normalize("- one two three four five six", 15);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "- one two three");
        assert!(lines[1].starts_with("  "));
    }

    #[test]
    fn numbered_item_wraps_with_hanging_indent() {
        let out = normalize("1. one two three four five six", 16);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "1. one two three");
        assert!(lines[1].starts_with("   "));
    }

    #[test]
    fn long_words_are_not_broken() {
        let out = normalize("supercalifragilisticexpialidocious", 10);
        assert_eq!(out, "supercalifragilisticexpialidocious\n");
    }

    #[test]
    fn normalize_is_deterministic() {
        let src = "## Heading\n- a long bullet item that wraps around the width limit here\n\ntext";
        assert_eq!(normalize(src, 30), normalize(src, 30));
    }

    #[test]
    fn normalize_is_stable_on_unwrapped_content() {
        let src = "## Heading\n- short bullet\n\ntext";
        let once = normalize(src, 80);
        assert_eq!(once, normalize(&once, 80));
    }

    #[test]
    fn trailing_newline_exactly_one() {
        assert_eq!(normalize("a\n\n\n", 80), "a\n");
    }

    // =========================================================================
    // rel_link
    // =========================================================================

    fn link(from: &str, to: &str) -> String {
        rel_link(&PathBuf::from(from), &PathBuf::from(to))
    }

    #[test]
    fn link_within_same_dir() {
        assert_eq!(link("soups/index.md", "soups/tomato-soup.md"), "tomato-soup.md");
    }

    #[test]
    fn link_from_root_page() {
        assert_eq!(link("_all.md", "soups/tomato-soup.md"), "soups/tomato-soup.md");
    }

    #[test]
    fn link_across_dirs() {
        assert_eq!(
            link("tags/vegan.md", "soups/tomato-soup.md"),
            "../soups/tomato-soup.md"
        );
    }

    #[test]
    fn link_from_root_to_tag_page() {
        assert_eq!(link("tags.md", "tags/vegan.md"), "tags/vegan.md");
    }

    // =========================================================================
    // display_title
    // =========================================================================

    #[test]
    fn display_title_capitalizes_words() {
        assert_eq!(display_title("main-courses"), "Main Courses");
    }

    #[test]
    fn display_title_single_word() {
        assert_eq!(display_title("soups"), "Soups");
    }

    #[test]
    fn display_title_empty() {
        assert_eq!(display_title(""), "");
    }
}
