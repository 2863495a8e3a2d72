//! Centralized slug and category normalization.
//!
//! Output placement is driven entirely by names: a recipe lands at
//! `<output_root>/<category>/<slug>.md`, where both components come through
//! the same normalization so that every path segment is lowercase,
//! filesystem-safe, and stable across builds. All callers (planner, renderer,
//! index builder) go through this module rather than normalizing ad hoc.
//!
//! ## Normalization rules
//!
//! - Lowercase
//! - Characters outside `[a-z0-9]` become dashes
//! - Runs of dashes collapse to one
//! - Leading/trailing dashes are stripped
//!
//! `"Tomato Soup"` → `"tomato-soup"`, `"Sopa de Ajo!"` → `"sopa-de-ajo"`.
//! A string that normalizes to nothing falls back to a fixed token so the
//! output path is always well-formed.

/// Slug used when a title normalizes to the empty string.
pub const FALLBACK_SLUG: &str = "untitled";

/// Category used when a recipe declares no categories.
pub const FALLBACK_CATEGORY: &str = "uncategorised";

/// Normalize a string into a path-safe slug. May return an empty string;
/// use [`slug_or`] when a non-empty result is required.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_dash = false;
    for c in text.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_dash = false;
        } else if !prev_dash && !slug.is_empty() {
            slug.push('-');
            prev_dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Normalize a string into a slug, substituting `fallback` when nothing
/// survives normalization.
pub fn slug_or(text: &str, fallback: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// Resolve the output slug for a recipe: an explicit slug wins over the
/// title, and both go through normalization.
pub fn resolve_slug(explicit: Option<&str>, title: &str) -> String {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => slug_or(s, FALLBACK_SLUG),
        None => slug_or(title, FALLBACK_SLUG),
    }
}

/// Resolve the output category from an ordered category list: the first
/// non-empty entry is the primary category, normalized like a slug.
/// `fallback` (usually [`FALLBACK_CATEGORY`], configurable per site) is used
/// when the list is empty or nothing survives normalization.
pub fn resolve_category(categories: &[String], fallback: &str) -> String {
    categories
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .map(|c| slug_or(c, fallback))
        .unwrap_or_else(|| fallback.to_string())
}
