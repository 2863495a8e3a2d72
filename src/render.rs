//! Recipe-to-Markdown rendering.
//!
//! A pure function from one parsed [`Recipe`] to one formatted document:
//! no I/O, no clock, no global state. Determinism is a hard requirement —
//! the incremental build compares fingerprints, not output bytes, so a
//! renderer that embedded a timestamp would make every skip decision
//! meaningless. Identical input (plus the same fingerprint) produces
//! byte-identical output.
//!
//! ## Document shape
//!
//! ```text
//! ---
//! title: "Tomato Soup"
//! slug: tomato-soup
//! fingerprint: 9f86d08…
//! serves: "4"
//! tags:
//!   - vegan
//! categories:
//!   - Soups
//! ---
//!
//! - Serves: 4
//! - Tags: vegan
//!
//! ## Ingredients
//!
//! - 2 cup tomato
//!
//! ## Method
//!
//! 1. Simmer.
//! ```
//!
//! Each section is produced by its own small renderer function and the
//! results are stitched together, so sections can be tested (and evolve)
//! independently. The assembled body goes through
//! [`markdown::normalize`](crate::markdown::normalize) before it leaves
//! this module.

use crate::config::SiteConfig;
use crate::markdown;
use crate::naming;
use crate::recipe::{Ingredient, NutritionValue, Recipe};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("recipe must include a non-empty 'title'")]
    MissingTitle,
}

/// A rendered document plus its derived output identity.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Normalized primary category — the output subdirectory.
    pub category: String,
    /// Normalized slug — the output file stem.
    pub slug: String,
    /// Complete document text (front matter + body), ready to write.
    pub body: String,
}

/// Render one recipe into a complete document. `digest` is the fingerprint
/// of the raw source bytes and is recorded in the front matter for the next
/// run's skip decision.
pub fn render(recipe: &Recipe, digest: &str, config: &SiteConfig) -> Result<Rendered, RenderError> {
    let title = recipe
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(RenderError::MissingTitle)?;

    let slug = naming::resolve_slug(recipe.slug.as_deref(), title);
    let category = naming::resolve_category(&recipe.categories, &config.fallback_category);

    let fm = front_matter(recipe, title, &slug, digest);

    let mut sections: Vec<String> = Vec::new();
    if let Some(facts) = facts_section(recipe) {
        sections.push(facts);
    }
    sections.push(ingredients_section(&recipe.ingredients));
    if let Some(method) = method_section(&recipe.method) {
        sections.push(method);
    }
    if let Some(notes) = notes_section(&recipe.notes) {
        sections.push(notes);
    }
    if let Some(nutrition) = nutrition_section(recipe) {
        sections.push(nutrition);
    }

    let body = markdown::normalize(&sections.join("\n\n"), config.wrap_width);
    let document = format!("{}\n\n{}", fm, body);

    Ok(Rendered {
        category,
        slug,
        body: document,
    })
}

/// The `---`-delimited header. Scalar fields are emitted only when present;
/// list fields only when non-empty. The title is quoted (it may contain
/// anything), slugs and the fingerprint are emitted bare.
fn front_matter(recipe: &Recipe, title: &str, slug: &str, digest: &str) -> String {
    let mut lines = vec![
        "---".to_string(),
        format!("title: \"{}\"", title.replace('"', "\\\"")),
        format!("slug: {}", slug),
        format!("fingerprint: {}", digest),
    ];

    let scalars = [
        ("serves", &recipe.serves),
        ("prep_time", &recipe.prep_time),
        ("cook_time", &recipe.cook_time),
        ("difficulty", &recipe.difficulty),
    ];
    for (key, value) in scalars {
        if let Some(v) = value {
            lines.push(format!("{}: \"{}\"", key, v.replace('"', "\\\"")));
        }
    }

    let lists = [
        ("equipment", &recipe.equipment),
        ("tags", &recipe.tags),
        ("categories", &recipe.categories),
    ];
    for (key, values) in lists {
        if !values.is_empty() {
            lines.push(format!("{}:", key));
            lines.extend(values.iter().map(|v| format!("  - {}", v)));
        }
    }

    lines.push("---".to_string());
    lines.join("\n")
}

/// At-a-glance facts as a bullet block. `None` when the recipe has no
/// facts to show.
fn facts_section(recipe: &Recipe) -> Option<String> {
    let mut bullets = Vec::new();
    if let Some(v) = &recipe.serves {
        bullets.push(format!("- Serves: {}", v));
    }
    if let Some(v) = &recipe.prep_time {
        bullets.push(format!("- Prep Time: {}", v));
    }
    if let Some(v) = &recipe.cook_time {
        bullets.push(format!("- Cook Time: {}", v));
    }
    if !recipe.equipment.is_empty() {
        bullets.push(format!("- Equipment: {}", recipe.equipment.join(", ")));
    }
    if let Some(v) = &recipe.difficulty {
        bullets.push(format!("- Difficulty: {}", v));
    }
    if !recipe.tags.is_empty() {
        bullets.push(format!("- Tags: {}", recipe.tags.join(", ")));
    }
    if bullets.is_empty() {
        None
    } else {
        Some(bullets.join("\n"))
    }
}

/// The Ingredients section is always present, with a placeholder when the
/// list is empty.
fn ingredients_section(ingredients: &[Ingredient]) -> String {
    let mut lines = vec!["## Ingredients".to_string()];
    if ingredients.is_empty() {
        lines.push("_No ingredients listed._".to_string());
    } else {
        lines.extend(ingredients.iter().map(|i| format!("- {}", format_ingredient(i))));
    }
    lines.join("\n")
}

/// `quantity unit item (note)` with absent segments skipped. An entry with
/// nothing to show renders a fixed placeholder rather than a bare dash.
fn format_ingredient(ingredient: &Ingredient) -> String {
    let parts: Vec<&str> = [&ingredient.quantity, &ingredient.unit, &ingredient.item]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect();
    let mut line = parts.join(" ");
    if let Some(note) = &ingredient.note {
        if line.is_empty() {
            line = format!("({})", note);
        } else {
            line = format!("{} ({})", line, note);
        }
    }
    if line.is_empty() {
        "_unspecified_".to_string()
    } else {
        line
    }
}

/// Method steps as a numbered list. `None` when there are no steps.
fn method_section(steps: &[String]) -> Option<String> {
    if steps.is_empty() {
        return None;
    }
    let mut lines = vec!["## Method".to_string()];
    lines.extend(
        steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step)),
    );
    Some(lines.join("\n"))
}

fn notes_section(notes: &[String]) -> Option<String> {
    if notes.is_empty() {
        return None;
    }
    let mut lines = vec!["## Notes".to_string()];
    lines.extend(notes.iter().map(|n| format!("- {}", n)));
    Some(lines.join("\n"))
}

/// Nutrition facts, one bullet per entry, nested groups indented. Keys come
/// from a `BTreeMap`, so ordering is stable regardless of source order.
fn nutrition_section(recipe: &Recipe) -> Option<String> {
    let nutrition = recipe.nutrition.as_ref().filter(|n| !n.is_empty())?;
    let mut lines = vec!["## Nutrition".to_string()];
    for (key, value) in nutrition {
        push_nutrition(&mut lines, 0, key, value);
    }
    Some(lines.join("\n"))
}

fn push_nutrition(lines: &mut Vec<String>, depth: usize, key: &str, value: &NutritionValue) {
    let indent = "  ".repeat(depth);
    match value {
        NutritionValue::Number(n) => lines.push(format!("{}- {}: {}", indent, key, n)),
        NutritionValue::Text(t) => lines.push(format!("{}- {}: {}", indent, key, t)),
        NutritionValue::Nested(children) => {
            lines.push(format!("{}- {}:", indent, key));
            for (child_key, child) in children {
                push_nutrition(lines, depth + 1, child_key, child);
            }
        }
    }
}
