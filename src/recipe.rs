//! Recipe data model and lenient JSON deserialization.
//!
//! One source file holds one recipe as a self-describing JSON object. The
//! only hard requirement is a non-empty `title` (enforced at render time);
//! everything else is optional and tolerated in the shapes real data files
//! actually arrive in:
//!
//! - List fields (`categories`, `tags`, `equipment`, `notes`) also accept a
//!   single bare string, which reads as a one-element list.
//! - Scalar fields (`serves`, ingredient quantities, …) also accept numbers
//!   and booleans, which are coerced to their string form.
//! - `null` anywhere reads as "absent".
//!
//! `ingredients` and `method` are the exception: when present they must be
//! real JSON arrays. A recipe with `"method": "stir"` is malformed and fails
//! deserialization, which the build driver reports as a per-recipe
//! validation failure.
//!
//! Tags are case-folded and deduplicated on entry so that downstream
//! consumers (the tag index builder) never see `"Vegan"` and `"vegan"` as
//! distinct tags.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// One structured ingredient entry. All sub-fields are optional; the
/// renderer skips empty segments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Ingredient {
    #[serde(deserialize_with = "lenient_string")]
    pub quantity: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub unit: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub item: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub note: Option<String>,
}

/// A nutrition value: a number, a free-form string (`"12 g"`), or a nested
/// group of values. Display only — never interpreted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NutritionValue {
    Number(serde_json::Number),
    Text(String),
    Nested(BTreeMap<String, NutritionValue>),
}

/// One recipe, as parsed from a source JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Recipe {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub serves: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub prep_time: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub cook_time: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub difficulty: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub equipment: Vec<String>,
    #[serde(deserialize_with = "strict_list_of_ingredients")]
    pub ingredients: Vec<Ingredient>,
    #[serde(deserialize_with = "strict_list_of_strings")]
    pub method: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub notes: Vec<String>,
    #[serde(alias = "meta")]
    pub nutrition: Option<BTreeMap<String, NutritionValue>>,
}

impl Recipe {
    /// Deserialize a recipe from an already-parsed JSON value, then apply
    /// field normalization (tag case-folding and deduplication).
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let mut recipe: Recipe = serde_json::from_value(value.clone())?;
        recipe.tags = fold_tags(&recipe.tags);
        Ok(recipe)
    }
}

/// Lowercase, trim, and deduplicate tags, preserving first-seen order.
fn fold_tags(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        let folded = tag.trim().to_lowercase();
        if !folded.is_empty() && !seen.contains(&folded) {
            seen.push(folded);
        }
    }
    seen
}

/// A JSON scalar that coerces to a string: `"2"`, `2`, `2.5`, `true`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn trimmed(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// `Option<String>` from a string, number, bool, or null. Blank strings
/// read as absent.
fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let scalar = Option::<Scalar>::deserialize(de)?;
    Ok(scalar.and_then(|s| trimmed(s.into_string())))
}

/// `Vec<String>` from a list of scalars, a single bare scalar, or null.
/// Blank entries are dropped.
fn string_or_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Scalar),
        Many(Vec<Scalar>),
    }

    let field = Option::<OneOrMany>::deserialize(de)?;
    Ok(match field {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => trimmed(s.into_string()).into_iter().collect(),
        Some(OneOrMany::Many(items)) => items
            .into_iter()
            .filter_map(|s| trimmed(s.into_string()))
            .collect(),
    })
}

/// `Vec<String>` that must be a real JSON array (or null/absent). A bare
/// string here is a structural mistake, not a shorthand.
fn strict_list_of_strings<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Scalar>>::deserialize(de)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| trimmed(s.into_string()))
        .collect())
}

fn strict_list_of_ingredients<'de, D>(de: D) -> Result<Vec<Ingredient>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Ingredient>>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Recipe {
        Recipe::from_value(&value).unwrap()
    }

    #[test]
    fn minimal_recipe_parses() {
        let r = parse(json!({"title": "Toast"}));
        assert_eq!(r.title.as_deref(), Some("Toast"));
        assert!(r.ingredients.is_empty());
        assert!(r.method.is_empty());
    }

    #[test]
    fn full_recipe_parses() {
        let r = parse(json!({
            "title": "Tomato Soup",
            "slug": "tomato-soup",
            "categories": ["Soups"],
            "tags": ["Vegan", "winter"],
            "serves": 4,
            "prep_time": "10 min",
            "cook_time": "25 min",
            "difficulty": "easy",
            "equipment": "blender",
            "ingredients": [
                {"quantity": "2", "unit": "cup", "item": "tomato"},
                {"quantity": 1, "item": "onion", "note": "diced"}
            ],
            "method": ["Simmer.", "Blend."],
            "notes": "Freezes well.",
            "nutrition": {"calories": 120, "fat": "2 g"}
        }));
        assert_eq!(r.serves.as_deref(), Some("4"));
        assert_eq!(r.equipment, vec!["blender"]);
        assert_eq!(r.notes, vec!["Freezes well."]);
        assert_eq!(r.ingredients.len(), 2);
        assert_eq!(r.ingredients[1].quantity.as_deref(), Some("1"));
        assert_eq!(r.method, vec!["Simmer.", "Blend."]);
        assert!(r.nutrition.is_some());
    }

    #[test]
    fn tags_are_folded_and_deduplicated() {
        let r = parse(json!({"title": "T", "tags": ["Vegan", "vegan", " Winter "]}));
        assert_eq!(r.tags, vec!["vegan", "winter"]);
    }

    #[test]
    fn bare_string_reads_as_single_element_list() {
        let r = parse(json!({"title": "T", "categories": "Soups"}));
        assert_eq!(r.categories, vec!["Soups"]);
    }

    #[test]
    fn null_fields_read_as_absent() {
        let r = parse(json!({
            "title": "T",
            "tags": null,
            "method": null,
            "ingredients": null,
            "serves": null
        }));
        assert!(r.tags.is_empty());
        assert!(r.method.is_empty());
        assert!(r.ingredients.is_empty());
        assert!(r.serves.is_none());
    }

    #[test]
    fn blank_list_entries_are_dropped() {
        let r = parse(json!({"title": "T", "notes": ["", "  ", "keep"]}));
        assert_eq!(r.notes, vec!["keep"]);
    }

    #[test]
    fn method_must_be_a_list() {
        let result = Recipe::from_value(&json!({"title": "T", "method": "stir"}));
        assert!(result.is_err());
    }

    #[test]
    fn ingredients_must_be_a_list() {
        let result = Recipe::from_value(&json!({"title": "T", "ingredients": "tomato"}));
        assert!(result.is_err());
    }

    #[test]
    fn numeric_scalars_coerce_to_strings() {
        let r = parse(json!({"title": "T", "serves": 6, "prep_time": 15}));
        assert_eq!(r.serves.as_deref(), Some("6"));
        assert_eq!(r.prep_time.as_deref(), Some("15"));
    }

    #[test]
    fn meta_is_an_alias_for_nutrition() {
        let r = parse(json!({"title": "T", "meta": {"calories": 99}}));
        let nutrition = r.nutrition.unwrap();
        assert!(nutrition.contains_key("calories"));
    }

    #[test]
    fn nested_nutrition_parses() {
        let r = parse(json!({
            "title": "T",
            "nutrition": {"per_serving": {"calories": 120, "protein": "3 g"}}
        }));
        let n = r.nutrition.unwrap();
        assert!(matches!(n["per_serving"], NutritionValue::Nested(_)));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let r = parse(json!({"title": "T", "author": "someone", "rating": 5}));
        assert_eq!(r.title.as_deref(), Some("T"));
    }
}
