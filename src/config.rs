//! Site configuration module.
//!
//! Handles loading and validating `config.toml` from the source root.
//! Paths never live here — the CLI passes the source and output roots
//! explicitly into each pipeline stage — so configuration is purely about
//! how documents and listing pages are formatted.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! wrap_width = 80                      # Max line width for document bodies
//! fallback_category = "uncategorised"  # Placement for category-less recipes
//!
//! [pages]
//! all_title = "All Recipes"            # Heading of the all-recipes listing
//! tags_title = "Tags"                  # Heading of the tag listing
//! ```
//!
//! Config files are sparse — override just the values you want.
//! Unknown keys are rejected to catch typos early.

use crate::naming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Formatting configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Maximum line width for generated Markdown bodies.
    pub wrap_width: usize,
    /// Category used for recipes that declare none. Must already be in
    /// slug form — it becomes a directory name as-is.
    pub fallback_category: String,
    /// Headings for the generated listing pages.
    pub pages: PagesConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            wrap_width: 80,
            fallback_category: naming::FALLBACK_CATEGORY.to_string(),
            pages: PagesConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wrap_width < 30 {
            return Err(ConfigError::Validation(
                "wrap_width must be at least 30".into(),
            ));
        }
        if self.fallback_category.is_empty()
            || naming::slugify(&self.fallback_category) != self.fallback_category
        {
            return Err(ConfigError::Validation(
                "fallback_category must be a non-empty slug (lowercase, a-z0-9 and dashes)".into(),
            ));
        }
        if self.pages.all_title.trim().is_empty() || self.pages.tags_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "page titles must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Headings for generated listing pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// Heading of the all-recipes listing page.
    pub all_title: String,
    /// Heading of the tag listing page.
    pub tags_title: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            all_title: "All Recipes".to_string(),
            tags_title: "Tags".to_string(),
        }
    }
}

/// Load config from `config.toml` in the given directory.
///
/// Uses stock defaults if the file doesn't exist, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# recipe-press Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the source root (next to your recipe JSON files).
# Unknown keys will cause an error.

# Maximum line width for generated Markdown bodies. List items wrap with a
# hanging indent; code blocks and tables are never wrapped.
wrap_width = 80

# Recipes with no categories are placed in this directory. Must be in slug
# form (lowercase letters, digits, dashes).
fallback_category = "uncategorised"

# ---------------------------------------------------------------------------
# Listing pages
# ---------------------------------------------------------------------------
[pages]
# Heading of the all-recipes listing page (_all.md).
all_title = "All Recipes"

# Heading of the tag listing page (tags.md).
tags_title = "Tags"
"##
}
