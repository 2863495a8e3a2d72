//! # recipe-press
//!
//! A minimal static build pipeline for structured recipe collections.
//! Your filesystem is the data source: a directory of recipe JSON files
//! becomes a tree of Markdown documents plus cross-reference pages, and
//! the generated tree is kept consistent with the source set on every run.
//!
//! # Architecture: Plan, Build, Reconcile, Index
//!
//! A build run moves through four strictly ordered stages:
//!
//! ```text
//! 1. Scan + Plan   data/recipes/  →  expected-output set   (+ collision check)
//! 2. Build         plan           →  recipes/<cat>/<slug>.md   (skip unchanged)
//! 3. Reconcile     plan vs disk   →  orphans deleted, empty dirs pruned
//! 4. Index         recipes/       →  _all.md, <cat>/index.md, tags/
//! ```
//!
//! The separation exists for three reasons:
//!
//! - **Safety**: collisions (two recipes claiming one output path) are
//!   detected in the plan stage, before the first write. Deletion happens
//!   only after the full build pass, against the authoritative plan.
//! - **Incremental builds**: every document embeds a SHA-256 fingerprint of
//!   the source bytes that produced it; unchanged recipes are skipped and a
//!   fully unchanged run performs zero writes.
//! - **Testability**: rendering is a pure function, and each stage is
//!   exercised against a plain temp directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Source discovery — finds recipe JSON files, excludes templates |
//! | [`plan`] | Output planning — assigns `(category, slug)` identities, rejects collisions |
//! | [`process`] | Build driver — fingerprint comparison, render, write; per-record failure handling |
//! | [`reconcile`] | Orphan removal and bottom-up empty-directory pruning |
//! | [`indexes`] | Cross-reference pages — all-recipes, per-category, per-tag listings |
//! | [`render`] | Pure recipe → Markdown document rendering |
//! | [`recipe`] | Recipe data model with lenient JSON deserialization |
//! | [`cache`] | Content fingerprints and the per-run fingerprint index |
//! | [`frontmatter`] | Reading generated document headers back |
//! | [`naming`] | Slug and category normalization |
//! | [`markdown`] | Body normalization, wrapping, relative links |
//! | [`config`] | `config.toml` loading and validation |
//! | [`output`] | CLI output formatting — per-record status and final counts |
//!
//! # Design Decisions
//!
//! ## The Output Tree Is the Cache
//!
//! There is no manifest file. Each document's front matter records the
//! fingerprint of the source that produced it, so the skip decision needs
//! nothing but the output tree itself — deleting a document is all it takes
//! to force its rebuild, and the "cache" can never drift out of sync with
//! the outputs it describes.
//!
//! ## Fail One Recipe, Build the Rest
//!
//! A recipe that fails validation is reported and counted, but the pass
//! continues; the process exits non-zero afterwards. The planner still
//! claims the broken recipe's output path, so the reconciler preserves its
//! last good document. Only a recipe that disappears entirely loses its
//! output.
//!
//! ## Aggregate Pages Are Owned Downstream
//!
//! Listing pages (`_all.md`, category indexes, tag pages) are derived from
//! the generated documents, not from the sources, and the index builder
//! alone creates and removes them. The reconciler treats them as invisible.

pub mod cache;
pub mod config;
pub mod frontmatter;
pub mod indexes;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod plan;
pub mod process;
pub mod recipe;
pub mod reconcile;
pub mod render;
pub mod scan;
