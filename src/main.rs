use clap::{Parser, Subcommand};
use recipe_press::{cache, config, indexes, output, plan, process, recipe, reconcile, render, scan};
use std::path::PathBuf;

/// Shared flags for commands that write documents.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Bypass the fingerprint check — re-render every recipe
    #[arg(long)]
    force: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "recipe-press")]
#[command(about = "Static build pipeline for recipe collections")]
#[command(long_about = "\
Static build pipeline for recipe collections

Your filesystem is the data source. Each JSON file under the source
directory is one recipe; each build produces one Markdown document per
recipe plus cross-reference pages, and removes outputs whose source has
disappeared.

Source structure:

  data/recipes/
  ├── config.toml              # Formatting config (optional)
  ├── _example.json            # Template files are skipped
  ├── tomato-soup.json         # One recipe per file
  └── breads/
      └── flatbread.json       # Subdirectories are fine

Output structure:

  recipes/
  ├── _all.md                  # All recipes, linked by title
  ├── tags.md                  # Tag listing with counts
  ├── tags/vegan.md            # One page per live tag
  └── soups/
      ├── index.md             # Category listing
      └── tomato-soup.md       # categories[0] + slug decide placement

Each document embeds a fingerprint of its source; unchanged recipes are
skipped on rebuild. Run 'recipe-press gen-config' for a documented
config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory of recipe JSON files
    #[arg(long, default_value = "data/recipes", global = true)]
    source: PathBuf,

    /// Output directory for generated Markdown
    #[arg(long, default_value = "recipes", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: plan → build → reconcile → indexes
    Build(BuildArgs),
    /// Convert one recipe file to an explicit output path (no cleanup)
    Convert {
        /// Recipe JSON file
        input: PathBuf,
        /// Destination Markdown file
        #[arg(value_name = "OUTPUT")]
        dest: PathBuf,
    },
    /// Validate all recipe sources without writing
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(build_args) => {
            let site_config = config::load_config(&cli.source)?;

            println!("==> Stage 1: Planning from {}", cli.source.display());
            let sources = scan::scan(&cli.source)?;
            let build_plan = plan::plan(&sources, &site_config)?;
            println!(
                "{} recipe file(s), {} unreadable",
                sources.len(),
                build_plan.failures.len()
            );

            println!("==> Stage 2: Building {}", cli.output.display());
            let report = process::process(
                &build_plan,
                &cli.output,
                &site_config,
                &process::BuildOptions {
                    force: build_args.force,
                },
            )?;
            output::print_build_report(&report);

            println!("==> Stage 3: Reconciling");
            let reconciled = reconcile::reconcile(&build_plan.expected_paths(), &cli.output)?;
            output::print_reconcile_report(&reconciled);

            println!("==> Stage 4: Indexes");
            let indexed = indexes::build_indexes(&cli.output, &site_config)?;
            output::print_index_report(&indexed);

            println!("{}", output::format_summary(&report));
            if !report.is_success() {
                return Err(format!("{} recipe(s) failed", report.failed()).into());
            }
        }
        Command::Convert { input, dest } => {
            let site_config = config::load_config(&cli.source)?;
            let bytes = std::fs::read(&input)?;
            let digest = cache::fingerprint(&bytes);
            let value: serde_json::Value = serde_json::from_slice(&bytes)?;
            let parsed = recipe::Recipe::from_value(&value)?;
            let rendered = render::render(&parsed, &digest, &site_config)?;
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&dest, rendered.body)?;
            println!("{} \u{2192} {}", input.display(), dest.display());
        }
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let sources = scan::scan(&cli.source)?;
            let build_plan = plan::plan(&sources, &site_config)?;

            let mut failed = build_plan.failures.len();
            for failure in &build_plan.failures {
                println!("    {} (failed: {})", failure.source.display(), failure.error);
            }
            for record in &build_plan.records {
                let result = recipe::Recipe::from_value(&record.value)
                    .map_err(|e| e.to_string())
                    .and_then(|r| {
                        render::render(&r, "check", &site_config).map_err(|e| e.to_string())
                    });
                match result {
                    Ok(_) => println!(
                        "    {} \u{2192} {}",
                        record.title,
                        record.rel_output_path().display()
                    ),
                    Err(e) => {
                        failed += 1;
                        println!("    {} (failed: {})", record.title, e);
                    }
                }
            }

            let total = build_plan.records.len() + build_plan.failures.len();
            println!("==> {} recipe(s), {} failed", total, failed);
            if failed > 0 {
                return Err(format!("{failed} recipe(s) failed validation").into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
