//! `keymap-schema` — Derives the master trait schema from the key-map headers.
//!
//! **Outputs:**
//! - `<output>` — base schema merged with the generated `$defs`
//! - `<fragments-dir>/<admin_type>.json` — per-admin-type fragments (optional)
//!
//! **Usage:**
//! ```
//! keymap-schema [--config <keymap.toml>] [--key-map-dir <path>] [--legacy-dir <path>]
//!               [--base-schema <path>] [--output <path>] [--fragments-dir <path>]
//!               [--lenient] [--operator-codes] [--verbose]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use keymap_codegen::{generate, GeneratorConfig};

/// Generate the key-map trait schema.
#[derive(Parser)]
#[command(
    name = "keymap-schema",
    about = "Derive JSON Schema trait definitions from key-map headers"
)]
struct Args {
    /// TOML configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of `key_map_<admin_type>.hpp` sources.
    #[arg(long)]
    key_map_dir: Option<PathBuf>,

    /// Directory of `<code>_admin.json` legacy support matrices.
    #[arg(long)]
    legacy_dir: Option<PathBuf>,

    /// Hand-maintained base schema.
    #[arg(long)]
    base_schema: Option<PathBuf>,

    /// Output path of the master schema.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also write each admin type's fragment into this directory.
    #[arg(long)]
    fragments_dir: Option<PathBuf>,

    /// Warn instead of failing on malformed paths, unmapped types, and missing matrix entries.
    #[arg(long)]
    lenient: bool,

    /// Print the unique operator codes seen in validated traits.
    #[arg(long)]
    operator_codes: bool,

    /// Enable debug logging.
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        if let Some(dir) = self.key_map_dir {
            config.key_map_dir = dir;
        }
        if let Some(dir) = self.legacy_dir {
            config.legacy_dir = dir;
        }
        if let Some(path) = self.base_schema {
            config.base_schema = path;
        }
        if let Some(path) = self.output {
            config.output = path;
        }
        if self.fragments_dir.is_some() {
            config.fragments_dir = self.fragments_dir;
        }
        if self.lenient {
            config.strict = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    keymap_clients::init_logging(args.verbose);
    let print_codes = args.operator_codes;
    let config = args.into_config()?;

    let report = generate(&config)?;

    println!("Key-map schema generation");
    for summary in &report.admin_types {
        println!(
            "  {}: {} segments, {} traits",
            summary.admin_type, summary.segment_count, summary.trait_count
        );
    }
    println!("  Definitions: {}", report.definition_count);
    for file in &report.files {
        println!("  Written: {file}");
    }
    if print_codes {
        println!("Operator codes:");
        for code in &report.operator_codes {
            println!("  {code}");
        }
    }

    println!("Schema generation complete.");
    Ok(())
}
