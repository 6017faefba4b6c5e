//! `keymap-conformance` — Checks a generated master schema.
//!
//! Runs the partition, operator-code, wildcard, closure, and reference checks
//! and prints one line per result.
//!
//! **Usage:**
//! ```
//! keymap-conformance [--schema <path>]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use keymap_conformance::{run_all, Severity};

/// Run the key-map schema conformance checks.
#[derive(Parser)]
#[command(
    name = "keymap-conformance",
    about = "Check a generated key-map master schema"
)]
struct Args {
    /// Path to the master schema (default: schemas/sear_schema.json).
    #[arg(long, default_value = "schemas/sear_schema.json")]
    schema: PathBuf,

    /// Enable debug logging.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    keymap_clients::init_logging(args.verbose);

    let report = run_all(&args.schema)?;

    println!("Key-map Schema Conformance Report");
    println!("=================================");
    println!();

    for result in &report.results {
        println!("[{}] {} — {}", result.severity, result.check, result.message);
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    let passed = report.count(Severity::Pass);
    let warned = report.count(Severity::Warning);
    let failed = report.count(Severity::Failure);
    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        passed, warned, failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
