//! depscan CLI - lftp transfer and HTTP call inventory.
//!
//! Usage:
//!   depscan                          # scan the current repository
//!   depscan -r ../service --summary summary.json
//!
//! Writes the DSL listing and prints the JSON summary on stdout.
//! Logs go to stderr (`RUST_LOG` or `--verbose`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use depscan::cli::Cli;
use depscan::{render_dsl, render_summary, Scanner};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config();

    let mut scanner = Scanner::new(&config);
    scanner.scan_repository(&cli.root);
    let report = scanner.finish();

    let dsl = render_dsl(&report.findings);
    write_output(&config.output.dsl, &dsl)?;
    info!(path = %config.output.dsl.display(), "DSL written");

    let summary = render_summary(&report.statistics).context("failed to serialize summary")?;
    if let Some(path) = &config.output.summary {
        write_output(path, &summary)?;
        info!(path = %path.display(), "summary written");
    }

    println!("DSL file generated: {}", config.output.dsl.display());
    println!("Scan Details:");
    println!("{}", summary);
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
