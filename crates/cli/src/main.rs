//! bugswap CLI - Main Entry Point
//!
//! Swaps clean source files of the demo application for buggy variants so
//! visual regression runs have something to catch, and puts them back.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use bugswap_cli::commands::{inject, list, restore, status};
use bugswap_cli::output::{self, print_error};
use bugswap_common::{Catalog, FixtureSwitcher};

/// Exit code for an unknown bug name
const EXIT_UNKNOWN_BUG: u8 = 2;

/// bugswap - inject and restore reproducible visual bugs
#[derive(Parser)]
#[command(name = "bugswap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Working-tree root that catalog paths are relative to
    #[arg(long, env = "BUGSWAP_ROOT", default_value = ".", global = true)]
    root: PathBuf,

    /// Catalog file (defaults to <root>/bugs.toml, then the built-in catalog)
    #[arg(long, env = "BUGSWAP_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "plain", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace a bug's target files with their buggy variants
    Inject(inject::InjectArgs),

    /// Copy backups back over a bug's targets, or every bug's when no name is given
    Restore(restore::RestoreArgs),

    /// List the bugs in the catalog
    List,

    /// Show which bugs are currently injected
    Status,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let switcher = match load_switcher(&cli) {
        Ok(switcher) => switcher,
        Err(e) => {
            print_error(&format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Inject(args) => inject::execute(args, &switcher, cli.format),
        Commands::Restore(args) => restore::execute(args, &switcher, cli.format),
        Commands::List => list::execute(&switcher, cli.format),
        Commands::Status => status::execute(&switcher, cli.format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:#}", e));
            let unknown = e
                .downcast_ref::<bugswap_common::Error>()
                .is_some_and(|err| err.is_unknown_bug());
            if unknown {
                eprintln!("Available bugs:");
                list::print_catalog(&switcher, cli.format);
                ExitCode::from(EXIT_UNKNOWN_BUG)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn load_switcher(cli: &Cli) -> anyhow::Result<FixtureSwitcher> {
    let catalog = Catalog::discover(&cli.root, cli.catalog.as_deref())
        .context("Failed to load bug catalog")?;
    debug!(
        "Using catalog {} with root {}",
        catalog.source(),
        cli.root.display()
    );
    Ok(FixtureSwitcher::new(cli.root.clone(), catalog))
}
