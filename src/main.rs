//! rulesmgr CLI
//!
//! Command-line interface for deploying and syncing AI coding rules.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::{init::InitArgs, sync::SyncArgs};
use rulesmgr::config::{self, RULES_DIR_ENV};

#[derive(Parser)]
#[command(name = "rulesmgr")]
#[command(author, version, about = "Unified rules manager for AI coding tools")]
#[command(propagate_version = true)]
struct Cli {
    /// Rules directory (default: ~/.rules-manager)
    #[arg(long, global = true, env = RULES_DIR_ENV)]
    rules_dir: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the rules directory with example rules
    Setup {
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Deploy rules to a project
    Init(InitArgs),

    /// Sync copied rules with their source
    Sync(SyncArgs),

    /// List supported tools and available rules
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rules_root = config::rules_root(cli.rules_dir.as_deref());

    match cli.command {
        Commands::Setup { force } => {
            println!(
                "{}",
                format!("Setting up rules directory at {}...\n", rules_root.display()).cyan()
            );
            let result = rulesmgr::setup::setup(&rules_root, force)?;
            println!("\n{}", "✨ Setup complete!".green().bold());
            println!(
                "  Created: {}, Skipped: {}",
                result.created.to_string().green(),
                result.skipped.to_string().dimmed()
            );
            println!("\nEdit your rules in {}", rules_root.display().to_string().cyan());
        }
        Commands::Init(args) => commands::init::run_init(args, &rules_root)?,
        Commands::Sync(args) => commands::sync::run_sync(args, &rules_root)?,
        Commands::List => commands::list::run_list(&rules_root)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "rulesmgr=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore a second init; only happens if something else installed a subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
