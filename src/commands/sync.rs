use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};

use rulesmgr::config;
use rulesmgr::prompts::{FixedDecision, InteractiveDecisions};
use rulesmgr::rules::RulesRepository;
use rulesmgr::sync::{Decision, DecisionProvider, Reconciler, SyncState};

use super::project_root;

/// How diverged files are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Strategy {
    /// Ask for each file
    #[default]
    Prompt,
    /// Replace every modified copy with its source
    Overwrite,
    /// Leave every modified copy untouched
    Skip,
}

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// How to resolve files that differ from their source
    #[arg(long, value_enum, default_value_t = Strategy::Prompt)]
    pub strategy: Strategy,
}

pub fn run_sync(args: SyncArgs, rules_root: &Path) -> Result<()> {
    config::require_rules_root(rules_root)?;
    let project = project_root(args.path)?;
    let reconciler = Reconciler::new(&project, RulesRepository::new(rules_root));

    println!("{}", "Scanning project for copied rules...\n".cyan());
    let discovery = reconciler.discover()?;

    if discovery.targets.is_empty() && discovery.manual.is_empty() {
        println!("No copied rules found to sync.");
        return Ok(());
    }

    let mut provider: Box<dyn DecisionProvider> = match args.strategy {
        Strategy::Prompt => Box::new(InteractiveDecisions::new()),
        Strategy::Overwrite => Box::new(FixedDecision(Decision::Overwrite)),
        Strategy::Skip => Box::new(FixedDecision(Decision::Skip)),
    };
    let report = reconciler.reconcile(&discovery, provider.as_mut())?;

    println!(
        "\n{} {} updated, {} skipped",
        "Sync complete:".green().bold(),
        report.updated().to_string().green(),
        report.skipped().to_string().yellow()
    );
    let up_to_date = report.count(SyncState::UpToDate);
    if up_to_date > 0 {
        println!("  {} already up to date", up_to_date.to_string().dimmed());
    }
    Ok(())
}
