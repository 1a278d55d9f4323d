use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use rulesmgr::config::{self, Config};
use rulesmgr::deployer::{DeployMode, Deployer, effective_mode};
use rulesmgr::error::Error;
use rulesmgr::rules::{RuleDocument, RulesRepository};
use rulesmgr::tools::{self, ToolCapability};
use rulesmgr::{gitignore, prompts};

use super::{project_root, split_list};

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Comma-separated list of target tools
    #[arg(long)]
    pub tools: Option<String>,

    /// Comma-separated list of languages
    #[arg(long)]
    pub lang: Option<String>,

    /// Comma-separated list of rules (default: all)
    #[arg(long)]
    pub rules: Option<String>,

    /// Use copy mode instead of symlinks
    #[arg(long)]
    pub copy: bool,

    /// Only update .gitignore from the rules directory template
    #[arg(long, conflicts_with_all = ["tools", "lang", "rules", "copy", "no_gitignore"])]
    pub gitignore: bool,

    /// Do not touch .gitignore
    #[arg(long)]
    pub no_gitignore: bool,
}

pub fn run_init(args: InitArgs, rules_root: &Path) -> Result<()> {
    config::require_rules_root(rules_root)?;
    let config = Config::load(rules_root)?;
    let repo = RulesRepository::new(rules_root);
    let project = project_root(args.path.clone())?;

    if args.gitignore {
        println!("{}", "➤ Updating .gitignore".cyan().bold());
        apply_gitignore(rules_root, &project, &config)?;
        return Ok(());
    }

    let selected_tools = select_tools(&args, &config)?;
    let languages = select_languages(&args, &config, &repo)?;
    let docs = collect_rules(&args, &repo, &languages)?;
    if docs.is_empty() {
        anyhow::bail!("No rules found in {}", rules_root.display());
    }
    let mode = select_mode(&args, &config)?;

    let deployer = Deployer::new(&project);
    let mut failed = 0usize;
    let mut written = 0usize;

    for tool in &selected_tools {
        let tool_mode = effective_mode(tool, mode);
        println!(
            "\n{} {}",
            tool.display_name.bold(),
            format!("({}, {})", tool.target_path, tool_mode).dimmed()
        );

        // A failing tool must not stop the others
        let outcome = deployer.deploy(&docs, tool, mode).and_then(|report| {
            deployer.deploy_settings(rules_root, tool)?;
            Ok(report)
        });
        match outcome {
            Ok(report) => written += report.files.len(),
            Err(e) => {
                tracing::error!(tool = tool.id, error = %e, "Deployment failed");
                eprintln!("  {} {}", "✗".red(), e);
                failed += 1;
            }
        }
    }

    if !args.no_gitignore && config.gitignore.enabled {
        println!("\n{}", "➤ Updating .gitignore".cyan().bold());
        apply_gitignore(rules_root, &project, &config)?;
    }

    if failed > 0 {
        anyhow::bail!("{} of {} tool(s) failed to deploy", failed, selected_tools.len());
    }

    println!("\n{}", "✨ Rules deployed!".green().bold());
    println!(
        "  Tools: {}, Rules: {}, Files written: {}",
        selected_tools.len().to_string().green(),
        docs.len().to_string().green(),
        written.to_string().green()
    );
    Ok(())
}

fn select_tools(args: &InitArgs, config: &Config) -> Result<Vec<&'static ToolCapability>> {
    let selected = match &args.tools {
        Some(list) => tools::parse_tool_list(list)?,
        None if !config.default_tools.is_empty() => {
            tools::resolve_tools(config.default_tools.iter().map(String::as_str))?
        }
        None => prompts::prompt_tools(tools::all())?,
    };
    if selected.is_empty() {
        anyhow::bail!("No tools selected");
    }
    Ok(selected)
}

fn select_languages(args: &InitArgs, config: &Config, repo: &RulesRepository) -> Result<Vec<String>> {
    if let Some(list) = &args.lang {
        return Ok(split_list(list));
    }
    if !config.default_languages.is_empty() {
        return Ok(config.default_languages.clone());
    }
    if prompts::is_interactive() {
        return Ok(prompts::prompt_languages(&repo.list_languages()?)?);
    }
    Ok(Vec::new())
}

fn select_mode(args: &InitArgs, config: &Config) -> Result<DeployMode> {
    if args.copy {
        return Ok(DeployMode::Copy);
    }
    if let Some(mode) = config.mode {
        return Ok(mode);
    }
    if args.tools.is_none() && prompts::is_interactive() {
        return Ok(prompts::prompt_deploy_mode()?);
    }
    Ok(DeployMode::Link)
}

/// Base rules (all, or the named ones) followed by the language rules.
fn collect_rules(
    args: &InitArgs,
    repo: &RulesRepository,
    languages: &[String],
) -> Result<Vec<RuleDocument>> {
    let mut docs = match &args.rules {
        Some(list) => {
            let mut picked = Vec::new();
            for name in split_list(list) {
                let rule = repo
                    .rule_by_name(&name)?
                    .ok_or(Error::UnknownRule { name })?;
                if !picked.iter().any(|r: &RuleDocument| r.name == rule.name) {
                    picked.push(rule);
                }
            }
            picked
        }
        None => repo.list_base_rules()?,
    };

    for language in languages {
        let rule = repo.language_rule(language)?.ok_or_else(|| Error::UnknownLanguage {
            language: language.clone(),
            available: repo.list_languages().unwrap_or_default(),
        })?;
        if !docs.iter().any(|d| d.name == rule.name) {
            docs.push(rule);
        }
    }
    Ok(docs)
}

fn apply_gitignore(rules_root: &Path, project: &Path, config: &Config) -> Result<()> {
    match gitignore::read_template(rules_root)? {
        Some(entries) => {
            gitignore::update_gitignore(project, &config.gitignore.marker, &entries)
                .with_context(|| format!("Failed to update .gitignore in {}", project.display()))?;
        }
        None => println!(
            "  {} No gitignore template in {}",
            "!".yellow(),
            rules_root.display()
        ),
    }
    Ok(())
}
