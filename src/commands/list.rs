use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use rulesmgr::rules::RulesRepository;
use rulesmgr::tools;

pub fn run_list(rules_root: &Path) -> Result<()> {
    println!("{}", "Supported tools:".bold());
    for tool in tools::all() {
        let mode = if tool.supports_link { "link/copy" } else { "copy" };
        let layout = match (tool.supports_multi_file, tool.uses_mdc()) {
            (true, true) => "per rule, .mdc",
            (true, false) => "per rule",
            (false, _) => "merged",
        };
        let limit = tool
            .char_limit
            .map(|l| format!(", limit {l} chars"))
            .unwrap_or_default();
        println!(
            "  {:<12} {:<12} {} {}",
            tool.id.cyan(),
            tool.display_name,
            tool.target_path,
            format!("({mode}, {layout}{limit})").dimmed()
        );
    }

    let repo = RulesRepository::new(rules_root);
    println!("\n{} {}", "Rules in".bold(), repo.root().display().to_string().dimmed());
    if !repo.root().is_dir() {
        println!("  {} Not set up yet, run \"rulesmgr setup\"", "!".yellow());
        return Ok(());
    }

    let rules = repo.list_base_rules()?;
    if rules.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for rule in &rules {
        println!("  {:>4}  {}", rule.priority, rule.name);
    }

    let languages = repo.list_languages()?;
    println!("\n{}", "Languages:".bold());
    if languages.is_empty() {
        println!("  {}", "(none)".dimmed());
    } else {
        println!("  {}", languages.join(", "));
    }
    Ok(())
}
