//! Interactive prompts
//!
//! Core modules never prompt; commands call these when a value was not given
//! on the command line or in `config.toml`.

use dialoguer::{MultiSelect, Select, theme::ColorfulTheme};
use is_terminal::IsTerminal;

use crate::deployer::DeployMode;
use crate::error::{Error, Result};
use crate::sync::{Decision, DecisionProvider, DiffPreview};
use crate::tools::ToolCapability;

/// True when stdin and stdout are attached to a terminal.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

fn require_interactive(what: &'static str) -> Result<()> {
    if is_interactive() {
        Ok(())
    } else {
        Err(Error::NotInteractive(what))
    }
}

/// Ask for at least one tool.
pub fn prompt_tools(available: &'static [ToolCapability]) -> Result<Vec<&'static ToolCapability>> {
    require_interactive("Tool selection")?;
    let theme = ColorfulTheme::default();
    let names: Vec<&str> = available.iter().map(|t| t.display_name).collect();

    loop {
        let selections = MultiSelect::with_theme(&theme)
            .with_prompt("Select target tools")
            .items(&names)
            .interact()?;
        if selections.is_empty() {
            eprintln!("You must select at least one tool.");
            continue;
        }
        return Ok(selections.into_iter().map(|idx| &available[idx]).collect());
    }
}

/// Ask for languages; an empty selection is allowed.
pub fn prompt_languages(available: &[String]) -> Result<Vec<String>> {
    if available.is_empty() {
        return Ok(Vec::new());
    }
    require_interactive("Language selection")?;

    let labels: Vec<String> = available.iter().map(|l| capitalize(l)).collect();
    let selections = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select languages (optional, press Enter to skip)")
        .items(&labels)
        .interact()?;
    Ok(selections.into_iter().map(|idx| available[idx].clone()).collect())
}

pub fn prompt_deploy_mode() -> Result<DeployMode> {
    require_interactive("Deployment mode selection")?;
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Deployment mode")
        .items(&["Link (recommended)", "Copy"])
        .default(0)
        .interact()?;
    Ok(if choice == 0 {
        DeployMode::Link
    } else {
        DeployMode::Copy
    })
}

/// Asks per diverged file on the terminal.
pub struct InteractiveDecisions {
    theme: ColorfulTheme,
}

impl InteractiveDecisions {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn select(&self, name: &str, items: &[&str]) -> Result<usize> {
        require_interactive("Resolving modified files")?;
        Ok(Select::with_theme(&self.theme)
            .with_prompt(format!("{name} has local modifications. How to handle?"))
            .items(items)
            .default(0)
            .interact()?)
    }
}

impl DecisionProvider for InteractiveDecisions {
    fn decide(&mut self, name: &str) -> Result<Decision> {
        Ok(match self.select(name, &["Overwrite", "Skip", "Show diff"])? {
            0 => Decision::Overwrite,
            1 => Decision::Skip,
            _ => Decision::Diff,
        })
    }

    fn decide_after_diff(&mut self, name: &str) -> Result<Decision> {
        Ok(match self.select(name, &["Overwrite", "Skip"])? {
            1 => Decision::Skip,
            _ => Decision::Overwrite,
        })
    }

    fn show_diff(&mut self, preview: &DiffPreview) {
        println!("{preview}");
    }
}

impl Default for InteractiveDecisions {
    fn default() -> Self {
        Self::new()
    }
}

/// Answers every diverged file the same way.
pub struct FixedDecision(pub Decision);

impl DecisionProvider for FixedDecision {
    fn decide(&mut self, _name: &str) -> Result<Decision> {
        Ok(self.0)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
