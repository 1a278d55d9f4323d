//! Template generation for the setup command
//!
//! Seeds a rules root with starter rule documents, language styles, the
//! gitignore template and per-tool settings.

use colored::Colorize;
use std::path::Path;

use crate::error::Result;
use crate::fs;
use crate::rules::LANGUAGES_DIR;

/// A file written by `setup`, relative to the rules root.
pub struct Template {
    pub path: &'static str,
    pub content: &'static str,
}

macro_rules! template {
    ($path:literal) => {
        Template {
            path: $path,
            content: include_str!(concat!("../templates/", $path)),
        }
    };
}

pub const TEMPLATES: &[Template] = &[
    template!("01-tech-stack.md"),
    template!("02-coding-principles.md"),
    template!("03-architecture.md"),
    template!("04-testing.md"),
    template!("05-git-commit.md"),
    template!("06-code-review.md"),
    template!("languages/typescript-coding-style.md"),
    template!("languages/python-coding-style.md"),
    template!("languages/go-coding-style.md"),
    template!("languages/rust-coding-style.md"),
    template!("gitignore"),
    template!("claude/settings.local.json"),
];

#[derive(Debug, Default)]
pub struct SetupResult {
    pub created: usize,
    pub skipped: usize,
}

/// Initialize a rules root at `rules_root`, keeping existing files unless `force`.
pub fn setup(rules_root: &Path, force: bool) -> Result<SetupResult> {
    let mut result = SetupResult::default();

    for dir in [rules_root.to_path_buf(), rules_root.join(LANGUAGES_DIR)] {
        if !dir.exists() {
            fs::ensure_dir(&dir)?;
            println!("  {} Created directory: {}", "✔".green(), dir.display());
        }
    }

    for template in TEMPLATES {
        let dest = rules_root.join(template.path);
        if dest.exists() && !force {
            println!(
                "  {} Skipped {} (already exists)",
                "!".yellow(),
                template.path
            );
            result.skipped += 1;
            continue;
        }
        fs::write_file(&dest, template.content)?;
        println!("  {} Created {}", "✔".green(), template.path);
        result.created += 1;
    }

    Ok(result)
}
