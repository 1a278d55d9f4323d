//! Gitignore management
//!
//! Copies the patterns from the rules root's `gitignore` template into a
//! managed section of the project's `.gitignore`.

use colored::Colorize;
use std::path::Path;

use crate::error::Result;
use crate::fs;

/// Template file name inside the rules root
pub const TEMPLATE_FILE_NAME: &str = "gitignore";

/// Patterns listed in the rules root template, or `None` when there is no template.
pub fn read_template(rules_root: &Path) -> Result<Option<Vec<String>>> {
    let path = rules_root.join(TEMPLATE_FILE_NAME);
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    Ok(Some(template_entries(&content)))
}

/// Pattern lines of a template; comments and blank lines are dropped.
pub fn template_entries(content: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !entries.iter().any(|e| e == line) {
            entries.push(line.to_string());
        }
    }
    entries
}

/// Update .gitignore with managed entries. Returns whether the file changed.
pub fn update_gitignore(project_root: &Path, marker: &str, entries: &[String]) -> Result<bool> {
    let gitignore_path = project_root.join(".gitignore");
    let start_marker = format!("# START {}", marker);
    let end_marker = format!("# END {}", marker);

    // Read existing content or start fresh
    let existing_content = if gitignore_path.exists() {
        fs::read_to_string(&gitignore_path)?
    } else {
        String::new()
    };

    let content_without_managed =
        remove_managed_section(&existing_content, &start_marker, &end_marker);

    let mut managed_section = String::new();
    managed_section.push_str(&start_marker);
    managed_section.push('\n');
    for entry in entries {
        managed_section.push_str(entry);
        managed_section.push('\n');
    }
    managed_section.push_str(&end_marker);
    managed_section.push('\n');

    let kept = content_without_managed.trim_end();
    let new_content = if kept.is_empty() {
        managed_section
    } else {
        format!("{}\n\n{}", kept, managed_section)
    };

    if new_content == existing_content {
        println!("  {} .gitignore already up to date", "✔".green());
        return Ok(false);
    }

    fs::write_file(&gitignore_path, &new_content)?;
    println!(
        "  {} Updated .gitignore with {} managed entries",
        "✔".green(),
        entries.len()
    );
    Ok(true)
}

/// Remove the managed section from gitignore content
fn remove_managed_section(content: &str, start_marker: &str, end_marker: &str) -> String {
    let mut result = String::new();
    let mut in_managed_section = false;

    for line in content.lines() {
        if line.trim() == start_marker {
            in_managed_section = true;
            continue;
        }
        if line.trim() == end_marker {
            in_managed_section = false;
            continue;
        }
        if !in_managed_section {
            result.push_str(line);
            result.push('\n');
        }
    }

    result
}
