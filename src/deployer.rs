//! Materializes rule documents into a project for one tool
//!
//! Multi-file tools get one file per rule (linked or copied); single-file tools
//! get the merged document, checked against the tool's character limit first.

use colored::Colorize;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::{self, CopyStats};
use crate::merge;
use crate::rules::{RuleDocument, strip_extension};
use crate::tools::{MDC_EXTENSION, ToolCapability};

/// Front-matter prepended to copies written in the MDC format
pub const MDC_FRONT_MATTER: &str = "---\nalwaysApply: true\n---\n";

/// How rule files reach the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployMode {
    /// Symbolic link back to the rules root
    #[default]
    Link,
    /// Independent copy, transformed for the tool
    Copy,
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployMode::Link => write!(f, "link"),
            DeployMode::Copy => write!(f, "copy"),
        }
    }
}

/// What happened to a single target file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Linked,
    Copied,
    /// Aggregate file holding this many rules
    Merged(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedFile {
    /// Project-relative display name
    pub name: String,
    pub path: PathBuf,
    pub action: FileAction,
}

/// Result of deploying to one tool
#[derive(Debug, Default)]
pub struct DeployReport {
    pub files: Vec<DeployedFile>,
}

/// Link copies back off when the tool cannot consume links.
pub fn effective_mode(tool: &ToolCapability, requested: DeployMode) -> DeployMode {
    if tool.supports_link {
        requested
    } else {
        DeployMode::Copy
    }
}

/// Swap the source extension for the one the tool expects.
pub fn target_file_name(source_name: &str, extension: &str) -> String {
    format!("{}{}", strip_extension(source_name), extension)
}

/// Content as written for a copy with the given target extension.
pub fn transform_content<'a>(content: &'a str, extension: &str) -> Cow<'a, str> {
    if extension == MDC_EXTENSION {
        Cow::Owned(format!("{MDC_FRONT_MATTER}{content}"))
    } else {
        Cow::Borrowed(content)
    }
}

/// Deploys rules into a single project directory
pub struct Deployer {
    project_root: PathBuf,
}

impl Deployer {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Deploy `docs` for `tool`, honouring the requested mode when the tool allows links.
    pub fn deploy(
        &self,
        docs: &[RuleDocument],
        tool: &ToolCapability,
        requested: DeployMode,
    ) -> Result<DeployReport> {
        let mode = effective_mode(tool, requested);
        if mode != requested {
            tracing::debug!(tool = tool.id, "Tool does not support links, copying instead");
        }

        if tool.supports_multi_file {
            return self.deploy_multi_file(docs, tool.target_path, mode, tool.file_extension);
        }

        if let Some(limit) = tool.char_limit {
            let size = merge::merged_size(docs);
            if size > limit {
                return Err(Error::SizeLimitExceeded {
                    tool: tool.display_name.to_string(),
                    size,
                    limit,
                });
            }
        }
        self.deploy_single_file(docs, tool.target_path)
    }

    /// One target file per document under `target_path`.
    pub fn deploy_multi_file(
        &self,
        docs: &[RuleDocument],
        target_path: &str,
        mode: DeployMode,
        extension: &str,
    ) -> Result<DeployReport> {
        let target_dir = self.project_root.join(target_path);
        fs::ensure_dir(&target_dir)?;

        let mut report = DeployReport::default();
        for doc in docs {
            let target_name = target_file_name(&doc.name, extension);
            let target_file = target_dir.join(&target_name);

            let action = match mode {
                DeployMode::Link => {
                    fs::link_file(&doc.path, &target_file)?;
                    println!("  {} Linked {}", "✔".green(), target_name);
                    FileAction::Linked
                }
                DeployMode::Copy => {
                    let content = transform_content(&doc.content, extension);
                    fs::write_regular_file(&target_file, &content)?;
                    println!("  {} Copied {}", "✔".green(), target_name);
                    FileAction::Copied
                }
            };
            tracing::debug!(source = %doc.path.display(), target = %target_file.display(), ?action, "Deployed rule");

            report.files.push(DeployedFile {
                name: format!("{target_path}/{target_name}"),
                path: target_file,
                action,
            });
        }
        Ok(report)
    }

    /// Merge all documents into the file at `target_path`.
    pub fn deploy_single_file(&self, docs: &[RuleDocument], target_path: &str) -> Result<DeployReport> {
        let target_file = self.project_root.join(target_path);
        let merged = merge::merge(docs);
        fs::write_regular_file(&target_file, &merged)?;
        println!(
            "  {} Created {} ({} rules merged)",
            "✔".green(),
            target_path,
            docs.len()
        );

        Ok(DeployReport {
            files: vec![DeployedFile {
                name: target_path.to_string(),
                path: target_file,
                action: FileAction::Merged(docs.len()),
            }],
        })
    }

    /// Copy the tool's settings directory from the rules root, if it has one.
    ///
    /// Files already present in the project are kept as they are.
    pub fn deploy_settings(&self, rules_root: &Path, tool: &ToolCapability) -> Result<Option<CopyStats>> {
        let (Some(settings_dir), Some(settings_target)) = (tool.settings_dir, tool.settings_target)
        else {
            return Ok(None);
        };

        let source = rules_root.join(settings_dir);
        if !source.is_dir() {
            return Ok(None);
        }

        let stats = fs::copy_dir_missing(&source, &self.project_root.join(settings_target))?;
        for path in &stats.copied {
            println!("  {} Copied settings {}", "✔".green(), self.display_path(path));
        }
        for path in &stats.kept {
            println!(
                "  {} Kept settings {} (already exists)",
                "○".yellow(),
                self.display_path(path)
            );
        }
        Ok(Some(stats))
    }

    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.project_root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
