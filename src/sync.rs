//! Reconciliation of copied rule files with their source
//!
//! Linked files always show live source content, so only regular files are
//! candidates. Each candidate is matched back to a source document, compared,
//! and, when it diverged, resolved through a [`DecisionProvider`].

use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::deployer::transform_content;
use crate::error::Result;
use crate::fs;
use crate::rules::{RULE_EXTENSION, RulesRepository, strip_extension};
use crate::tools::{self, ToolCapability};

/// Characters of each side shown in a diff preview
pub const PREVIEW_LIMIT: usize = 500;

/// Answer to "this file has local modifications, what now?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Overwrite,
    Skip,
    Diff,
}

/// Terminal state of one file after a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    UpToDate,
    Updated,
    Skipped,
    /// Merged single-file output; cannot be reconciled per rule
    Manual,
    /// No source document matches; left alone
    Unresolved,
}

/// Supplies decisions for diverged files.
pub trait DecisionProvider {
    fn decide(&mut self, name: &str) -> Result<Decision>;

    /// Asked once more after a preview was shown. Anything but `Skip` overwrites.
    fn decide_after_diff(&mut self, name: &str) -> Result<Decision> {
        self.decide(name)
    }

    fn show_diff(&mut self, preview: &DiffPreview) {
        println!("{preview}");
    }
}

impl<F> DecisionProvider for F
where
    F: FnMut(&str) -> Result<Decision>,
{
    fn decide(&mut self, name: &str) -> Result<Decision> {
        self(name)
    }
}

/// A copied file paired with the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub local_path: PathBuf,
    pub source_path: PathBuf,
    /// Project-relative name shown to the user
    pub name: String,
}

/// Single-file output found in the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualTarget {
    pub tool: &'static ToolCapability,
    pub path: PathBuf,
}

/// Everything found by scanning a project.
#[derive(Debug, Default)]
pub struct Discovery {
    pub targets: Vec<SyncTarget>,
    pub manual: Vec<ManualTarget>,
    pub unresolved: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEntry {
    pub name: String,
    pub state: SyncState,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub entries: Vec<SyncEntry>,
}

impl SyncReport {
    pub fn count(&self, state: SyncState) -> usize {
        self.entries.iter().filter(|e| e.state == state).count()
    }

    pub fn updated(&self) -> usize {
        self.count(SyncState::Updated)
    }

    pub fn skipped(&self) -> usize {
        self.count(SyncState::Skipped)
    }

    pub fn state_of(&self, name: &str) -> Option<SyncState> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.state)
    }
}

/// Bounded side-by-side view of a diverged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPreview {
    pub name: String,
    pub local: String,
    pub source: String,
}

impl DiffPreview {
    fn load(target: &SyncTarget) -> Self {
        let read = |path: &Path| {
            fs::read_to_string(path)
                .map(|content| truncate_preview(&content))
                .unwrap_or_else(|e| format!("<unreadable: {e}>"))
        };
        Self {
            name: target.name.clone(),
            local: read(&target.local_path),
            source: read(&target.source_path),
        }
    }
}

impl fmt::Display for DiffPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n--- Local (current) ---")?;
        writeln!(f, "{}", self.local)?;
        writeln!(f, "\n--- Source (new) ---")?;
        writeln!(f, "{}", self.source)
    }
}

/// First [`PREVIEW_LIMIT`] characters, marked when cut.
pub fn truncate_preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_LIMIT) {
        Some((idx, _)) => format!("{}\n...(truncated)", &content[..idx]),
        None => content.to_string(),
    }
}

/// Scans one project against one rules root.
pub struct Reconciler {
    project_root: PathBuf,
    rules: RulesRepository,
}

impl Reconciler {
    pub fn new(project_root: impl Into<PathBuf>, rules: RulesRepository) -> Self {
        Self {
            project_root: project_root.into(),
            rules,
        }
    }

    /// Find copied rule files in every known tool location.
    pub fn discover(&self) -> Result<Discovery> {
        let mut discovery = Discovery::default();

        for tool in tools::all() {
            let tool_path = self.project_root.join(tool.target_path);
            if std::fs::symlink_metadata(&tool_path).is_err() {
                continue;
            }

            if !tool.supports_multi_file {
                if !fs::is_symlink(&tool_path) {
                    discovery.manual.push(ManualTarget {
                        tool,
                        path: tool_path,
                    });
                }
                continue;
            }

            if !tool_path.is_dir() {
                continue;
            }

            for entry in WalkDir::new(&tool_path).min_depth(1).max_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|e| fs::walk_error(&tool_path, e))?;
                // Links follow their source by construction
                if !entry.file_type().is_file() {
                    continue;
                }

                let file_name = entry.file_name().to_string_lossy().into_owned();
                match self.resolve_source(tool, &file_name) {
                    Some(source_path) => discovery.targets.push(SyncTarget {
                        local_path: entry.path().to_path_buf(),
                        source_path,
                        name: format!("{}/{}", tool.target_path, file_name),
                    }),
                    None => {
                        tracing::debug!(path = %entry.path().display(), "No source for local file");
                        discovery.unresolved.push(entry.into_path());
                    }
                }
            }
        }

        Ok(discovery)
    }

    /// Map a deployed file name back to its source document.
    pub fn resolve_source(&self, tool: &ToolCapability, file_name: &str) -> Option<PathBuf> {
        let ext = tool.file_extension;
        let canonical = match file_name.strip_suffix(ext) {
            Some(stem) if !ext.is_empty() => format!("{stem}{RULE_EXTENSION}"),
            _ => file_name.to_string(),
        };
        if !canonical.ends_with(RULE_EXTENSION) {
            return None;
        }
        self.rules.find_source(&canonical)
    }

    /// Discover and reconcile in one pass.
    pub fn run(&self, provider: &mut dyn DecisionProvider) -> Result<SyncReport> {
        let discovery = self.discover()?;
        self.reconcile(&discovery, provider)
    }

    pub fn reconcile(
        &self,
        discovery: &Discovery,
        provider: &mut dyn DecisionProvider,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for manual in &discovery.manual {
            println!(
                "Found: {} (merged file - manual sync required)",
                manual.tool.target_path
            );
            report.entries.push(SyncEntry {
                name: manual.tool.target_path.to_string(),
                state: SyncState::Manual,
            });
        }

        for path in &discovery.unresolved {
            report.entries.push(SyncEntry {
                name: self.display_path(path),
                state: SyncState::Unresolved,
            });
        }

        if !discovery.targets.is_empty() {
            println!("Found {} copied file(s)\n", discovery.targets.len());
        }

        for target in &discovery.targets {
            let state = self.reconcile_target(target, provider)?;
            report.entries.push(SyncEntry {
                name: target.name.clone(),
                state,
            });
        }

        Ok(report)
    }

    /// Compare one file with its source and apply the provider's decision.
    pub fn reconcile_target(
        &self,
        target: &SyncTarget,
        provider: &mut dyn DecisionProvider,
    ) -> Result<SyncState> {
        if !differs(target) {
            println!("  {} {} (already up to date)", "✔".green(), target.name);
            return Ok(SyncState::UpToDate);
        }

        let mut decision = provider.decide(&target.name)?;
        if decision == Decision::Diff {
            provider.show_diff(&DiffPreview::load(target));
            decision = match provider.decide_after_diff(&target.name)? {
                Decision::Skip => Decision::Skip,
                _ => Decision::Overwrite,
            };
        }
        tracing::debug!(file = %target.name, ?decision, "Resolved diverged file");

        if decision == Decision::Skip {
            println!("  {} Skipped {}", "⊘".yellow(), target.name);
            return Ok(SyncState::Skipped);
        }

        let expected = expected_content(target)?;
        fs::write_regular_file(&target.local_path, &expected)?;
        println!("  {} Updated {}", "✔".green(), target.name);
        Ok(SyncState::Updated)
    }

    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.project_root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Source content as the deployer would have written it to this file.
fn expected_content(target: &SyncTarget) -> Result<String> {
    let source = fs::read_to_string(&target.source_path)?;
    let file_name = target
        .local_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = &file_name[strip_extension(&file_name).len()..];
    Ok(transform_content(&source, extension).into_owned())
}

/// Unreadable files count as different so the user has to decide.
fn differs(target: &SyncTarget) -> bool {
    match (fs::read_to_string(&target.local_path), expected_content(target)) {
        (Ok(local), Ok(expected)) => local != expected,
        _ => true,
    }
}
