//! Supported AI coding tools and where their rules live
//!
//! The table here is a fixed contract: identifiers, target paths, extensions
//! and limits must not drift, since projects already deployed rely on them.

use crate::error::{Error, Result};

/// Extension whose copies receive the MDC front-matter block
pub const MDC_EXTENSION: &str = ".mdc";

/// Deployment capabilities of one tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolCapability {
    /// Stable identifier used on the command line
    pub id: &'static str,
    pub display_name: &'static str,
    /// Directory for multi-file tools, file for single-file tools; project-relative
    pub target_path: &'static str,
    pub supports_multi_file: bool,
    pub supports_link: bool,
    /// Maximum merged size in characters
    pub char_limit: Option<usize>,
    /// Extension rules are written with
    pub file_extension: &'static str,
    /// Directory under the rules root holding per-tool settings files
    pub settings_dir: Option<&'static str>,
    /// Project-relative directory the settings files are copied into
    pub settings_target: Option<&'static str>,
}

impl ToolCapability {
    const fn multi_file(id: &'static str, display_name: &'static str, target_path: &'static str) -> Self {
        Self {
            id,
            display_name,
            target_path,
            supports_multi_file: true,
            supports_link: true,
            char_limit: None,
            file_extension: ".md",
            settings_dir: None,
            settings_target: None,
        }
    }

    const fn single_file(
        id: &'static str,
        display_name: &'static str,
        target_path: &'static str,
        file_extension: &'static str,
    ) -> Self {
        Self {
            id,
            display_name,
            target_path,
            supports_multi_file: false,
            supports_link: false,
            char_limit: None,
            file_extension,
            settings_dir: None,
            settings_target: None,
        }
    }

    pub fn uses_mdc(&self) -> bool {
        self.file_extension == MDC_EXTENSION
    }
}

static TOOLS: [ToolCapability; 9] = [
    ToolCapability {
        settings_dir: Some("claude"),
        settings_target: Some(".claude"),
        ..ToolCapability::multi_file("claude-code", "Claude Code", ".claude/rules")
    },
    ToolCapability {
        // Cursor needs the .mdc format with front-matter, so copies only
        supports_link: false,
        file_extension: MDC_EXTENSION,
        ..ToolCapability::multi_file("cursor", "Cursor", ".cursor/rules")
    },
    ToolCapability::multi_file("cline", "Cline", ".clinerules"),
    ToolCapability::multi_file("roo-code", "Roo Code", ".roo/rules"),
    ToolCapability::multi_file("kilo-code", "Kilo Code", ".kilocode/rules"),
    ToolCapability {
        char_limit: Some(6000),
        ..ToolCapability::multi_file("windsurf", "Windsurf", ".windsurf/rules")
    },
    ToolCapability::single_file("opencode", "OpenCode", "AGENTS.md", ".md"),
    ToolCapability::multi_file("trae", "TRAE", ".trae/rules"),
    ToolCapability::single_file("goose", "Goose", "goosehints", ""),
];

/// Every supported tool, in registry order.
pub fn all() -> &'static [ToolCapability] {
    &TOOLS
}

/// Supported identifiers, in registry order.
pub fn ids() -> Vec<String> {
    TOOLS.iter().map(|t| t.id.to_string()).collect()
}

/// Normalize a user-provided tool identifier to its canonical ID.
pub fn canonical_id(id: &str) -> Option<&'static str> {
    let id = id.trim();
    if let Some(tool) = TOOLS.iter().find(|t| t.id.eq_ignore_ascii_case(id)) {
        return Some(tool.id);
    }

    let folded = id.to_ascii_lowercase().replace('_', "-");
    match folded.as_str() {
        "claude" | "claudecode" => Some("claude-code"),
        "roo" | "roocode" => Some("roo-code"),
        "kilo" | "kilocode" => Some("kilo-code"),
        "open-code" => Some("opencode"),
        _ => TOOLS.iter().find(|t| t.id == folded).map(|t| t.id),
    }
}

/// Look a tool up by identifier or alias.
pub fn lookup(id: &str) -> Option<&'static ToolCapability> {
    let canonical = canonical_id(id)?;
    TOOLS.iter().find(|t| t.id == canonical)
}

/// Parse a comma-separated tool list, dropping duplicates and keeping order.
pub fn parse_tool_list(list: &str) -> Result<Vec<&'static ToolCapability>> {
    resolve_tools(list.split(','))
}

/// Resolve several identifiers, dropping blanks and duplicates.
pub fn resolve_tools<'a, I>(ids: I) -> Result<Vec<&'static ToolCapability>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tools: Vec<&'static ToolCapability> = Vec::new();
    for raw in ids {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let tool = lookup(raw).ok_or_else(|| Error::UnknownTool {
            id: raw.to_string(),
            supported: self::ids(),
        })?;
        if !tools.iter().any(|t| t.id == tool.id) {
            tools.push(tool);
        }
    }
    Ok(tools)
}
