//! Error types for rulesmgr

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Rules directory does not exist: {}\nRun \"rulesmgr setup\" first.", .path.display())]
    RulesRootMissing { path: PathBuf },

    #[error("Unknown tool: {id} (supported: {})", .supported.join(", "))]
    UnknownTool { id: String, supported: Vec<String> },

    #[error("Unknown language: {language} (available: {})", display_list(.available))]
    UnknownLanguage {
        language: String,
        available: Vec<String>,
    },

    #[error("Unknown rule: {name}")]
    UnknownRule { name: String },

    #[error(
        "Merged rules exceed {tool} limit.\n  Total: {size} characters\n  Limit: {limit} characters\n  Over: {} characters\n\nPlease reduce rules content or remove some rules/languages.",
        .size - .limit
    )]
    SizeLimitExceeded {
        tool: String,
        size: usize,
        limit: usize,
    },

    #[error("Refusing to replace directory {} with a rule file", .path.display())]
    TargetIsDirectory { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0} requires an interactive terminal; pass it on the command line instead")]
    NotInteractive(&'static str),
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

fn display_list(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
