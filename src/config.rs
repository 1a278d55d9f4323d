//! Rules root location and optional defaults
//!
//! The rules root defaults to `~/.rules-manager`. It may hold a `config.toml`
//! with defaults for the `init` command; flags always take precedence.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::deployer::DeployMode;
use crate::error::{Error, Result};
use crate::fs;

/// Directory name of the default rules root under the home directory
pub const RULES_DIR_NAME: &str = ".rules-manager";

/// Environment variable overriding the rules root
pub const RULES_DIR_ENV: &str = "RULESMGR_HOME";

/// Optional configuration file inside the rules root
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Root configuration structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Tools used when `--tools` is not given
    #[serde(default)]
    pub default_tools: Vec<String>,

    /// Languages used when `--lang` is not given
    #[serde(default)]
    pub default_languages: Vec<String>,

    /// Deployment mode used when `--copy` is not given
    #[serde(default)]
    pub mode: Option<DeployMode>,

    /// Gitignore management settings
    #[serde(default)]
    pub gitignore: GitignoreConfig,
}

/// Gitignore management configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitignoreConfig {
    /// Whether `init` updates the project's .gitignore
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Marker text for the managed section
    #[serde(default = "default_marker")]
    pub marker: String,
}

fn default_true() -> bool {
    true
}

fn default_marker() -> String {
    "rulesmgr".to_string()
}

impl Default for GitignoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            marker: default_marker(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the rules root; a missing file means defaults.
    pub fn load(rules_root: &Path) -> Result<Self> {
        let path = rules_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|source| Error::Config { path, source })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// The rules root: explicit path first, then `~/.rules-manager`.
///
/// The environment override is applied by the CLI layer through clap.
pub fn rules_root(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(RULES_DIR_NAME),
    }
}

/// Fail unless the rules root exists; gates `init` and `sync`.
pub fn require_rules_root(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::RulesRootMissing {
            path: path.to_path_buf(),
        })
    }
}
