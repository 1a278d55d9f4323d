//! Rule documents stored in the rules root
//!
//! The rules root is a flat directory of `NN-name.md` documents plus a
//! `languages/` subdirectory of `<language>-coding-style.md` documents.
//! Everything is read fresh from disk on each call.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::Result;
use crate::fs::{self, FileEntry};

/// Subdirectory holding language style documents
pub const LANGUAGES_DIR: &str = "languages";

/// Extension every rule document is stored with
pub const RULE_EXTENSION: &str = ".md";

/// Priority for documents without a numeric prefix; sorts them last
pub const FALLBACK_PRIORITY: f64 = 99.0;

/// Language styles slot in between `02-coding-principles` and `03-architecture`
pub const LANGUAGE_PRIORITY: f64 = 2.5;

const LANGUAGE_SUFFIX: &str = "-coding-style.md";

static PRIORITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-").expect("priority pattern is valid"));

/// A single rule document read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDocument {
    /// Source filename, e.g. `01-tech-stack.md`
    pub name: String,
    pub path: PathBuf,
    pub content: String,
    pub priority: f64,
}

impl RuleDocument {
    /// The name with its extension removed, used for headings and target names.
    pub fn stem(&self) -> &str {
        strip_extension(&self.name)
    }
}

/// Read-only view over a rules root directory.
#[derive(Debug, Clone)]
pub struct RulesRepository {
    root: PathBuf,
}

impl RulesRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn languages_dir(&self) -> PathBuf {
        self.root.join(LANGUAGES_DIR)
    }

    /// All base rule documents directly under the root, in filename order.
    pub fn list_base_rules(&self) -> Result<Vec<RuleDocument>> {
        fs::list_files(&self.root, Some(RULE_EXTENSION))?
            .into_iter()
            .map(|entry| {
                let priority = priority_from_name(&entry.name);
                read_document(entry, priority)
            })
            .collect()
    }

    /// Language identifiers that have a `<language>-coding-style.md` document.
    pub fn list_languages(&self) -> Result<Vec<String>> {
        let languages = fs::list_files(&self.languages_dir(), Some(RULE_EXTENSION))?
            .into_iter()
            .filter_map(|entry| {
                entry
                    .name
                    .strip_suffix(LANGUAGE_SUFFIX)
                    .filter(|lang| !lang.is_empty())
                    .map(str::to_string)
            })
            .collect();
        Ok(languages)
    }

    /// The style document for `language`, or `None` when it does not exist.
    pub fn language_rule(&self, language: &str) -> Result<Option<RuleDocument>> {
        let name = format!("{language}{LANGUAGE_SUFFIX}");
        let path = self.languages_dir().join(&name);
        if !path.is_file() {
            return Ok(None);
        }
        read_document(FileEntry { name, path }, LANGUAGE_PRIORITY).map(Some)
    }

    /// Find a base rule by exact filename, or by filename without `.md`.
    pub fn rule_by_name(&self, name: &str) -> Result<Option<RuleDocument>> {
        let with_ext = format!("{name}{RULE_EXTENSION}");
        Ok(self
            .list_base_rules()?
            .into_iter()
            .find(|rule| rule.name == name || rule.name == with_ext))
    }

    /// Resolve the source document behind a deployed file name.
    ///
    /// `name` uses canonical extension; the root is searched before the
    /// languages directory.
    pub fn find_source(&self, name: &str) -> Option<PathBuf> {
        [self.root.join(name), self.languages_dir().join(name)]
            .into_iter()
            .find(|path| path.is_file())
    }
}

/// Numeric prefix of `NN-name.md`, or [`FALLBACK_PRIORITY`].
pub fn priority_from_name(name: &str) -> f64 {
    PRIORITY_RE
        .captures(name)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(f64::from)
        .unwrap_or(FALLBACK_PRIORITY)
}

/// Remove a trailing `.ext` made of word characters, if there is one.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx)
            if idx + 1 < name.len()
                && name[idx + 1..]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            &name[..idx]
        }
        _ => name,
    }
}

fn read_document(entry: FileEntry, priority: f64) -> Result<RuleDocument> {
    let content = fs::read_to_string(&entry.path)?;
    Ok(RuleDocument {
        name: entry.name,
        path: entry.path,
        content,
        priority,
    })
}
