//! End-to-End CLI Tests for rulesmgr
//!
//! These tests run the binary against a temporary rules directory and a
//! temporary project, then check outputs and file system changes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

struct Env {
    _temp: TempDir,
    rules: PathBuf,
    project: PathBuf,
}

impl Env {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let rules = temp.path().join("rules");
        let project = temp.path().join("project");
        fs::create_dir_all(&project).unwrap();
        Self {
            _temp: temp,
            rules,
            project,
        }
    }

    /// Env with the bundled templates installed.
    fn with_setup() -> Self {
        let env = Self::new();
        env.cmd().arg("setup").assert().success();
        env
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("rulesmgr").unwrap();
        cmd.env("RULESMGR_HOME", &self.rules).env_remove("RUST_LOG");
        cmd
    }

    fn init(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("init").arg("--path").arg(&self.project);
        cmd
    }

    fn sync(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("sync").arg("--path").arg(&self.project);
        cmd
    }

    fn project_file(&self, rel: &str) -> PathBuf {
        self.project.join(rel)
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

// =============================================================================
// SETUP COMMAND TESTS
// =============================================================================

#[test]
fn test_cli_setup_creates_rules_directory() {
    let env = Env::new();

    env.cmd()
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Setup complete"));

    assert!(env.rules.join("01-tech-stack.md").is_file());
    assert!(env.rules.join("languages/rust-coding-style.md").is_file());
    assert!(env.rules.join("gitignore").is_file());
    assert!(env.rules.join("claude/settings.local.json").is_file());
}

#[test]
fn test_cli_setup_keeps_existing_files() {
    let env = Env::with_setup();
    fs::write(env.rules.join("01-tech-stack.md"), "# Mine").unwrap();

    env.cmd()
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(env.rules.join("01-tech-stack.md")).unwrap(),
        "# Mine"
    );
}

#[test]
fn test_cli_setup_force_overwrites() {
    let env = Env::with_setup();
    fs::write(env.rules.join("01-tech-stack.md"), "# Mine").unwrap();

    env.cmd().arg("setup").arg("--force").assert().success();

    assert_ne!(
        fs::read_to_string(env.rules.join("01-tech-stack.md")).unwrap(),
        "# Mine"
    );
}

#[test]
fn test_cli_rules_dir_flag_overrides_env() {
    let env = Env::new();
    let other = env.project.join("other-rules");

    env.cmd()
        .arg("--rules-dir")
        .arg(&other)
        .arg("setup")
        .assert()
        .success();

    assert!(other.join("01-tech-stack.md").is_file());
    assert!(!env.rules.exists());
}

// =============================================================================
// INIT COMMAND TESTS
// =============================================================================

#[test]
fn test_cli_init_without_rules_root_fails() {
    let env = Env::new();

    env.init()
        .arg("--tools")
        .arg("claude-code")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rulesmgr setup"));

    assert!(!env.project_file(".claude").exists());
}

#[test]
fn test_cli_init_unknown_tool_fails() {
    let env = Env::with_setup();

    env.init()
        .arg("--tools")
        .arg("claude-code,notepad")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tool: notepad"));

    assert!(!env.project_file(".claude").exists());
}

#[test]
fn test_cli_init_unknown_language_fails() {
    let env = Env::with_setup();

    env.init()
        .arg("--tools")
        .arg("cline")
        .arg("--lang")
        .arg("cobol")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown language: cobol"))
        .stderr(predicate::str::contains("rust"));
}

#[test]
fn test_cli_init_copies_cursor_rules_as_mdc() {
    let env = Env::with_setup();

    env.init()
        .arg("--tools")
        .arg("cursor")
        .arg("--lang")
        .arg("rust")
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied 01-tech-stack.mdc"))
        .stdout(predicate::str::contains("Rules deployed"))
        .stdout(predicate::str::contains("Files written"));

    let rule = env.project_file(".cursor/rules/01-tech-stack.mdc");
    assert!(rule.is_file());
    assert!(!is_symlink(&rule));
    assert!(
        fs::read_to_string(&rule)
            .unwrap()
            .starts_with("---\nalwaysApply: true\n---\n")
    );
    assert!(env.project_file(".cursor/rules/rust-coding-style.mdc").is_file());
}

#[cfg(unix)]
#[test]
fn test_cli_init_links_claude_rules() {
    let env = Env::with_setup();

    env.init()
        .arg("--tools")
        .arg("claude")
        .assert()
        .success()
        .stdout(predicate::str::contains("Linked 01-tech-stack.md"));

    let rule = env.project_file(".claude/rules/01-tech-stack.md");
    assert!(is_symlink(&rule));
    assert_eq!(
        fs::read_to_string(&rule).unwrap(),
        fs::read_to_string(env.rules.join("01-tech-stack.md")).unwrap()
    );
    assert!(env.project_file(".claude/settings.local.json").is_file());
}

#[cfg(unix)]
#[test]
fn test_cli_init_relinks_over_existing_copy() {
    let env = Env::with_setup();
    env.init().args(["--tools", "cline", "--copy"]).assert().success();
    let rule = env.project_file(".clinerules/01-tech-stack.md");
    assert!(!is_symlink(&rule));

    env.init().args(["--tools", "cline"]).assert().success();

    assert!(is_symlink(&rule));
    assert!(!env.project_file(".clinerules/01-tech-stack.md.rulesmgr-old").exists());
}

#[cfg(unix)]
#[test]
fn test_cli_init_copy_over_links_writes_files() {
    let env = Env::with_setup();
    env.init().args(["--tools", "cline"]).assert().success();
    let rule = env.project_file(".clinerules/01-tech-stack.md");
    assert!(is_symlink(&rule));

    env.init().args(["--tools", "cline", "--copy"]).assert().success();

    assert!(!is_symlink(&rule));
    fs::write(&rule, "# Edited locally").unwrap();
    env.sync()
        .args(["--strategy", "skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped .clinerules/01-tech-stack.md"));
    assert_ne!(
        fs::read_to_string(env.rules.join("01-tech-stack.md")).unwrap(),
        "# Edited locally"
    );
}

#[test]
fn test_cli_init_keeps_directory_in_place_of_rule() {
    let env = Env::with_setup();
    let blocked = env.project_file(".clinerules/01-tech-stack.md");
    fs::create_dir_all(blocked.join("notes")).unwrap();
    fs::write(blocked.join("notes/keep.txt"), "mine").unwrap();

    env.init()
        .args(["--tools", "cline,roo-code"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to replace directory"))
        .stderr(predicate::str::contains("1 of 2 tool(s) failed"));

    assert_eq!(fs::read_to_string(blocked.join("notes/keep.txt")).unwrap(), "mine");
    assert!(env.project_file(".roo/rules/01-tech-stack.md").exists());
}

#[test]
fn test_cli_init_copy_mode() {
    let env = Env::with_setup();

    env.init()
        .args(["--tools", "roo-code", "--copy"])
        .assert()
        .success();

    let rule = env.project_file(".roo/rules/02-coding-principles.md");
    assert!(rule.is_file());
    assert!(!is_symlink(&rule));
}

#[test]
fn test_cli_init_selected_rules_only() {
    let env = Env::with_setup();

    env.init()
        .args(["--tools", "trae", "--copy", "--rules", "03-architecture"])
        .assert()
        .success();

    let entries: Vec<_> = fs::read_dir(env.project_file(".trae/rules"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["03-architecture.md"]);
}

#[test]
fn test_cli_init_unknown_rule_fails() {
    let env = Env::with_setup();

    env.init()
        .args(["--tools", "trae", "--rules", "99-missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown rule: 99-missing"));
}

#[test]
fn test_cli_init_merges_single_file_tool() {
    let env = Env::with_setup();

    env.init()
        .args(["--tools", "opencode", "--lang", "go"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rules merged"));

    let merged = fs::read_to_string(env.project_file("AGENTS.md")).unwrap();
    assert!(merged.starts_with("# 01-tech-stack\n\n"));
    assert!(merged.contains("\n\n---\n\n# 02-coding-principles\n\n"));
    // Language rules sort between priority 2 and 3
    let lang = merged.find("# go-coding-style").unwrap();
    assert!(merged.find("# 02-coding-principles").unwrap() < lang);
    assert!(lang < merged.find("# 03-architecture").unwrap());
}

#[test]
fn test_cli_init_repeated_language_merged_once() {
    let env = Env::with_setup();

    env.init()
        .args(["--tools", "opencode", "--lang", "rust,rust"])
        .assert()
        .success();

    let merged = fs::read_to_string(env.project_file("AGENTS.md")).unwrap();
    assert_eq!(merged.matches("# rust-coding-style\n").count(), 1);
}

#[test]
fn test_cli_init_large_merge_without_limit() {
    let env = Env::with_setup();
    fs::write(env.rules.join("07-huge.md"), "x".repeat(200_000)).unwrap();

    env.init().args(["--tools", "goose"]).assert().success();
    let merged = fs::read_to_string(env.project_file("goosehints")).unwrap();
    assert!(merged.ends_with(&"x".repeat(200_000)));
}

#[test]
fn test_cli_init_updates_gitignore() {
    let env = Env::with_setup();
    fs::write(env.project_file(".gitignore"), "target/\n").unwrap();

    env.init().args(["--tools", "cline"]).assert().success();

    let content = fs::read_to_string(env.project_file(".gitignore")).unwrap();
    assert!(content.starts_with("target/\n\n# START rulesmgr\n"));
    assert!(content.contains(".clinerules/\n"));
    assert!(content.contains("# END rulesmgr"));
}

#[test]
fn test_cli_init_no_gitignore() {
    let env = Env::with_setup();

    env.init()
        .args(["--tools", "cline", "--no-gitignore"])
        .assert()
        .success();

    assert!(!env.project_file(".gitignore").exists());
}

#[test]
fn test_cli_init_gitignore_only() {
    let env = Env::with_setup();

    env.init()
        .arg("--gitignore")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updating .gitignore"));

    assert!(env.project_file(".gitignore").is_file());
    assert!(!env.project_file(".claude").exists());
    assert!(!env.project_file(".cursor").exists());
}

#[test]
fn test_cli_init_gitignore_conflicts_with_tools() {
    let env = Env::with_setup();

    env.init()
        .args(["--gitignore", "--tools", "cline"])
        .assert()
        .failure();
}

#[test]
fn test_cli_init_uses_config_defaults() {
    let env = Env::with_setup();
    fs::write(
        env.rules.join("config.toml"),
        r#"
            default_tools = ["kilo-code"]
            default_languages = ["python"]
            mode = "copy"

            [gitignore]
            marker = "team rules"
        "#,
    )
    .unwrap();

    env.init().assert().success();

    let lang = env.project_file(".kilocode/rules/python-coding-style.md");
    assert!(lang.is_file());
    assert!(!is_symlink(&lang));
    let content = fs::read_to_string(env.project_file(".gitignore")).unwrap();
    assert!(content.contains("# START team rules"));
}

#[test]
fn test_cli_init_invalid_config_fails() {
    let env = Env::with_setup();
    fs::write(env.rules.join("config.toml"), "default_tools = 3\n").unwrap();

    env.init()
        .args(["--tools", "cline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn test_cli_init_without_tools_needs_terminal() {
    let env = Env::with_setup();

    env.init()
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}

// =============================================================================
// SYNC COMMAND TESTS
// =============================================================================

#[test]
fn test_cli_sync_nothing_to_do() {
    let env = Env::with_setup();

    env.sync()
        .assert()
        .success()
        .stdout(predicate::str::contains("No copied rules found to sync."));
}

#[test]
fn test_cli_sync_reports_up_to_date_copies() {
    let env = Env::with_setup();
    env.init().args(["--tools", "cursor", "--lang", "rust"]).assert().success();

    env.sync()
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"))
        .stdout(predicate::str::contains("Sync complete:"));
}

#[test]
fn test_cli_sync_skip_strategy_keeps_local_edits() {
    let env = Env::with_setup();
    env.init().args(["--tools", "cline", "--copy"]).assert().success();
    let rule = env.project_file(".clinerules/01-tech-stack.md");
    fs::write(&rule, "# Edited locally").unwrap();

    env.sync()
        .args(["--strategy", "skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped .clinerules/01-tech-stack.md"));

    assert_eq!(fs::read_to_string(&rule).unwrap(), "# Edited locally");
}

#[test]
fn test_cli_sync_overwrite_strategy_restores_source() {
    let env = Env::with_setup();
    env.init().args(["--tools", "cursor"]).assert().success();
    let rule = env.project_file(".cursor/rules/01-tech-stack.mdc");
    fs::write(&rule, "# Edited locally").unwrap();

    env.sync()
        .args(["--strategy", "overwrite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated .cursor/rules/01-tech-stack.mdc"));

    let source = fs::read_to_string(env.rules.join("01-tech-stack.md")).unwrap();
    assert_eq!(
        fs::read_to_string(&rule).unwrap(),
        format!("---\nalwaysApply: true\n---\n{source}")
    );
}

#[test]
fn test_cli_sync_prompt_without_terminal_fails_on_diverged_file() {
    let env = Env::with_setup();
    env.init().args(["--tools", "cline", "--copy"]).assert().success();
    fs::write(env.project_file(".clinerules/02-coding-principles.md"), "edited").unwrap();

    env.sync()
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}

#[test]
fn test_cli_sync_flags_merged_files_for_manual_sync() {
    let env = Env::with_setup();
    env.init().args(["--tools", "opencode"]).assert().success();

    env.sync()
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Found: AGENTS.md (merged file - manual sync required)",
        ));
}

#[cfg(unix)]
#[test]
fn test_cli_sync_ignores_links() {
    let env = Env::with_setup();
    env.init().args(["--tools", "claude-code"]).assert().success();

    env.sync()
        .assert()
        .success()
        .stdout(predicate::str::contains("No copied rules found to sync."));
}

#[test]
fn test_cli_sync_without_rules_root_fails() {
    let env = Env::new();

    env.sync()
        .assert()
        .failure()
        .stderr(predicate::str::contains("rulesmgr setup"));
}

// =============================================================================
// LIST COMMAND TESTS
// =============================================================================

#[test]
fn test_cli_list_shows_tools_and_rules() {
    let env = Env::with_setup();

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("claude-code"))
        .stdout(predicate::str::contains(".windsurf/rules"))
        .stdout(predicate::str::contains("01-tech-stack.md"))
        .stdout(predicate::str::contains("python"));
}

#[test]
fn test_cli_list_before_setup() {
    let env = Env::new();

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not set up yet"));
}
