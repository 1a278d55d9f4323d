//! rulesmgr - Unified rules manager for AI coding tools
//!
//! Keeps one set of rule documents in a user-level rules root and deploys it
//! into each assistant's project location, by symbolic link where the tool
//! allows it and by (transformed) copy otherwise. Copies can later be
//! reconciled with their source.

pub mod config;
pub mod deployer;
pub mod error;
pub mod fs;
pub mod gitignore;
pub mod merge;
pub mod prompts;
pub mod rules;
pub mod setup;
pub mod sync;
pub mod tools;

pub use config::Config;
pub use deployer::{DeployMode, DeployReport, Deployer};
pub use error::{Error, Result};
pub use rules::{RuleDocument, RulesRepository};
pub use sync::{Decision, DecisionProvider, Reconciler, SyncReport, SyncState};
pub use tools::ToolCapability;
