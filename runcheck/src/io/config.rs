//! Checker configuration stored in `runcheck.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::grammar::{allowed_commit_types, is_commit_type};
use crate::core::naming::{AUTO, DEFAULT_MAX_BRANCH_LENGTH, MIN_BRANCH_LENGTH_LIMIT};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "runcheck.toml";

/// Checker configuration (TOML).
///
/// Every field is optional in the file; missing fields take the defaults
/// below, which match the CLI defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CheckerConfig {
    pub validate: ValidateConfig,
    pub derive: DeriveConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidateConfig {
    /// Permit non-empty `escalations` without passing `--allow-escalations`.
    pub allow_escalations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeriveConfig {
    pub commit_type: String,
    pub commit_scope: String,
    /// Branch prefix; `auto` uses the commit type.
    pub branch_prefix: String,
    pub max_branch_length: usize,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            commit_type: "feat".to_string(),
            commit_scope: "feature".to_string(),
            branch_prefix: AUTO.to_string(),
            max_branch_length: DEFAULT_MAX_BRANCH_LENGTH,
        }
    }
}

impl CheckerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.derive.max_branch_length < MIN_BRANCH_LENGTH_LIMIT {
            return Err(anyhow!(
                "derive.max_branch_length must be >= {MIN_BRANCH_LENGTH_LIMIT}"
            ));
        }
        if !is_commit_type(&self.derive.commit_type) {
            return Err(anyhow!(
                "derive.commit_type must be one of: {}",
                allowed_commit_types()
            ));
        }
        if self.derive.branch_prefix.trim().is_empty() {
            return Err(anyhow!("derive.branch_prefix must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `CheckerConfig::default()`.
pub fn load_config(path: &Path) -> Result<CheckerConfig> {
    if !path.exists() {
        let cfg = CheckerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: CheckerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &CheckerConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, buf)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
