//! TOML configuration of the command-line tool.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use labtransfer_graph::{ExportSettings, ImportOptions};
use serde::Deserialize;

/// `[import]` and `[export]` tables. Missing tables and keys take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub import: ImportOptions,
    pub export: ExportSettings,
}

impl CliConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Reads `path`, or returns the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }
}
