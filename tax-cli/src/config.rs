//! Calculator configuration loaded from a TOML file.
//!
//! ```toml
//! # Optional. Relative paths resolve against this file's directory.
//! brackets = "brackets_2025.csv"
//!
//! [display]
//! currency_symbol = "$"
//! effective_precision = 2
//! marginal_precision = 0
//! ```
//!
//! Every key is optional; an absent `brackets` entry selects the built-in
//! reference schedule.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::BracketTable;
use tax_data::{BracketTableLoader, TableLoadError};
use thiserror::Error;
use tracing::debug;

use crate::display::DisplayOptions;

/// Errors raised while reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Bracket table file (.csv or .json); `None` uses the reference table.
    pub brackets: Option<PathBuf>,
    pub display: DisplayOptions,
}

impl CalculatorConfig {
    /// Parses configuration text. Relative bracket paths are left as-is.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads and parses `path`, resolving a relative `brackets` entry
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let (Some(brackets), Some(dir)) = (config.brackets.as_mut(), path.parent()) {
            if brackets.is_relative() {
                *brackets = dir.join(&*brackets);
            }
        }

        debug!(path = %path.display(), brackets = ?config.brackets, "loaded config");
        Ok(config)
    }

    /// Builds the validated bracket table this configuration selects.
    pub fn bracket_table(&self) -> Result<BracketTable, TableLoadError> {
        match &self.brackets {
            Some(path) => BracketTableLoader::load_file(path),
            None => Ok(BracketTable::reference()),
        }
    }
}
