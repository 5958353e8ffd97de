//! Run configuration: file locations, the target section, transform options
//! and the dashboard's credential source.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::transform::TransformOptions;

/// Configuration file looked up in the working directory when no explicit
/// path is given.
pub const DEFAULT_CONFIG_FILE: &str = "session-sheets.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Workbook holding the raw schedule.
    pub source: PathBuf,
    /// Sheet of the source workbook to read; the first sheet when unset.
    pub source_sheet: Option<String>,
    /// Workbook receiving the formatted schedule.
    pub destination: PathBuf,
    /// Sheet of the destination workbook that is replaced on every run.
    pub section: String,
    pub transform: TransformConfig,
    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from("Source_data.xlsx"),
            source_sheet: None,
            destination: PathBuf::from("Destination_data.xlsx"),
            section: "Formatted Data".to_string(),
            transform: TransformConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Read ambiguous numeric dates as day first.
    pub day_first: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Users allowed past the dashboard gate, matched case-insensitively.
    pub users: Vec<String>,
    /// Environment variable holding the dashboard password, if one is
    /// required.
    pub password_env: Option<String>,
}

impl Config {
    /// Loads the configuration from `path`, or from [`DEFAULT_CONFIG_FILE`]
    /// when it exists, falling back to defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    debug!("no configuration file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|error| ToolError::Config {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        let config = Self::from_toml(&content, path)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parses configuration text; `origin` is only used in error messages.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|error| ToolError::Config {
            path: origin.to_path_buf(),
            reason: error.to_string(),
        })
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            day_first: self.transform.day_first,
        }
    }
}
