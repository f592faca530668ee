use std::path::{Path, PathBuf};

use compact_str::ToCompactString;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::result::{AppError, Result};

/// On-disk configuration of the command line client
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JiraConfig {
    /// The URL of the Jira instance
    pub jira_url: String,
    /// The user to authenticate as
    pub username: String,
    /// Password or API token of `username`
    pub api_token: String,
    /// Log level override (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: Option<String>,
}

impl JiraConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.jira_url.trim().is_empty() {
            return Err("jira_url is required".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("username is required".to_string());
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("jira-fetch.toml")
    } else {
        PathBuf::from("jira-fetch.toml")
    }
}

/// Load the configuration file, falling back to defaults when it does not exist
pub fn load_config(config_file: &Path) -> Result<JiraConfig> {
    if !config_file.exists() {
        return Ok(JiraConfig::default());
    }

    confy::load_path(config_file).map_err(|e| AppError::ConfigError(e.to_compact_string()))
}

pub fn save_config(config_file: &Path, config: &JiraConfig) -> Result<()> {
    confy::store_path(config_file, config)
        .map_err(|e| AppError::ConfigError(e.to_compact_string()))?;

    Ok(())
}
