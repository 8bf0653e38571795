//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./tdreport.toml or ./.tdreport/config.toml
//! 2. User config: ~/.tdreport/config.toml
//! 3. System config: /etc/tdreport/config.toml
//! 4. Built-in defaults

use crate::env;
use crate::render::OutputFormat;
use crate::task::display::ReportShape;
use crate::task::priority::DisplayPriority;
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No API token: set {var} or create {path:?}")]
    MissingToken { var: &'static str, path: PathBuf },
}

/// Defaults for the `report` command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportDefaults {
    pub shape: ReportShape,
    pub format: OutputFormat,
    /// Display priorities to keep; empty keeps everything
    pub priorities: Vec<DisplayPriority>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub token_file: PathBuf,
    pub timeout_secs: u64,
    pub report: ReportDefaults,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: env::DEFAULT_API_BASE_URL.to_string(),
            token_file: PathBuf::from(env::DEFAULT_TOKEN_FILE),
            timeout_secs: env::DEFAULT_TIMEOUT_SECS,
            report: ReportDefaults::default(),
        }
    }
}

/// Shape of an OAuth token file written by the authorization flow
#[derive(Deserialize)]
struct StoredToken {
    access_token: String,
}

impl ClientConfig {
    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pick the API token: `env_token` when non-empty, otherwise the token
    /// file (relative paths resolve against `base_dir`). The file may hold the
    /// bare token or a JSON object with an `access_token` field.
    pub fn resolve_token(
        &self,
        env_token: Option<String>,
        base_dir: &Path,
    ) -> Result<String, ConfigError> {
        if let Some(token) = env_token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            debug!("Using API token from {}", env::vars::TOKEN);
            return Ok(token);
        }

        let path = env::token_file_path(base_dir, &self.token_file);
        if !path.is_file() {
            return Err(ConfigError::MissingToken {
                var: env::vars::TOKEN,
                path,
            });
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let content = content.trim();

        let token = match serde_json::from_str::<StoredToken>(content) {
            Ok(stored) => stored.access_token,
            Err(_) => content.to_string(),
        };

        if token.is_empty() {
            return Err(ConfigError::MissingToken {
                var: env::vars::TOKEN,
                path,
            });
        }

        debug!("Using API token from {:?}", path);
        Ok(token)
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load `override_path` if given, otherwise the first file found in the
    /// discovery hierarchy, otherwise built-in defaults
    pub fn discover_config(override_path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
        if let Some(path) = override_path {
            info!("Loading configuration from: {:?}", path);
            return ClientConfig::from_toml_file(path);
        }

        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return ClientConfig::from_toml_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(ClientConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = Self::get_config_candidates();

        for candidate in candidates {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Get list of configuration file candidates in priority order
    fn get_config_candidates() -> Vec<PathBuf> {
        let current_dir = std_env::current_dir().ok();
        let home_dir = Self::get_home_dir();
        Self::candidates_for(current_dir.as_deref(), home_dir.as_deref())
    }

    fn candidates_for(current_dir: Option<&Path>, home_dir: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        // 1. Current directory: ./tdreport.toml, ./.tdreport/config.toml
        if let Some(current_dir) = current_dir {
            candidates.push(env::local_standalone_config_path(current_dir));
            candidates.push(env::local_config_file_path(current_dir));
        }

        // 2. User config: ~/.tdreport/config.toml
        if let Some(home_dir) = home_dir {
            candidates.push(env::user_config_file_path(home_dir));
        }

        // 3. System config
        #[cfg(unix)]
        candidates.push(PathBuf::from(env::SYSTEM_CONFIG_FILE));

        candidates
    }

    /// Get home directory path
    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        let candidates = Self::get_config_candidates();
        for (i, candidate) in candidates.iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "✓ EXISTS"
                } else {
                    "✗ NOT A FILE"
                }
            } else {
                "✗ NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        if let Some(found) = Self::find_config_file() {
            println!("Active configuration: {:?}", found);
        } else {
            println!("Active configuration: Built-in defaults");
        }
    }
}
