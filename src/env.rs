//! Environment constants and path utilities for tdreport.
//!
//! This module centralizes the hardcoded file names, directory names and
//! environment variables used to locate configuration and credentials.

use std::path::{Path, PathBuf};

/// Application directory name (hidden directory in the home or project dir)
pub const APP_DIR_NAME: &str = ".tdreport";

/// Configuration file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Stand-alone configuration file in the current directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "tdreport.toml";

/// System-wide configuration file
pub const SYSTEM_CONFIG_FILE: &str = "/etc/tdreport/config.toml";

/// REST endpoint used when no configuration overrides it
pub const DEFAULT_API_BASE_URL: &str = "https://api.todoist.com/rest/v2/";

/// Token file looked up relative to the working directory
pub const DEFAULT_TOKEN_FILE: &str = ".token.todoist";

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables read by the binary
pub mod vars {
    /// API token; takes precedence over the token file
    pub const TOKEN: &str = "TODOIST_TOKEN";

    /// Standard tracing filter override
    pub const LOG_FILTER: &str = "RUST_LOG";
}

/// Build the app directory path in the user's home directory
pub fn user_config_dir_path(home_dir: &Path) -> PathBuf {
    home_dir.join(APP_DIR_NAME)
}

/// Build the config file path in the user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build the hidden config file path in the current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Build the stand-alone config file path in the current directory
pub fn local_standalone_config_path(current_dir: &Path) -> PathBuf {
    current_dir.join(LOCAL_CONFIG_FILE_NAME)
}

/// Resolve a token file path; relative paths are taken from `base_dir`
pub fn token_file_path(base_dir: &Path, token_file: &Path) -> PathBuf {
    if token_file.is_absolute() {
        token_file.to_path_buf()
    } else {
        base_dir.join(token_file)
    }
}
