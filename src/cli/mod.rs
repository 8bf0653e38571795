//! CLI-specific functionality for tdreport
//!
//! This module contains argument parsing and configuration discovery.

pub mod args;
pub mod config;

pub use args::{Args, CommentArgs, Commands, ReportArgs};
pub use config::{ClientConfig, ConfigDiscovery, ConfigError, ReportDefaults};
