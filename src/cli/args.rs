//! Command line argument parsing
//!
//! This module handles CLI argument parsing with subcommands:
//! - `report`: Fetch, filter, sort and render tasks
//! - `projects`: List projects
//! - `labels`: List personal labels
//! - `shared-labels`: List shared label names
//! - `comments`: List comments on a task or project
//! - `project`, `label`, `task`: Show a single entity by id
//! - `show-config`: Show configuration discovery information

use crate::api::types::{CommentTarget, Id, TaskQuery};
use crate::render::OutputFormat;
use crate::task::display::ReportShape;
use crate::task::priority::DisplayPriority;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tdreport")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Organize and report Todoist tasks by project, label and priority")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Path to the token file
    #[arg(long = "token-file", global = true)]
    pub token_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print active tasks organized by project
    Report(ReportArgs),
    /// List projects in display order
    Projects {
        /// Read from a saved JSON snapshot instead of the API
        #[arg(long = "snapshot", value_name = "FILE")]
        snapshot: Option<PathBuf>,
    },
    /// List personal labels in display order
    Labels {
        /// Read from a saved JSON snapshot instead of the API
        #[arg(long = "snapshot", value_name = "FILE")]
        snapshot: Option<PathBuf>,
    },
    /// List shared label names
    SharedLabels,
    /// List comments for a task or a project
    Comments(CommentArgs),
    /// Show one project by id
    Project {
        /// Project id
        id: String,
    },
    /// Show one personal label by id
    Label {
        /// Label id
        id: String,
    },
    /// Show one active task by id
    Task {
        /// Task id
        id: String,
    },
    /// Show configuration discovery information
    ShowConfig,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ReportArgs {
    /// Only tasks carrying this label (exact name)
    #[arg(short = 'l', long = "label")]
    pub label: Option<String>,

    /// Only tasks in this project (exact name)
    #[arg(short = 'p', long = "project")]
    pub project: Option<String>,

    /// Display priorities to keep, 1 (urgent) to 4
    #[arg(long = "priorities", value_delimiter = ',', value_name = "N,...")]
    pub priorities: Vec<DisplayPriority>,

    /// Layout of the report
    #[arg(short = 's', long = "shape")]
    pub shape: Option<ReportShape>,

    /// Output format
    #[arg(short = 'f', long = "format")]
    pub format: Option<OutputFormat>,

    /// Filter expression evaluated by the service
    #[arg(long = "filter", value_name = "EXPR")]
    pub filter: Option<String>,

    /// Only fetch tasks in this project id
    #[arg(long = "project-id", value_name = "ID")]
    pub project_id: Option<String>,

    /// Only fetch tasks carrying this label name
    #[arg(long = "query-label", value_name = "NAME")]
    pub query_label: Option<String>,

    /// Only fetch these task ids
    #[arg(long = "ids", value_delimiter = ',', value_name = "ID,...")]
    pub ids: Vec<String>,

    /// Read from a saved JSON snapshot instead of the API
    #[arg(long = "snapshot", value_name = "FILE", conflicts_with = "filter")]
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, ClapArgs)]
#[group(required = true, multiple = false)]
pub struct CommentArgs {
    /// Task id
    #[arg(long = "task")]
    pub task: Option<String>,

    /// Project id
    #[arg(long = "project")]
    pub project: Option<String>,
}

impl ReportArgs {
    /// Parameters passed through to the task source
    pub fn task_query(&self) -> TaskQuery {
        TaskQuery {
            project_id: self.project_id.as_deref().map(Id::from),
            label: self.query_label.clone(),
            filter: self.filter.clone(),
            ids: self.ids.iter().map(|id| Id::from(id.as_str())).collect(),
        }
    }
}

impl CommentArgs {
    pub fn target(&self) -> Option<CommentTarget> {
        match (&self.task, &self.project) {
            (Some(task), _) => Some(CommentTarget::Task(Id::from(task.as_str()))),
            (None, Some(project)) => Some(CommentTarget::Project(Id::from(project.as_str()))),
            (None, None) => None,
        }
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
