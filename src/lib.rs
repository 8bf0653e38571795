//! # tdreport
//!
//! A Todoist client that fetches projects, labels and active tasks, then
//! organizes them into filtered, sorted reports grouped by project.
//!
//! ## Architecture Overview
//!
//! - **[`api`]**: Wire types, the [`TaskSource`] seam, the REST client and an
//!   offline snapshot source
//! - **[`task`]**: Catalogs, project hierarchy, filter predicates, the
//!   multi-key task ordering and the display projection
//! - **[`render`]**: Text, HTML and JSON output for a [`Report`]
//! - **[`cli`]**: Argument parsing and configuration discovery
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tdreport::{FilterCriteria, Palette, ReportShape, TaskBoard, TodoistClient};
//! use tdreport::api::TaskQuery;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = TodoistClient::new(
//!         "https://api.todoist.com/rest/v2/",
//!         "my-token",
//!         Duration::from_secs(30),
//!     )?;
//!     let board = TaskBoard::fetch(&client, &TaskQuery::default()).await?;
//!
//!     let criteria = FilterCriteria::default().with_label("urgent");
//!     let report = board.build_report(&criteria, ReportShape::Tree, &Palette::standard())?;
//!     println!("{}", tdreport::render::text::render(&report));
//!     Ok(())
//! }
//! ```

/// Todoist wire types and task sources.
pub mod api;

/// Task organization engine.
///
/// Builds catalogs from fetched projects and labels, resolves the project
/// hierarchy, filters and orders tasks, and projects them for display.
pub mod task;

/// Report renderers.
pub mod render;

/// Environment constants and path utilities.
pub mod env;

// CLI module for command-line interface
pub mod cli;

pub use api::{ApiError, Snapshot, SnapshotSource, TaskSource, TodoistClient};
pub use render::OutputFormat;
pub use task::{
    DisplayPriority, FilterCriteria, Palette, ProjectionError, Report, ReportError, ReportShape,
    ResolutionError, TaskBoard, run_report,
};
