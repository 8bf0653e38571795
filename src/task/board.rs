use crate::api::source::TaskSource;
use crate::api::types::{ApiError, Label, Project, Task, TaskQuery};
use crate::task::catalog::{LabelCatalog, ProjectCatalog};
use crate::task::display::{DisplayProjection, ProjectionError, Report, ReportShape};
use crate::task::filter::{FilterCriteria, ResolutionError};
use crate::task::hierarchy::ProjectHierarchy;
use crate::task::ordering::TaskOrdering;
use crate::task::palette::Palette;
use thiserror::Error;
use tracing::{debug, info};

/// Everything that can stop a report from being produced
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Fetch(#[from] ApiError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl ReportError {
    /// True when the failure comes from what the user asked for rather than
    /// from the service
    pub fn is_user_error(&self) -> bool {
        matches!(self, ReportError::Resolution(_))
    }
}

/// One run's snapshot of projects, labels and tasks, indexed for reporting
#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    projects: ProjectCatalog,
    labels: LabelCatalog,
    hierarchy: ProjectHierarchy,
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new(projects: Vec<Project>, labels: Vec<Label>, tasks: Vec<Task>) -> Self {
        let projects = ProjectCatalog::build(projects);
        let labels = LabelCatalog::build(labels);
        let hierarchy = ProjectHierarchy::resolve(&projects);

        Self {
            projects,
            labels,
            hierarchy,
            tasks,
        }
    }

    /// Fetch projects, labels and tasks one after another. The first failure
    /// aborts the whole fetch.
    pub async fn fetch(source: &dyn TaskSource, query: &TaskQuery) -> Result<Self, ApiError> {
        debug!("Fetching board from {} source", source.source_name());

        let projects = source.fetch_projects().await?;
        let labels = source.fetch_labels().await?;
        let tasks = source.fetch_tasks(query).await?;

        info!(
            "Fetched {} projects, {} labels, {} tasks from {}",
            projects.len(),
            labels.len(),
            tasks.len(),
            source.source_name()
        );

        Ok(Self::new(projects, labels, tasks))
    }

    pub fn projects(&self) -> &ProjectCatalog {
        &self.projects
    }

    pub fn labels(&self) -> &LabelCatalog {
        &self.labels
    }

    pub fn hierarchy(&self) -> &ProjectHierarchy {
        &self.hierarchy
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Filter, sort and project into the requested shape. Name resolution
    /// runs before any task is looked at.
    pub fn build_report(
        &self,
        criteria: &FilterCriteria,
        shape: ReportShape,
        palette: &Palette,
    ) -> Result<Report, ReportError> {
        let filter = criteria.resolve(&self.projects, &self.labels)?;

        let mut selected = filter.apply(&self.tasks);
        TaskOrdering::new(&self.projects, shape.sort_mode()).sort(&mut selected);

        let projection = DisplayProjection::new(&self.projects, &self.labels, palette);
        let report = match shape {
            ReportShape::Flat => projection.flat(&selected),
            ReportShape::Grouped => projection.grouped(&selected),
            ReportShape::Tree => projection.tree(&selected, &self.hierarchy)?,
        };

        debug!("Built {} report with {} tasks", shape, report.task_count());
        Ok(report)
    }
}

/// Fetch from `source` and build a report in one go
pub async fn run_report(
    source: &dyn TaskSource,
    query: &TaskQuery,
    criteria: &FilterCriteria,
    shape: ReportShape,
    palette: &Palette,
) -> Result<Report, ReportError> {
    let board = TaskBoard::fetch(source, query).await?;
    board.build_report(criteria, shape, palette)
}
