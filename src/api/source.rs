use crate::api::types::{ApiError, Label, Project, Task, TaskQuery};
use futures::future::BoxFuture;

/// Anything that can hand out a snapshot of projects, labels and tasks.
///
/// Each call is a single request/response exchange. Implementations do not
/// retry; a failure is returned to the caller as is.
pub trait TaskSource: Send + Sync {
    /// Fetch every project visible to the user
    fn fetch_projects(&self) -> BoxFuture<'_, Result<Vec<Project>, ApiError>>;

    /// Fetch every personal label
    fn fetch_labels(&self) -> BoxFuture<'_, Result<Vec<Label>, ApiError>>;

    /// Fetch active tasks, narrowed by the service-side query parameters
    fn fetch_tasks<'a>(&'a self, query: &'a TaskQuery)
    -> BoxFuture<'a, Result<Vec<Task>, ApiError>>;

    /// Short identifier used in logs
    fn source_name(&self) -> &'static str;
}
