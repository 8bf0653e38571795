use crate::api::source::TaskSource;
use crate::api::types::{ApiError, Label, Project, Task, TaskQuery};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A saved copy of everything a report needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub labels: Vec<Label>,
    pub tasks: Vec<Task>,
}

/// Offline [`TaskSource`] backed by a [`Snapshot`]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot written as JSON (`{"projects": [...], "labels": [...], "tasks": [...]}`)
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ApiError> {
        let path = path.as_ref();
        debug!("Loading snapshot from {:?}", path);
        let content = fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&content).map_err(|source| ApiError::Decode {
            context: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Apply the structured parts of a task query locally
    fn query_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, ApiError> {
        if let Some(filter) = &query.filter {
            return Err(ApiError::Unsupported(format!(
                "filter expression '{}' can only be evaluated by the service",
                filter
            )));
        }

        let label_id = match &query.label {
            Some(name) => match self.snapshot.labels.iter().rev().find(|l| &l.name == name) {
                Some(label) => Some(label.id.clone()),
                None => {
                    debug!("Snapshot has no label named '{}', no tasks match", name);
                    return Ok(Vec::new());
                }
            },
            None => None,
        };

        Ok(self
            .snapshot
            .tasks
            .iter()
            .filter(|task| {
                query
                    .project_id
                    .as_ref()
                    .is_none_or(|id| &task.project_id == id)
            })
            .filter(|task| query.ids.is_empty() || query.ids.contains(&task.id))
            .filter(|task| label_id.as_ref().is_none_or(|id| task.has_label(id)))
            .cloned()
            .collect())
    }
}

impl TaskSource for SnapshotSource {
    fn fetch_projects(&self) -> BoxFuture<'_, Result<Vec<Project>, ApiError>> {
        Box::pin(async move { Ok(self.snapshot.projects.clone()) })
    }

    fn fetch_labels(&self) -> BoxFuture<'_, Result<Vec<Label>, ApiError>> {
        Box::pin(async move { Ok(self.snapshot.labels.clone()) })
    }

    fn fetch_tasks<'a>(
        &'a self,
        query: &'a TaskQuery,
    ) -> BoxFuture<'a, Result<Vec<Task>, ApiError>> {
        Box::pin(async move { self.query_tasks(query) })
    }

    fn source_name(&self) -> &'static str {
        "snapshot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Id;

    fn snapshot() -> Snapshot {
        Snapshot {
            projects: vec![],
            labels: vec![Label {
                id: Id::from("10"),
                name: "errand".to_string(),
                ..Default::default()
            }],
            tasks: vec![
                Task {
                    id: Id::from("1"),
                    project_id: Id::from("100"),
                    content: "Buy stamps".to_string(),
                    label_ids: vec![Id::from("10")],
                    ..Default::default()
                },
                Task {
                    id: Id::from("2"),
                    project_id: Id::from("200"),
                    content: "Plan sprint".to_string(),
                    ..Default::default()
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_unfiltered_query_returns_everything() {
        let source = SnapshotSource::new(snapshot());
        let tasks = source.fetch_tasks(&TaskQuery::default()).await.unwrap();
        assert_eq!(tasks.len(), 2);
    }

    #[tokio::test]
    async fn test_query_by_project_ids_and_label() {
        let source = SnapshotSource::new(snapshot());

        let query = TaskQuery {
            project_id: Some(Id::from("200")),
            ..Default::default()
        };
        let tasks = source.fetch_tasks(&query).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, Id::from("2"));

        let query = TaskQuery {
            ids: vec![Id::from("1")],
            ..Default::default()
        };
        assert_eq!(source.fetch_tasks(&query).await.unwrap()[0].id, Id::from("1"));

        let query = TaskQuery {
            label: Some("errand".to_string()),
            ..Default::default()
        };
        assert_eq!(source.fetch_tasks(&query).await.unwrap().len(), 1);

        let query = TaskQuery {
            label: Some("missing".to_string()),
            ..Default::default()
        };
        assert!(source.fetch_tasks(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_expression_is_unsupported_offline() {
        let source = SnapshotSource::new(snapshot());
        let query = TaskQuery {
            filter: Some("today".to_string()),
            ..Default::default()
        };
        let result = source.fetch_tasks(&query).await;
        assert!(matches!(result, Err(ApiError::Unsupported(_))));
    }
}
