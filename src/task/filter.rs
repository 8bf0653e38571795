use crate::api::types::{Id, Task};
use crate::task::catalog::{LabelCatalog, ProjectCatalog};
use crate::task::priority::DisplayPriority;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// A named filter criterion that did not match any catalog entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Label \"{0}\" not found")]
    UnknownLabel(String),

    #[error("Project \"{0}\" not found")]
    UnknownProject(String),
}

/// Filter criteria as the user names them, before catalog resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub priorities: BTreeSet<DisplayPriority>,
}

impl FilterCriteria {
    pub fn with_label(mut self, name: impl Into<String>) -> Self {
        self.label = Some(name.into());
        self
    }

    pub fn with_project(mut self, name: impl Into<String>) -> Self {
        self.project = Some(name.into());
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = DisplayPriority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    /// Turn names into ids. An empty name leaves its criterion disabled.
    pub fn resolve(
        &self,
        projects: &ProjectCatalog,
        labels: &LabelCatalog,
    ) -> Result<TaskFilter, ResolutionError> {
        let label_id = match self.label.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => Some(
                labels
                    .find_by_name(name)
                    .map(|label| label.id.clone())
                    .ok_or_else(|| ResolutionError::UnknownLabel(name.to_string()))?,
            ),
            None => None,
        };

        let project_id = match self.project.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => Some(
                projects
                    .find_by_name(name)
                    .map(|project| project.id.clone())
                    .ok_or_else(|| ResolutionError::UnknownProject(name.to_string()))?,
            ),
            None => None,
        };

        debug!(
            "Resolved filter: label={:?} project={:?} priorities={:?}",
            label_id, project_id, self.priorities
        );

        Ok(TaskFilter {
            label_id,
            project_id,
            priorities: self.priorities.clone(),
        })
    }
}

/// Resolved task predicate. Every criterion is optional and they combine by AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub label_id: Option<Id>,
    pub project_id: Option<Id>,
    pub priorities: BTreeSet<DisplayPriority>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, id: impl Into<Id>) -> Self {
        self.label_id = Some(id.into());
        self
    }

    pub fn project(mut self, id: impl Into<Id>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    pub fn priorities(mut self, priorities: impl IntoIterator<Item = DisplayPriority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.label_id.as_ref().is_none_or(Id::is_root)
            && self.project_id.as_ref().is_none_or(Id::is_root)
            && self.priorities.is_empty()
    }

    pub fn matches(&self, task: &Task) -> bool {
        let label_ok = match &self.label_id {
            Some(id) if !id.is_root() => task.has_label(id),
            _ => true,
        };
        let project_ok = match &self.project_id {
            Some(id) if !id.is_root() => &task.project_id == id,
            _ => true,
        };
        let priority_ok = self.priorities.is_empty()
            || task
                .display_priority()
                .is_some_and(|priority| self.priorities.contains(&priority));

        label_ok && project_ok && priority_ok
    }

    /// Tasks that pass, in input order
    pub fn apply<'t>(&self, tasks: &'t [Task]) -> Vec<&'t Task> {
        let kept: Vec<&Task> = tasks.iter().filter(|task| self.matches(task)).collect();
        debug!("Filter kept {} of {} tasks", kept.len(), tasks.len());
        kept
    }
}
