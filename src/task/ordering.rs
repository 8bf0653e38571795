use crate::api::types::Task;
use crate::task::catalog::ProjectCatalog;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Stand-in for a missing due date; compares after every real `YYYY-MM-DD`
pub const MISSING_DUE_DATE: &str = "9999-99-99";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Project order is the leading key
    #[default]
    ByProject,
    /// Priority, due date and task order only
    Ungrouped,
}

/// Task comparator with the key precedence used for every report:
///
/// 1. containing project's `order` (only in [`SortMode::ByProject`]; tasks in
///    unknown projects come last)
/// 2. priority, urgent first
/// 3. due date ascending, missing dates last
/// 4. task `order`
#[derive(Debug, Clone, Copy)]
pub struct TaskOrdering<'a> {
    projects: &'a ProjectCatalog,
    mode: SortMode,
}

impl<'a> TaskOrdering<'a> {
    pub fn new(projects: &'a ProjectCatalog, mode: SortMode) -> Self {
        Self { projects, mode }
    }

    pub fn mode(&self) -> SortMode {
        self.mode
    }

    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let by_project = match self.mode {
            SortMode::ByProject => self.project_rank(a).cmp(&self.project_rank(b)),
            SortMode::Ungrouped => Ordering::Equal,
        };

        by_project
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| due_key(a).cmp(due_key(b)))
            .then_with(|| a.order.cmp(&b.order))
    }

    /// Stable in-place sort
    pub fn sort<T: Borrow<Task>>(&self, tasks: &mut [T]) {
        tasks.sort_by(|a, b| self.compare(a.borrow(), b.borrow()));
    }

    fn project_rank(&self, task: &Task) -> (bool, i64) {
        match self.projects.order_of(&task.project_id) {
            Some(order) => (false, order),
            None => (true, 0),
        }
    }
}

fn due_key(task: &Task) -> &str {
    task.due_date().unwrap_or(MISSING_DUE_DATE)
}
