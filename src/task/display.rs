//! Renderer-agnostic display records built from filtered, sorted tasks.
//!
//! Three shapes are supported: a flat list, sections of consecutive tasks
//! sharing a project, and a project tree that follows the resolved
//! hierarchy. Nothing here performs I/O; renderers in [`crate::render`]
//! consume the resulting [`Report`].

use crate::api::types::{Id, Label, Project, Task};
use crate::task::catalog::{LabelCatalog, ProjectCatalog};
use crate::task::hierarchy::ProjectHierarchy;
use crate::task::ordering::SortMode;
use crate::task::palette::Palette;
use crate::task::priority::DisplayPriority;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Hard bound on tree depth, independent of the cycle check
pub const MAX_TREE_DEPTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("Project hierarchy contains a cycle through project {project_id}")]
    Cycle { project_id: Id },

    #[error("Project hierarchy deeper than {max} levels at project {project_id}")]
    TooDeep { project_id: Id, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLabel {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTask {
    pub id: Id,
    pub content: String,
    pub description: String,
    pub project_id: Id,
    pub project_name: String,
    pub project_color: String,
    /// In ascending label order
    pub labels: Vec<DisplayLabel>,
    /// Human-readable due text, empty when the task has no due date
    pub due: String,
    pub due_date: Option<String>,
    pub priority: Option<DisplayPriority>,
    pub priority_color: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSection {
    pub project_id: Id,
    pub project_name: String,
    pub project_color: String,
    pub tasks: Vec<DisplayTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectNode {
    pub project_id: Id,
    pub project_name: String,
    pub project_color: String,
    /// 0 for top-level projects
    pub depth: usize,
    pub tasks: Vec<DisplayTask>,
    pub children: Vec<ProjectNode>,
}

impl ProjectNode {
    /// Tasks in this node and every descendant
    pub fn task_count(&self) -> usize {
        self.tasks.len()
            + self
                .children
                .iter()
                .map(ProjectNode::task_count)
                .sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Report {
    Flat {
        tasks: Vec<DisplayTask>,
    },
    Grouped {
        sections: Vec<ProjectSection>,
    },
    Tree {
        roots: Vec<ProjectNode>,
        /// Tasks whose project is missing from the catalog
        unplaced: Vec<DisplayTask>,
    },
}

impl Report {
    pub fn shape(&self) -> ReportShape {
        match self {
            Report::Flat { .. } => ReportShape::Flat,
            Report::Grouped { .. } => ReportShape::Grouped,
            Report::Tree { .. } => ReportShape::Tree,
        }
    }

    pub fn task_count(&self) -> usize {
        match self {
            Report::Flat { tasks } => tasks.len(),
            Report::Grouped { sections } => sections.iter().map(|s| s.tasks.len()).sum(),
            Report::Tree { roots, unplaced } => {
                roots.iter().map(ProjectNode::task_count).sum::<usize>() + unplaced.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.task_count() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportShape {
    Flat,
    #[default]
    Grouped,
    Tree,
}

impl ReportShape {
    /// Sort mode the shape expects its input in
    pub fn sort_mode(self) -> SortMode {
        match self {
            ReportShape::Flat => SortMode::Ungrouped,
            ReportShape::Grouped | ReportShape::Tree => SortMode::ByProject,
        }
    }
}

impl fmt::Display for ReportShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportShape::Flat => "flat",
            ReportShape::Grouped => "grouped",
            ReportShape::Tree => "tree",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flat" | "list" => Ok(ReportShape::Flat),
            "grouped" | "group" | "project" => Ok(ReportShape::Grouped),
            "tree" | "hierarchy" => Ok(ReportShape::Tree),
            _ => Err(format!(
                "Invalid shape '{}'. Valid options are: flat, grouped, tree",
                s
            )),
        }
    }
}

/// Builds display records against fixed catalogs and palette
pub struct DisplayProjection<'a> {
    projects: &'a ProjectCatalog,
    palette: &'a Palette,
    labels_by_order: Vec<&'a Label>,
}

impl<'a> DisplayProjection<'a> {
    pub fn new(projects: &'a ProjectCatalog, labels: &'a LabelCatalog, palette: &'a Palette) -> Self {
        Self {
            projects,
            palette,
            labels_by_order: labels.sorted_by_order(),
        }
    }

    pub fn task(&self, task: &Task) -> DisplayTask {
        let project = self.projects.get(&task.project_id);
        if project.is_none() {
            debug!(
                "Task {} references unknown project {}",
                task.id, task.project_id
            );
        }

        let labels = self
            .labels_by_order
            .iter()
            .filter(|label| task.has_label(&label.id))
            .map(|label| DisplayLabel {
                name: label.name.clone(),
                color: self.palette.color_hex(&label.color).to_string(),
            })
            .collect();

        let priority = task.display_priority();

        DisplayTask {
            id: task.id.clone(),
            content: task.content.clone(),
            description: task.description.clone(),
            project_id: task.project_id.clone(),
            project_name: project.map(|p| p.name.clone()).unwrap_or_default(),
            project_color: self.project_color(project),
            labels,
            due: task.due_text().to_string(),
            due_date: task.due_date().map(str::to_string),
            priority,
            priority_color: self.palette.priority_hex(priority).to_string(),
            url: task.url.clone(),
        }
    }

    pub fn flat(&self, tasks: &[&Task]) -> Report {
        Report::Flat {
            tasks: tasks.iter().map(|task| self.task(task)).collect(),
        }
    }

    /// One section per run of consecutive tasks sharing a project. A project
    /// whose tasks are interleaved with another's gets one section per run,
    /// so the sorted order is never rearranged.
    pub fn grouped(&self, tasks: &[&Task]) -> Report {
        let mut sections: Vec<ProjectSection> = Vec::new();

        for task in tasks {
            let continues_run = sections
                .last()
                .is_some_and(|section| section.project_id == task.project_id);
            if !continues_run {
                let project = self.projects.get(&task.project_id);
                sections.push(ProjectSection {
                    project_id: task.project_id.clone(),
                    project_name: project.map(|p| p.name.clone()).unwrap_or_default(),
                    project_color: self.project_color(project),
                    tasks: Vec::new(),
                });
            }
            if let Some(section) = sections.last_mut() {
                section.tasks.push(self.task(task));
            }
        }

        Report::Grouped { sections }
    }

    /// Walk the hierarchy from the root, each project's own tasks before its
    /// children. Projects with no tasks anywhere below them are left out.
    pub fn tree(
        &self,
        tasks: &[&Task],
        hierarchy: &ProjectHierarchy,
    ) -> Result<Report, ProjectionError> {
        if let Some(project_id) = hierarchy.find_cycle() {
            return Err(ProjectionError::Cycle { project_id });
        }

        let mut by_project: HashMap<&Id, Vec<DisplayTask>> = HashMap::new();
        let mut unplaced = Vec::new();
        for task in tasks {
            if self.projects.contains(&task.project_id) {
                by_project
                    .entry(&task.project_id)
                    .or_default()
                    .push(self.task(task));
            } else {
                unplaced.push(self.task(task));
            }
        }

        let mut walker = TreeWalker {
            projection: self,
            hierarchy,
            by_project,
            path: HashSet::new(),
        };

        let mut roots = walker.level(hierarchy.roots(), 0)?;

        for parent in hierarchy.unresolved_parents(self.projects) {
            warn!(
                "Parent project {} is not in the catalog; showing its children at top level",
                parent
            );
            roots.extend(walker.level(hierarchy.children(parent), 0)?);
        }

        if !unplaced.is_empty() {
            warn!("{} tasks belong to projects not in the catalog", unplaced.len());
        }

        Ok(Report::Tree { roots, unplaced })
    }

    fn project_color(&self, project: Option<&Project>) -> String {
        match project {
            Some(project) => self.palette.color_hex(&project.color).to_string(),
            None => self.palette.fallback().to_string(),
        }
    }
}

struct TreeWalker<'p, 'a> {
    projection: &'p DisplayProjection<'a>,
    hierarchy: &'p ProjectHierarchy,
    by_project: HashMap<&'p Id, Vec<DisplayTask>>,
    /// Projects on the current path from the root
    path: HashSet<Id>,
}

impl<'p, 'a> TreeWalker<'p, 'a> {
    fn level(&mut self, ids: &[Id], depth: usize) -> Result<Vec<ProjectNode>, ProjectionError> {
        let projects = self.projection.projects;
        let mut siblings: Vec<&Project> = ids
            .iter()
            .filter_map(|id| projects.get(id))
            .collect();
        siblings.sort_by_key(|project| project.order);

        let mut nodes = Vec::new();
        for project in siblings {
            if let Some(node) = self.node(project, depth)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    fn node(
        &mut self,
        project: &Project,
        depth: usize,
    ) -> Result<Option<ProjectNode>, ProjectionError> {
        if depth >= MAX_TREE_DEPTH {
            return Err(ProjectionError::TooDeep {
                project_id: project.id.clone(),
                max: MAX_TREE_DEPTH,
            });
        }
        if !self.path.insert(project.id.clone()) {
            return Err(ProjectionError::Cycle {
                project_id: project.id.clone(),
            });
        }

        let hierarchy = self.hierarchy;
        let tasks = self.by_project.remove(&project.id).unwrap_or_default();
        let children = self.level(hierarchy.children(&project.id), depth + 1)?;

        self.path.remove(&project.id);

        if tasks.is_empty() && children.is_empty() {
            return Ok(None);
        }

        Ok(Some(ProjectNode {
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            project_color: self.projection.palette.color_hex(&project.color).to_string(),
            depth,
            tasks,
            children,
        }))
    }
}
