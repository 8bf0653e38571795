use crate::api::types::Id;
use crate::task::catalog::ProjectCatalog;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Parent key → direct child project ids, rebuilt from flat parent pointers
#[derive(Debug, Clone, Default)]
pub struct ProjectHierarchy {
    /// Child lists in catalog order; top-level projects live under `Id::root()`
    children: HashMap<Id, Vec<Id>>,
    /// Parent keys in the order they were first seen
    parent_keys: Vec<Id>,
    /// Child id → parent key
    parents: HashMap<Id, Id>,
}

impl ProjectHierarchy {
    /// Build the child lists. Dangling parent ids are recorded as is.
    pub fn resolve(projects: &ProjectCatalog) -> Self {
        let mut hierarchy = Self::default();

        for project in projects.iter() {
            let parent = project.parent_key();
            if !hierarchy.children.contains_key(&parent) {
                hierarchy.parent_keys.push(parent.clone());
            }
            hierarchy
                .children
                .entry(parent.clone())
                .or_default()
                .push(project.id.clone());
            hierarchy.parents.insert(project.id.clone(), parent);
        }

        debug!(
            "Resolved {} projects under {} parent keys",
            hierarchy.parents.len(),
            hierarchy.parent_keys.len()
        );
        hierarchy
    }

    /// Direct children of `parent`, in catalog order
    pub fn children(&self, parent: &Id) -> &[Id] {
        self.children.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Top-level projects
    pub fn roots(&self) -> &[Id] {
        self.children(&Id::root())
    }

    pub fn parent_of(&self, id: &Id) -> Option<&Id> {
        self.parents.get(id)
    }

    /// Every `(parent key, children)` pair in first-seen order
    pub fn child_lists(&self) -> impl Iterator<Item = (&Id, &[Id])> {
        self.parent_keys
            .iter()
            .map(|key| (key, self.children(key)))
    }

    /// Number of parent keys, including the root sentinel when present
    pub fn len(&self) -> usize {
        self.parent_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent_keys.is_empty()
    }

    /// Parent keys that are neither the root sentinel nor a known project
    pub fn unresolved_parents<'a>(&'a self, projects: &ProjectCatalog) -> Vec<&'a Id> {
        self.parent_keys
            .iter()
            .filter(|key| !key.is_root() && !projects.contains(key))
            .collect()
    }

    /// Walk every parent chain and return a project that is its own ancestor
    pub fn find_cycle(&self) -> Option<Id> {
        let mut cleared: HashSet<&Id> = HashSet::new();

        for start in self.parent_keys.iter().flat_map(|key| self.children(key)) {
            let mut chain: HashSet<&Id> = HashSet::new();
            let mut current = start;

            loop {
                if cleared.contains(current) {
                    break;
                }
                if !chain.insert(current) {
                    warn!("Project {} is its own ancestor", current);
                    return Some(current.clone());
                }
                match self.parents.get(current) {
                    Some(parent) if !parent.is_root() => current = parent,
                    _ => break,
                }
            }

            cleared.extend(chain);
        }

        None
    }
}
