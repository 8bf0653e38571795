use crate::api::types::{Id, Label, Project};
use std::collections::HashMap;
use tracing::debug;

/// Entities that can be indexed by a [`Catalog`]
pub trait Catalogued {
    fn id(&self) -> &Id;
    fn name(&self) -> &str;
    fn order(&self) -> i64;
}

impl Catalogued for Project {
    fn id(&self) -> &Id {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> i64 {
        self.order
    }
}

impl Catalogued for Label {
    fn id(&self) -> &Id {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> i64 {
        self.order
    }
}

/// Identity-indexed lookup built from a flat collection
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    /// Entries indexed by id; a later duplicate replaces the earlier one
    entries: HashMap<Id, T>,
    /// Distinct ids in the order they were first seen
    sequence: Vec<Id>,
}

pub type ProjectCatalog = Catalog<Project>;
pub type LabelCatalog = Catalog<Label>;

impl<T: Catalogued> Catalog<T> {
    pub fn build(items: impl IntoIterator<Item = T>) -> Self {
        let mut entries = HashMap::new();
        let mut sequence = Vec::new();
        let mut duplicates = 0usize;

        for item in items {
            let id = item.id().clone();
            if entries.insert(id.clone(), item).is_some() {
                duplicates += 1;
            } else {
                sequence.push(id);
            }
        }

        if duplicates > 0 {
            debug!("Catalog replaced {} duplicate entries", duplicates);
        }

        Self { entries, sequence }
    }

    pub fn get(&self, id: &Id) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.sequence.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn ids(&self) -> &[Id] {
        &self.sequence
    }

    /// Exact, case-sensitive name lookup. When several entries share the
    /// name, the one latest in catalog order wins.
    pub fn find_by_name(&self, name: &str) -> Option<&T> {
        self.sequence
            .iter()
            .rev()
            .filter_map(|id| self.entries.get(id))
            .find(|item| item.name() == name)
    }

    pub fn order_of(&self, id: &Id) -> Option<i64> {
        self.get(id).map(Catalogued::order)
    }

    /// Entries sorted by ascending `order`, ties kept in catalog order
    pub fn sorted_by_order(&self) -> Vec<&T> {
        let mut items: Vec<&T> = self.iter().collect();
        items.sort_by_key(|item| item.order());
        items
    }
}

impl<T: Catalogued> FromIterator<T> for Catalog<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::build(iter)
    }
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            sequence: Vec::new(),
        }
    }
}
