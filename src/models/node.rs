//! Node identity shared by leaves and processes

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

/// Name and parent back-references of a node
///
/// Parents are recorded by name only. The tree owns every node, so a
/// back-reference is a key into the tree, never an owning handle.
#[derive(Debug, Default)]
pub struct NodeCore {
    name: String,
    parents: Mutex<BTreeSet<String>>,
}

impl NodeCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `parent` as referencing this node
    pub fn add_parent(&self, parent: &str) {
        let mut parents = self.parents.lock().unwrap_or_else(PoisonError::into_inner);
        if !parents.contains(parent) {
            parents.insert(parent.to_string());
        }
    }

    pub fn remove_parent(&self, parent: &str) {
        self.parents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(parent);
    }

    /// Names of the processes known to reference this node
    pub fn parents(&self) -> Vec<String> {
        self.parents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn has_parents(&self) -> bool {
        !self
            .parents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}
