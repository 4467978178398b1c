//! Problem drill-down data model

use serde::{Deserialize, Serialize};

use super::state::StateName;

/// Kind of node appearing in a problem tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Process,
    Host,
    Service,
}

/// One problematic child and the problems below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemBranch {
    /// Node name, usable to resolve the node in its tree
    pub node: String,

    /// Name shown to people: the alias of a process, the node name otherwise
    pub label: String,

    pub kind: NodeKind,

    /// State the node currently reports
    pub state: StateName,

    /// Problems below this node, empty for leaves
    pub children: ProblemTree,
}

/// Problematic children keyed by name, in child order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemTree {
    branches: Vec<ProblemBranch>,
}

impl ProblemTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, branch: ProblemBranch) {
        self.branches.push(branch);
    }

    pub fn get(&self, name: &str) -> Option<&ProblemBranch> {
        self.branches.iter().find(|branch| branch.node == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.branches.iter().map(|branch| branch.node.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProblemBranch> {
        self.branches.iter()
    }
}
