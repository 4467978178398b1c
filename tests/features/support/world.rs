//! Test world for Cucumber scenarios

use cucumber::World;
use std::collections::HashMap;

use businessprocess::{Observation, ProcessError, ProcessNode, ProcessTree, StateName};

/// Test world that maintains state across scenario steps
#[derive(Debug, World)]
pub struct TestWorld {
    /// Tree under test
    pub tree: ProcessTree,

    /// Short scenario names of leaves mapped to their node names
    pub leaves: HashMap<String, String>,

    /// Output of the last render
    pub rendered: Option<String>,

    /// Error of the last failed step, if any
    pub last_error: Option<ProcessError>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self {
            tree: ProcessTree::new("scenario"),
            leaves: HashMap::new(),
            rendered: None,
            last_error: None,
        }
    }
}

impl TestWorld {
    /// Node name for a scenario name: a leaf short name or a process name
    pub fn node_name(&self, name: &str) -> String {
        self.leaves
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Add a service leaf `<name>;check` in `state`
    pub fn add_service(&mut self, name: &str, observation: Observation) {
        let node = self.tree.add_service(name, "check").unwrap();
        self.tree.observe(&node, observation).unwrap();
        self.leaves.insert(name.to_string(), node);
    }

    /// Add a process over a comma separated child list
    pub fn add_process(&mut self, name: &str, operator: &str, children: &str) {
        let children: Vec<String> = split_list(children)
            .iter()
            .map(|child| self.node_name(child))
            .collect();
        match ProcessNode::from_definition(name, operator, children) {
            Ok(node) => self.tree.add_process(node).unwrap(),
            Err(err) => self.last_error = Some(err),
        }
    }

    pub fn state_of(&mut self, name: &str) -> Option<StateName> {
        let process = self.tree.process(name).unwrap();
        match process.state(&self.tree) {
            Ok(state) => Some(state),
            Err(err) => {
                self.last_error = Some(err);
                None
            }
        }
    }
}

/// Split `"A, B, C"` into its trimmed, non-empty items
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
