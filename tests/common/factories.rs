//! Test factories for building process trees
//!
//! Factories hand out unique leaf names so tests only have to care about
//! states and shapes.

use businessprocess::{Observation, ProcessNode, ProcessTree, StateName};

/// Service state holding the given severity rank
pub fn state_for_rank(rank: u8) -> StateName {
    match rank {
        0 => StateName::Ok,
        1 => StateName::Pending,
        2 => StateName::Warning,
        3 => StateName::Unknown,
        _ => StateName::Critical,
    }
}

/// Incrementally builds a [`ProcessTree`]
pub struct TreeFactory {
    tree: ProcessTree,
    counter: usize,
}

impl TreeFactory {
    pub fn new(name: &str) -> Self {
        Self {
            tree: ProcessTree::new(name),
            counter: 0,
        }
    }

    fn next_host(&mut self) -> String {
        self.counter += 1;
        format!("host{}", self.counter)
    }

    /// Add a service leaf in `state`
    pub fn service(&mut self, state: StateName) -> String {
        self.service_with(Observation::new(state))
    }

    /// Add a service leaf with a full observation
    pub fn service_with(&mut self, observation: Observation) -> String {
        let host = self.next_host();
        let name = self.tree.add_service(host, "check").unwrap();
        self.tree.observe(&name, observation).unwrap();
        name
    }

    /// Add one service leaf per rank, in order
    pub fn services_with_ranks(&mut self, ranks: &[u8]) -> Vec<String> {
        ranks
            .iter()
            .map(|rank| self.service(state_for_rank(*rank)))
            .collect()
    }

    /// Add a host leaf in `state`
    pub fn host(&mut self, state: StateName) -> String {
        let host = self.next_host();
        let name = self.tree.add_host(host).unwrap();
        self.tree.observe(&name, Observation::new(state)).unwrap();
        name
    }

    /// Add a process using the textual operator form
    pub fn process(&mut self, name: &str, operator: &str, children: &[String]) -> String {
        let node = ProcessNode::from_definition(name, operator, children.iter().cloned()).unwrap();
        self.tree.add_process(node).unwrap();
        name.to_string()
    }

    pub fn tree(&self) -> &ProcessTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ProcessTree {
        &mut self.tree
    }

    pub fn finish(self) -> ProcessTree {
        self.tree
    }
}
