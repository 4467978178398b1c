//! Process tree container
//!
//! [`TreeContainer`] is the seam between process nodes and whoever owns
//! them: a process only ever asks it to turn a child name into a node.
//! [`ProcessTree`] is the in-memory implementation, owning every leaf and
//! process of one business process definition.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::TreeConfig;
use crate::models::{
    LeafNode, MonitoredObject, NodeCore, NodeKind, Observation, StateName, StatusCode,
};
use crate::services::legacy_config::RenderSession;
use crate::services::process::ProcessNode;
use crate::utils::error::{ProcessError, ProcessResult};
use crate::utils::natural::natural_cmp;

/// Resolves node names for process nodes
pub trait TreeContainer {
    /// Identity label of the tree
    fn name(&self) -> &str;

    /// Whether the definition is locked for editing
    fn is_locked(&self) -> bool;

    /// Look up a node by name; never creates one
    fn resolve(&self, name: &str) -> Option<NodeRef<'_>>;

    /// Counter bumped on every change memoized values depend on
    fn revision(&self) -> u64 {
        0
    }

    /// States that do not count as problems in a state summary
    fn acceptable_states(&self) -> &[StateName] {
        &StateName::ACCEPTABLE
    }
}

/// Borrowed handle to a node owned by a tree
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Leaf(&'a LeafNode),
    Process(&'a ProcessNode),
}

impl<'a> NodeRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            NodeRef::Leaf(leaf) => leaf.name(),
            NodeRef::Process(process) => process.name(),
        }
    }

    /// Display name: a process alias, or the node name
    pub fn label(&self) -> String {
        match self {
            NodeRef::Leaf(leaf) => leaf.name().to_string(),
            NodeRef::Process(process) => process.alias(),
        }
    }

    pub fn core(&self) -> &'a NodeCore {
        match self {
            NodeRef::Leaf(leaf) => leaf.core(),
            NodeRef::Process(process) => process.core(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Leaf(leaf) => leaf.kind(),
            NodeRef::Process(process) => process.kind(),
        }
    }

    pub fn as_process(&self) -> Option<&'a ProcessNode> {
        match self {
            NodeRef::Process(process) => Some(process),
            NodeRef::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&'a LeafNode> {
        match self {
            NodeRef::Leaf(leaf) => Some(leaf),
            NodeRef::Process(_) => None,
        }
    }

    pub fn status<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<StatusCode> {
        match self {
            NodeRef::Leaf(leaf) => Ok(leaf.status()),
            NodeRef::Process(process) => process.status(tree),
        }
    }

    pub fn state_name<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<StateName> {
        match self {
            NodeRef::Leaf(leaf) => Ok(leaf.state_name()),
            NodeRef::Process(process) => process.state(tree),
        }
    }

    pub fn last_state_change<C: TreeContainer + ?Sized>(
        &self,
        tree: &C,
    ) -> ProcessResult<Option<DateTime<Utc>>> {
        match self {
            NodeRef::Leaf(leaf) => Ok(leaf.last_state_change()),
            NodeRef::Process(process) => process.last_state_change(tree),
        }
    }

    pub fn is_missing<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<bool> {
        match self {
            NodeRef::Leaf(leaf) => Ok(leaf.is_missing()),
            NodeRef::Process(process) => process.is_missing(tree),
        }
    }

    /// Whether the node on its own is a problem
    pub fn is_problem<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<bool> {
        match self {
            NodeRef::Leaf(leaf) => Ok(leaf.is_problem()),
            NodeRef::Process(process) => process.is_problem(tree),
        }
    }
}

#[derive(Debug)]
enum TreeNode {
    Leaf(LeafNode),
    Process(ProcessNode),
}

impl TreeNode {
    fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            TreeNode::Leaf(leaf) => NodeRef::Leaf(leaf),
            TreeNode::Process(process) => NodeRef::Process(process),
        }
    }
}

/// In-memory owner of all nodes of one business process definition
#[derive(Debug)]
pub struct ProcessTree {
    name: String,
    locked: bool,
    acceptable_states: Vec<StateName>,
    revision: u64,
    nodes: HashMap<String, TreeNode>,
}

impl ProcessTree {
    /// Create an empty, unlocked tree
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locked: false,
            acceptable_states: StateName::ACCEPTABLE.to_vec(),
            revision: 0,
            nodes: HashMap::new(),
        }
    }

    /// Create an empty tree from configuration
    pub fn from_config(config: &TreeConfig) -> Self {
        let mut tree = Self::new(config.name.clone());
        tree.locked = config.locked;
        tree.acceptable_states = config.acceptable_states.clone();
        info!(
            "Process tree '{}' created (locked={})",
            tree.name, tree.locked
        );
        tree
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn ensure_unlocked(&self) -> ProcessResult<()> {
        if self.locked {
            return Err(ProcessError::TreeLocked(self.name.clone()));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn insert(&mut self, name: String, node: TreeNode) -> ProcessResult<()> {
        self.ensure_unlocked()?;
        if self.nodes.contains_key(&name) {
            return Err(ProcessError::DuplicateNode(name));
        }
        debug!("Adding node '{}' to process tree '{}'", name, self.name);
        self.nodes.insert(name, node);
        self.touch();
        Ok(())
    }

    // ==================== Definition ====================

    pub fn add_process(&mut self, process: ProcessNode) -> ProcessResult<()> {
        self.insert(process.name().to_string(), TreeNode::Process(process))
    }

    pub fn add_leaf(&mut self, leaf: LeafNode) -> ProcessResult<()> {
        self.insert(leaf.name().to_string(), TreeNode::Leaf(leaf))
    }

    /// Add a host leaf, returning its node name
    pub fn add_host(&mut self, host: impl Into<String>) -> ProcessResult<String> {
        let leaf = LeafNode::new(MonitoredObject::Host { host: host.into() })?;
        let name = leaf.name().to_string();
        self.add_leaf(leaf)?;
        Ok(name)
    }

    /// Add a service leaf, returning its node name
    pub fn add_service(
        &mut self,
        host: impl Into<String>,
        service: impl Into<String>,
    ) -> ProcessResult<String> {
        let leaf = LeafNode::new(MonitoredObject::Service {
            host: host.into(),
            service: service.into(),
        })?;
        let name = leaf.name().to_string();
        self.add_leaf(leaf)?;
        Ok(name)
    }

    /// Mutable access to a process definition
    ///
    /// Handing out the node counts as a change: every memoized value in
    /// the tree is recomputed on its next read.
    pub fn process_mut(&mut self, name: &str) -> ProcessResult<&mut ProcessNode> {
        self.ensure_unlocked()?;
        self.touch();
        match self.nodes.get_mut(name) {
            Some(TreeNode::Process(process)) => Ok(process),
            Some(TreeNode::Leaf(_)) => Err(ProcessError::NotAProcess(name.to_string())),
            None => Err(ProcessError::UnknownNode(name.to_string())),
        }
    }

    /// Replace the children of a process
    ///
    /// Children no longer referenced forget this process as a parent.
    pub fn set_child_names<I, S>(&mut self, name: &str, names: I) -> ProcessResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let removed: Vec<String> = {
            let process = self.process_mut(name)?;
            let previous = process.child_names().to_vec();
            process.set_child_names(names);
            previous
                .into_iter()
                .filter(|child| process.child_names().binary_search(child).is_err())
                .collect()
        };

        for child in removed {
            if let Some(node) = self.nodes.get(&child) {
                node.as_node_ref().core().remove_parent(name);
            }
        }
        Ok(())
    }

    /// Record the latest state of a leaf
    ///
    /// Observations are monitoring data, not definition edits, so they are
    /// accepted while the tree is locked.
    pub fn observe(&mut self, name: &str, observation: Observation) -> ProcessResult<()> {
        match self.nodes.get_mut(name) {
            Some(TreeNode::Leaf(leaf)) => leaf.observe(observation)?,
            Some(TreeNode::Process(_)) => return Err(ProcessError::NotALeaf(name.to_string())),
            None => return Err(ProcessError::UnknownNode(name.to_string())),
        }
        self.touch();
        Ok(())
    }

    // ==================== Queries ====================

    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node(&self, name: &str) -> ProcessResult<NodeRef<'_>> {
        self.resolve(name)
            .ok_or_else(|| ProcessError::UnknownNode(name.to_string()))
    }

    pub fn process(&self, name: &str) -> ProcessResult<&ProcessNode> {
        self.node(name)?
            .as_process()
            .ok_or_else(|| ProcessError::NotAProcess(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All process names, in natural order
    pub fn process_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .nodes
            .values()
            .filter_map(|node| match node {
                TreeNode::Process(process) => Some(process.name()),
                TreeNode::Leaf(_) => None,
            })
            .collect();
        names.sort_by(|a, b| natural_cmp(a, b));
        names
    }

    /// Processes no other process references, in natural order
    pub fn root_nodes(&self) -> Vec<&ProcessNode> {
        let referenced: HashSet<&str> = self
            .nodes
            .values()
            .filter_map(|node| match node {
                TreeNode::Process(process) => Some(process.child_names()),
                TreeNode::Leaf(_) => None,
            })
            .flatten()
            .map(String::as_str)
            .collect();

        self.process_names()
            .into_iter()
            .filter(|name| !referenced.contains(name))
            .filter_map(|name| self.process(name).ok())
            .collect()
    }

    /// Legacy text definition of every root and everything below it
    pub fn to_legacy_config(&self) -> ProcessResult<String> {
        let mut session = RenderSession::new();
        let mut config = String::new();
        for root in self.root_nodes() {
            config.push_str(&session.render(root, self)?);
        }
        Ok(config)
    }
}

impl TreeContainer for ProcessTree {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn resolve(&self, name: &str) -> Option<NodeRef<'_>> {
        self.nodes.get(name).map(TreeNode::as_node_ref)
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn acceptable_states(&self) -> &[StateName] {
        &self.acceptable_states
    }
}
