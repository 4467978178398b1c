//! Process nodes: status aggregation over child nodes
//!
//! A [`ProcessNode`] only knows the names of its children. Every query
//! resolves them through a [`TreeContainer`], registers itself as their
//! parent and memoizes the outcome. Memoized values are stamped with the
//! tree revision and the node's child-set version, so mutating the tree or
//! the node itself makes the next query recompute.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    NodeCore, NodeKind, Operator, ProblemBranch, ProblemTree, SeverityRank, StateCensus,
    StateName, StatusCode,
};
use crate::services::memo::{CacheStamp, EvaluationGuard, Memo};
use crate::services::tree::{NodeRef, TreeContainer};
use crate::utils::error::{ProcessError, ProcessResult};
use crate::utils::natural::natural_sort;
use crate::utils::validation::ensure_process_name;

/// Aggregated state of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub state: StateName,
    pub status: StatusCode,
    /// Most recent state change among the children
    pub last_state_change: Option<DateTime<Utc>>,
}

/// Combine child statuses with `operator`
///
/// Ties keep the earliest status in `statuses`, so the flags of the first
/// child holding the selected rank are carried forward. Returns `None` when
/// there is nothing to select: no statuses at all, or a threshold larger
/// than the number of statuses.
pub fn combine(operator: Operator, statuses: &[StatusCode]) -> Option<StatusCode> {
    match operator {
        Operator::And => worst(statuses),
        Operator::Or => best(statuses),
        Operator::Not => worst(statuses).map(|status| status.inverted()),
        Operator::MinOf(k) => {
            let mut sorted = statuses.to_vec();
            // stable, equal ranks stay in child order
            sorted.sort_by_key(|status| status.rank());
            sorted.get(k.get() as usize - 1).copied()
        }
    }
}

fn worst(statuses: &[StatusCode]) -> Option<StatusCode> {
    statuses
        .iter()
        .copied()
        .reduce(|worst, status| if status.rank() > worst.rank() { status } else { worst })
}

fn best(statuses: &[StatusCode]) -> Option<StatusCode> {
    statuses
        .iter()
        .copied()
        .reduce(|best, status| if status.rank() < best.rank() { status } else { best })
}

/// A composite node deriving its state from its children
#[derive(Debug)]
pub struct ProcessNode {
    core: NodeCore,
    operator: Operator,
    /// Sorted and free of duplicates
    child_names: Vec<String>,
    child_set_version: u64,
    alias: Option<String>,
    display: u32,
    info_url: Option<String>,
    info_command: Option<String>,
    children: Memo<Arc<[String]>>,
    evaluation: Memo<Evaluation>,
    census: Memo<StateCensus>,
    missing: Memo<bool>,
    acyclic: Memo<()>,
}

impl ProcessNode {
    /// Create a process without children
    pub fn new(name: impl Into<String>, operator: Operator) -> ProcessResult<Self> {
        let name = name.into();
        ensure_process_name(&name)?;
        Ok(Self {
            core: NodeCore::new(name),
            operator,
            child_names: Vec::new(),
            child_set_version: 0,
            alias: None,
            display: 0,
            info_url: None,
            info_command: None,
            children: Memo::default(),
            evaluation: Memo::default(),
            census: Memo::default(),
            missing: Memo::default(),
            acyclic: Memo::default(),
        })
    }

    /// Create a process from its textual operator and child names
    pub fn from_definition<I, S>(name: impl Into<String>, operator: &str, children: I) -> ProcessResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut node = Self::new(name, operator.parse()?)?;
        node.set_child_names(children);
        Ok(node)
    }

    /// Builder variant of [`ProcessNode::set_child_names`]
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_child_names(children);
        self
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn core(&self) -> &NodeCore {
        &self.core
    }

    /// Processes known to reference this one
    pub fn parents(&self) -> Vec<String> {
        self.core.parents()
    }

    // ==================== Definition ====================

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
        self.child_set_version += 1;
    }

    /// Assign an operator given in its textual form
    ///
    /// Invalid operators fail here, never later during evaluation.
    pub fn set_operator_str(&mut self, operator: &str) -> ProcessResult<()> {
        let operator = operator.parse()?;
        self.set_operator(operator);
        Ok(())
    }

    pub fn child_names(&self) -> &[String] {
        &self.child_names
    }

    /// Replace the child set
    ///
    /// Children that are dropped keep their back-reference to this node;
    /// go through the owning tree to have those cleaned up.
    pub fn set_child_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        self.child_names = names;
        self.child_set_version += 1;
        self.children.clear();
    }

    /// Drop every memoized value
    pub fn invalidate(&mut self) {
        self.children.clear();
        self.evaluation.clear();
        self.census.clear();
        self.missing.clear();
        self.acyclic.clear();
    }

    pub fn has_alias(&self) -> bool {
        self.alias.is_some()
    }

    /// Alias for display, underscores shown as spaces, or the node name
    pub fn alias(&self) -> String {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias.replace('_', " "),
            _ => self.name().to_string(),
        }
    }

    pub fn raw_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = Some(alias.into());
    }

    pub fn display(&self) -> u32 {
        self.display
    }

    pub fn set_display(&mut self, display: u32) {
        self.display = display;
    }

    pub fn has_info_url(&self) -> bool {
        self.info_url.is_some()
    }

    pub fn info_url(&self) -> Option<&str> {
        self.info_url.as_deref()
    }

    pub fn set_info_url(&mut self, url: impl Into<String>) {
        self.info_url = Some(url.into());
    }

    pub fn has_info_command(&self) -> bool {
        self.info_command.is_some()
    }

    pub fn info_command(&self) -> Option<&str> {
        self.info_command.as_deref()
    }

    pub fn set_info_command(&mut self, command: impl Into<String>) {
        self.info_command = Some(command.into());
    }

    // ==================== Children ====================

    fn stamp<C: TreeContainer + ?Sized>(&self, tree: &C) -> CacheStamp {
        CacheStamp {
            revision: tree.revision(),
            child_set: self.child_set_version,
        }
    }

    /// Child names in natural order, each verified to resolve
    pub fn children<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<Arc<[String]>> {
        self.children
            .get_or_try_init(self.stamp(tree), self.name(), "children", || {
                let mut names = self.child_names.clone();
                natural_sort(&mut names);
                for name in &names {
                    let child = tree.resolve(name).ok_or_else(|| {
                        warn!(
                            "Process '{}' in '{}' references unknown node '{}'",
                            self.name(),
                            tree.name(),
                            name
                        );
                        ProcessError::UnresolvedNode {
                            parent: self.name().to_string(),
                            child: name.clone(),
                        }
                    })?;
                    child.core().add_parent(self.name());
                }
                Ok(Arc::from(names))
            })
    }

    /// Resolved children in natural order
    pub fn child_nodes<'t, C: TreeContainer + ?Sized>(
        &self,
        tree: &'t C,
    ) -> ProcessResult<Vec<NodeRef<'t>>> {
        self.children(tree)?
            .iter()
            .map(|name| {
                tree.resolve(name).ok_or_else(|| ProcessError::UnresolvedNode {
                    parent: self.name().to_string(),
                    child: name.clone(),
                })
            })
            .collect()
    }

    /// Fail with `DependencyCycle` if a process below refers back to its path
    ///
    /// Only child names are walked, no other memoized value is locked. The
    /// outermost query checks its whole subtree, nested queries skip it.
    fn ensure_acyclic<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<()> {
        if EvaluationGuard::is_nested() {
            return Ok(());
        }
        self.acyclic
            .get_or_try_init(self.stamp(tree), self.name(), "cycle check", || {
                find_cycle(self, tree, &mut Vec::new(), &mut HashSet::new())
            })
    }

    // ==================== State ====================

    /// Aggregated state, computed once per tree revision
    pub fn evaluate<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<Evaluation> {
        self.ensure_acyclic(tree)?;
        let _guard = EvaluationGuard::enter(&self.evaluation, self.name())?;
        self.evaluation
            .get_or_try_init(self.stamp(tree), self.name(), "state", || self.calculate(tree))
    }

    fn calculate<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<Evaluation> {
        let children = self.child_nodes(tree)?;

        let mut statuses = Vec::with_capacity(children.len());
        let mut last_state_change: Option<DateTime<Utc>> = None;
        for child in &children {
            statuses.push(child.status(tree)?);
            last_state_change = last_state_change.max(child.last_state_change(tree)?);
        }

        let status = match combine(self.operator, &statuses) {
            Some(status) => status,
            None if statuses.is_empty() => {
                warn!("Process '{}' in '{}' has no children", self.name(), tree.name());
                return Err(ProcessError::EmptyProcess(self.name().to_string()));
            }
            None => {
                let threshold = match self.operator {
                    Operator::MinOf(k) => k.get(),
                    _ => 0,
                };
                warn!(
                    "Process '{}' in '{}' needs {} of only {} children",
                    self.name(),
                    tree.name(),
                    threshold,
                    statuses.len()
                );
                return Err(ProcessError::ThresholdOutOfRange {
                    node: self.name().to_string(),
                    threshold,
                    children: statuses.len(),
                });
            }
        };

        let state = StateName::from_rank(status.rank());
        debug!(
            "Process '{}' ({}) evaluated to {} from {} children",
            self.name(),
            self.operator.label(),
            state,
            statuses.len()
        );

        Ok(Evaluation {
            state,
            status,
            last_state_change,
        })
    }

    pub fn state<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<StateName> {
        Ok(self.evaluate(tree)?.state)
    }

    pub fn status<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<StatusCode> {
        Ok(self.evaluate(tree)?.status)
    }

    pub fn last_state_change<C: TreeContainer + ?Sized>(
        &self,
        tree: &C,
    ) -> ProcessResult<Option<DateTime<Utc>>> {
        Ok(self.evaluate(tree)?.last_state_change)
    }

    pub fn in_downtime<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<bool> {
        Ok(self.status(tree)?.in_downtime())
    }

    pub fn is_acknowledged<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<bool> {
        Ok(self.status(tree)?.is_acknowledged())
    }

    /// Whether the aggregated state itself is WARNING or worse
    pub fn is_problem<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<bool> {
        Ok(self.status(tree)?.rank() >= SeverityRank::WARNING)
    }

    /// True iff there are children and every one of them is missing
    pub fn is_missing<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<bool> {
        self.ensure_acyclic(tree)?;
        let _guard = EvaluationGuard::enter(&self.missing, self.name())?;
        self.missing
            .get_or_try_init(self.stamp(tree), self.name(), "missing", || {
                let children = self.child_nodes(tree)?;
                if children.is_empty() {
                    return Ok(false);
                }
                for child in &children {
                    if !child.is_missing(tree)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            })
    }

    // ==================== Summaries ====================

    /// Leaf count per state over every reachable leaf
    ///
    /// Leaves shared by several sub processes are counted once per path.
    pub fn state_census<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<StateCensus> {
        self.ensure_acyclic(tree)?;
        let _guard = EvaluationGuard::enter(&self.census, self.name())?;
        self.census
            .get_or_try_init(self.stamp(tree), self.name(), "state summary", || {
                let mut census = StateCensus::new();
                for child in self.child_nodes(tree)? {
                    match child {
                        NodeRef::Process(process) => census += &process.state_census(tree)?,
                        NodeRef::Leaf(leaf) => census.record(leaf.state_name()),
                    }
                }
                Ok(census)
            })
    }

    /// Whether this process or any leaf below it needs attention
    pub fn has_problems<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<bool> {
        if self.is_problem(tree)? {
            return Ok(true);
        }
        Ok(self
            .state_census(tree)?
            .has_problems(tree.acceptable_states()))
    }

    /// Direct children that are problems or hide problems below them
    pub fn problematic_children<'t, C: TreeContainer + ?Sized>(
        &self,
        tree: &'t C,
    ) -> ProcessResult<Vec<NodeRef<'t>>> {
        let mut problems = Vec::new();
        for child in self.child_nodes(tree)? {
            let problematic = match child {
                NodeRef::Leaf(leaf) => leaf.is_problem(),
                NodeRef::Process(process) => process.has_problems(tree)?,
            };
            if problematic {
                problems.push(child);
            }
        }
        Ok(problems)
    }

    /// Nested view of every problematic path below this process
    pub fn problem_tree<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<ProblemTree> {
        let mut problems = ProblemTree::new();
        for child in self.problematic_children(tree)? {
            let children = match child {
                NodeRef::Process(process) => process.problem_tree(tree)?,
                NodeRef::Leaf(_) => ProblemTree::new(),
            };
            problems.push(ProblemBranch {
                node: child.name().to_string(),
                label: child.label(),
                kind: child.kind(),
                state: child.state_name(tree)?,
                children,
            });
        }
        Ok(problems)
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::Process
    }
}

/// Depth-first walk over process child names
///
/// `path` holds the processes on the current branch, `cleared` those whose
/// subtree is already known to be free of cycles. Unknown names are left
/// to child resolution to report.
fn find_cycle<'a, C: TreeContainer + ?Sized>(
    process: &'a ProcessNode,
    tree: &'a C,
    path: &mut Vec<&'a str>,
    cleared: &mut HashSet<&'a str>,
) -> ProcessResult<()> {
    let name = process.name();
    if cleared.contains(name) {
        return Ok(());
    }
    if path.contains(&name) {
        warn!(
            "Process '{}' in '{}' depends on itself: {} -> {}",
            name,
            tree.name(),
            path.join(" -> "),
            name
        );
        return Err(ProcessError::DependencyCycle(name.to_string()));
    }

    path.push(name);
    for child in process.child_names() {
        if let Some(NodeRef::Process(child)) = tree.resolve(child) {
            find_cycle(child, tree, path, cleared)?;
        }
    }
    path.pop();
    cleared.insert(name);
    Ok(())
}
