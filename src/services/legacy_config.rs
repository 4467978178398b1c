//! Legacy text definition writer
//!
//! Emits process definitions in the line-oriented format older definition
//! files use:
//!
//! ```text
//! backend = db1;postgres & db2;postgres
//! shop = 2 of: backend + web1;Hoststatus + web2;Hoststatus
//! display 1;shop;Web Shop
//! info_url;shop;https://wiki.example.com/shop
//! ```
//!
//! Sub processes are written before the process using them. A process
//! shared by several parents is written once, at its first occurrence.

use std::collections::HashSet;

use tracing::debug;

use crate::models::Operator;
use crate::services::process::ProcessNode;
use crate::services::tree::{NodeRef, TreeContainer};
use crate::utils::error::ProcessResult;

/// One rendering pass over a tree
///
/// Remembers which processes were already written so that a render of
/// several roots through the same session writes each process once.
#[derive(Debug, Default)]
pub struct RenderSession {
    rendered: HashSet<String>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_rendered(&self, name: &str) -> bool {
        self.rendered.contains(name)
    }

    /// Definition of `node` and every not yet written process below it
    pub fn render<C: TreeContainer + ?Sized>(
        &mut self,
        node: &ProcessNode,
        tree: &C,
    ) -> ProcessResult<String> {
        let mut config = String::new();
        if !self.rendered.insert(node.name().to_string()) {
            return Ok(config);
        }
        debug!("Rendering legacy definition of '{}'", node.name());

        let mut children = Vec::new();
        for child in node.child_nodes(tree)? {
            children.push(child.name());
            if self.is_rendered(child.name()) {
                continue;
            }
            if let NodeRef::Process(process) = child {
                config.push_str(&self.render(process, tree)?);
                config.push('\n');
            }
        }

        config.push_str(&definition_line(node, &children));

        if node.has_alias() || node.display() > 0 {
            config.push_str(&format!(
                "display {};{};{}\n",
                node.display(),
                node.name(),
                node.alias()
            ));
        }
        if let Some(url) = node.info_url() {
            config.push_str(&format!("info_url;{};{}\n", node.name(), url));
        }

        Ok(config)
    }
}

fn definition_line(node: &ProcessNode, children: &[&str]) -> String {
    let (eq, op) = match node.operator() {
        Operator::MinOf(k) => (format!("= {} of:", k), "+"),
        other => ("=".to_string(), other.join_symbol()),
    };

    let separator = format!(" {} ", op);
    let mut joined = children.join(separator.as_str());
    if children.len() < 2 && op != Operator::AND_SYMBOL {
        joined = format!("{} {}", op, joined);
    }

    format!("{} {} {}\n", node.name(), eq, joined)
}

impl ProcessNode {
    /// Legacy text definition of this process and everything below it
    pub fn to_legacy_config<C: TreeContainer + ?Sized>(&self, tree: &C) -> ProcessResult<String> {
        RenderSession::new().render(self, tree)
    }
}
