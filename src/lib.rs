//! Business process status aggregation
//!
//! A business process is a named node combining the states of its children
//! (monitored hosts, services or other processes) with an operator: worst
//! of all, best of all, inverted worst, or the k-th best. Processes form a
//! directed acyclic graph owned by a [`ProcessTree`]; evaluation is lazy
//! and memoized per tree revision.
//!
//! ```
//! use businessprocess::{Observation, Operator, ProcessNode, ProcessTree, StateName};
//!
//! let mut tree = ProcessTree::new("shop");
//! let web = tree.add_host("web1").unwrap();
//! let db = tree.add_service("db1", "postgres").unwrap();
//! tree.observe(&db, Observation::new(StateName::Critical)).unwrap();
//! tree.add_process(ProcessNode::new("shop", Operator::And).unwrap().with_children([web, db]))
//!     .unwrap();
//!
//! assert_eq!(tree.process("shop").unwrap().state(&tree).unwrap(), StateName::Critical);
//! ```

pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use models::{
    LeafNode, MonitoredObject, NodeKind, Observation, Operator, ProblemTree, SeverityRank,
    StateCensus, StateName, StatusCode,
};
pub use services::{Evaluation, NodeRef, ProcessNode, ProcessTree, RenderSession, TreeContainer};
pub use utils::{ProcessError, ProcessResult};
