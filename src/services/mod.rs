//! Process evaluation services

pub mod legacy_config;
pub mod memo;
pub mod process;
pub mod tree;

pub use legacy_config::RenderSession;
pub use process::{combine, Evaluation, ProcessNode};
pub use tree::{NodeRef, ProcessTree, TreeContainer};
