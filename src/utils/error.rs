//! Error types and handling
//!
//! Every fallible operation on a process tree returns [`ProcessResult`].
//! Configuration and resolution errors are never recovered locally: they
//! propagate up to whoever asked for the top-level status.

use thiserror::Error;

/// Process tree error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// Operator is not `&`, `|`, `!` or a positive integer
    #[error("Got invalid operator: {0}")]
    InvalidOperator(String),

    /// Node name cannot be used in a process definition
    #[error("Invalid node name: {0:?}")]
    InvalidName(String),

    /// Severity rank outside of the known range
    #[error("Invalid severity rank: {0}")]
    InvalidRank(u8),

    /// Packed status code carries bits we do not know
    #[error("Invalid status bits: {0:#06x}")]
    InvalidStatusBits(u16),

    /// Leaf observed in a state its object kind cannot have
    #[error("State {state} is not valid for {node}")]
    InvalidState { node: String, state: String },

    /// A child name that the tree container cannot resolve
    #[error("Process '{parent}' references unknown node '{child}'")]
    UnresolvedNode { parent: String, child: String },

    /// Lookup of a node that does not exist
    #[error("Node not found: {0}")]
    UnknownNode(String),

    /// Node exists but is a leaf where a process was required
    #[error("Node '{0}' is not a process")]
    NotAProcess(String),

    /// Node exists but is a process where a leaf was required
    #[error("Node '{0}' is not a host or service")]
    NotALeaf(String),

    /// Node name already taken in this tree
    #[error("Node already exists: {0}")]
    DuplicateNode(String),

    /// Process without children has no aggregate state
    #[error("Process '{0}' has no children")]
    EmptyProcess(String),

    /// `k of:` operator asking for more children than there are
    #[error("Process '{node}' requires {threshold} of {children} children")]
    ThresholdOutOfRange {
        node: String,
        threshold: u32,
        children: usize,
    },

    /// Node reached again while it is still being evaluated
    #[error("Dependency cycle through '{0}'")]
    DependencyCycle(String),

    /// Definition is locked for editing
    #[error("Process tree '{0}' is locked")]
    TreeLocked(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProcessError {
    /// Whether the error comes from a broken definition rather than a bad call
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            ProcessError::UnresolvedNode { .. }
                | ProcessError::EmptyProcess(_)
                | ProcessError::ThresholdOutOfRange { .. }
                | ProcessError::DependencyCycle(_)
        )
    }
}

/// Result type alias for process tree operations
pub type ProcessResult<T> = Result<T, ProcessError>;
