//! Shared utilities

pub mod error;
pub mod natural;
pub mod validation;

pub use error::{ProcessError, ProcessResult};
