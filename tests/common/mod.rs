//! Common test utilities and helpers
//!
//! - Fixtures: a fixed, realistic process tree
//! - Factories: builders for ad-hoc trees

pub mod factories;
pub mod fixtures;

pub use factories::*;
pub use fixtures::*;
