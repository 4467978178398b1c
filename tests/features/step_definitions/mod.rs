//! Step definitions for Cucumber scenarios

pub mod tree_steps;
