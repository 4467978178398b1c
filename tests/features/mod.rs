//! Cucumber features for process trees

pub mod step_definitions;

pub use support::TestWorld;
