//! Integration tests for process trees
//!
//! These tests drive whole trees through the public API: evaluation,
//! summaries, drill-down, legacy rendering and concurrent readers.

mod census_tests;
mod property_tests;
