//! Integration tests for scl-lint.
//!
//! These tests run the checks against temporary source trees.

pub mod cli_tests;
pub mod full_run_tests;
