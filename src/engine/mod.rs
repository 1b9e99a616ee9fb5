//! Check engine.
//!
//! Provides target discovery, check orchestration and result aggregation.

pub mod discovery;
pub mod orchestrator;
pub mod result;
