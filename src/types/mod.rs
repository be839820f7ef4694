//! Shared data structures for the recommendation workflows
//!
//! - Soil samples and queries, validated and normalized at construction
//! - Request payloads and typed results for each prediction service

mod soil;
mod prediction;

pub use soil::*;
pub use prediction::*;
