//! Shared utilities: error types and keypoint statistics.

pub mod error;
pub mod stats;

pub use error::{SweepError, SweepResult};
