//! # Voidline Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Template fixtures and template directories
//! - A render sink that records draw calls
//! - Reproducibility checks for sector runs
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
