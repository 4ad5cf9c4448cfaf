//! # Voidline Development Tools
//!
//! Command-line tools for development:
//! - Template validation
//! - Template authoring
//! - Headless sector runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod simulate;
pub mod templates;
pub mod validate;

pub use error::{Result, ToolError};
