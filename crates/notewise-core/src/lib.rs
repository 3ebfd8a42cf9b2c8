//! # notewise-core
//!
//! Core types, traits, and abstractions for notewise.
//!
//! This crate provides the data model shared by the enrichment pipeline and
//! the search orchestrator, the backend traits they are written against, and
//! the loose-value coercion helpers used to normalize untrusted model output.

pub mod coerce;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use coerce::{coerce_number, coerce_string, coerce_string_list, truncate_chars};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
