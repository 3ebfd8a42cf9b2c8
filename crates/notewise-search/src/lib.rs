//! # notewise-search
//!
//! Hybrid search orchestration for notewise.
//!
//! A search combines an optional free-text query (embedded and matched by
//! vector similarity) with an optional tag filter, in a single call to the
//! retrieval engine. Tag-only searches never touch the embedding provider.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use notewise_search::{SearchOrchestrator, SearchQuery};
//!
//! let orchestrator = SearchOrchestrator::new(embedder, Arc::new(db.retrieval.clone()));
//!
//! let result = orchestrator
//!     .search(&SearchQuery::for_user(user_id).with_query("weekly plan").with_tag("Work"))
//!     .await?;
//! println!("{} notes", result.items.len());
//! ```

pub mod orchestrator;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use notewise_core::*;

pub use orchestrator::{resolve_limit, SearchOrchestrator};
