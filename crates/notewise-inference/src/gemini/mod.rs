//! Gemini inference backend.
//!
//! Talks to the Generative Language REST API:
//!
//! - `models/{model}:embedContent` for embeddings, accepting both the
//!   singular (`embedding.values`) and batch (`embeddings[].values`) shapes
//! - `models/{model}:generateContent` for single-prompt text generation
//!
//! # Example
//!
//! ```rust,no_run
//! use notewise_inference::gemini::{GeminiBackend, GeminiConfig};
//! use notewise_core::EmbeddingBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables
//!     let backend = GeminiBackend::from_env().unwrap();
//!
//!     // Or with custom config
//!     let config = GeminiConfig {
//!         timeout_seconds: Some(30),
//!         ..GeminiConfig::with_api_key("my-key")
//!     };
//!     let backend = GeminiBackend::new(config).unwrap();
//!
//!     let vector = backend.embed("Hello, world!").await.unwrap();
//!     println!("{} dimensions", vector.len());
//! }
//! ```

mod backend;
mod types;

pub use backend::{qualify_model_name, GeminiBackend, GeminiConfig};
pub use types::*;
