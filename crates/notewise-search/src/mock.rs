//! Mock retrieval backend for testing.
//!
//! Returns canned records (or a canned failure) and records every call's
//! parameters for assertion.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use notewise_core::{Error, Result, RetrievalBackend, RetrievalParams};

#[derive(Debug, Clone, Default)]
enum MockOutcome {
    #[default]
    Empty,
    Items(Vec<JsonValue>),
    Failure { message: String, details: JsonValue },
    Other(String),
}

/// Mock retrieval engine.
#[derive(Clone, Default)]
pub struct MockRetrievalBackend {
    outcome: Arc<MockOutcome>,
    calls: Arc<Mutex<Vec<RetrievalParams>>>,
}

impl MockRetrievalBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these records from every call.
    pub fn with_items(mut self, items: Vec<JsonValue>) -> Self {
        self.outcome = Arc::new(MockOutcome::Items(items));
        self
    }

    /// Fail every call with a retrieval error carrying `details`.
    pub fn failing(mut self, message: impl Into<String>, details: JsonValue) -> Self {
        self.outcome = Arc::new(MockOutcome::Failure {
            message: message.into(),
            details,
        });
        self
    }

    /// Fail every call with a non-retrieval error, as a misbehaving backend might.
    pub fn failing_with_internal(mut self, message: impl Into<String>) -> Self {
        self.outcome = Arc::new(MockOutcome::Other(message.into()));
        self
    }

    /// Parameters of all calls, in order.
    pub fn calls(&self) -> Vec<RetrievalParams> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RetrievalBackend for MockRetrievalBackend {
    async fn search_notes(&self, params: &RetrievalParams) -> Result<Vec<JsonValue>> {
        self.calls.lock().unwrap().push(params.clone());

        match self.outcome.as_ref() {
            MockOutcome::Empty => Ok(Vec::new()),
            MockOutcome::Items(items) => Ok(items.clone()),
            MockOutcome::Failure { message, details } => Err(Error::Retrieval {
                message: message.clone(),
                details: details.clone(),
            }),
            MockOutcome::Other(message) => Err(Error::Internal(message.clone())),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}
