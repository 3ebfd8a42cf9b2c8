//! Gemini API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// =============================================================================
// SHARED CONTENT TYPES
// =============================================================================

/// A piece of multi-part content sent to the model.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

/// A single text part.
#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

impl Content {
    /// Single text part without a role, as used by `embedContent`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// Single text part from the user, as used by `generateContent`.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }
}

// =============================================================================
// EMBEDDING TYPES
// =============================================================================

/// Request body for `models/{model}:embedContent`.
#[derive(Debug, Serialize)]
pub struct EmbedContentRequest {
    pub model: String,
    pub content: Content,
}

/// The two response shapes the embedding endpoint is known to return.
///
/// Variant order matters: the singular shape is tried first.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EmbedContentResponse {
    /// `{"embedding": {"values": [...]}}`
    Single { embedding: ContentEmbedding },
    /// `{"embeddings": [{"values": [...]}, ...]}`
    Batch { embeddings: Vec<ContentEmbedding> },
}

/// Raw embedding values. Elements are kept loose and coerced later.
#[derive(Debug, Deserialize)]
pub struct ContentEmbedding {
    pub values: Vec<JsonValue>,
}

impl EmbedContentResponse {
    /// The vector values, if any were returned.
    pub fn into_values(self) -> Option<Vec<JsonValue>> {
        match self {
            Self::Single { embedding } => Some(embedding.values),
            Self::Batch { embeddings } => embeddings.into_iter().next().map(|e| e.values),
        }
    }
}

// =============================================================================
// GENERATION TYPES
// =============================================================================

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// Response from `generateContent`. Only the fields we read are modelled.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, when non-empty.
    pub fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embed_request_serialization() {
        let request = EmbedContentRequest {
            model: "models/text-embedding-004".to_string(),
            content: Content::text("hello"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "models/text-embedding-004",
                "content": {"parts": [{"text": "hello"}]}
            })
        );
    }

    #[test]
    fn test_generate_request_serialization() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("prompt")],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"contents": [{"role": "user", "parts": [{"text": "prompt"}]}]})
        );
    }

    #[test]
    fn test_single_embedding_shape() {
        let response: EmbedContentResponse =
            serde_json::from_value(json!({"embedding": {"values": [0.1, 0.2]}})).unwrap();
        assert!(matches!(response, EmbedContentResponse::Single { .. }));
        assert_eq!(response.into_values().unwrap().len(), 2);
    }

    #[test]
    fn test_batch_embedding_shape_uses_first() {
        let response: EmbedContentResponse = serde_json::from_value(json!({
            "embeddings": [{"values": [1, 2, 3]}, {"values": [4]}]
        }))
        .unwrap();
        assert_eq!(response.into_values().unwrap(), vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_malformed_singular_falls_through_to_batch() {
        let response: EmbedContentResponse = serde_json::from_value(json!({
            "embedding": {"values": "oops"},
            "embeddings": [{"values": [9]}]
        }))
        .unwrap();
        assert_eq!(response.into_values().unwrap(), vec![json!(9)]);
    }

    #[test]
    fn test_unknown_embedding_shape_is_rejected() {
        let result = serde_json::from_value::<EmbedContentResponse>(json!({"data": []}));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_batch_has_no_values() {
        let response: EmbedContentResponse =
            serde_json::from_value(json!({"embeddings": []})).unwrap();
        assert!(response.into_values().is_none());
    }

    #[test]
    fn test_generate_response_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"summary\":\"s\"}"}]}}]
        }))
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("{\"summary\":\"s\"}"));
    }

    #[test]
    fn test_generate_response_without_text() {
        for body in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
            json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}),
        ] {
            let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
            assert!(response.into_text().is_none());
        }
    }
}
