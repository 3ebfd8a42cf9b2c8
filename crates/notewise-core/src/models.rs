//! Core data models for notewise.
//!
//! These types are shared across all notewise crates. Every value here is
//! created per request and dropped once the response is sent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::coerce::coerce_string;
use crate::defaults;

// =============================================================================
// ANALYSIS TYPES
// =============================================================================

/// Overall tone of a note as judged by the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    /// Returns string representation of the sentiment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Resolve a model-supplied label, case-insensitively.
    ///
    /// Unknown labels resolve to [`Sentiment::Neutral`].
    pub fn from_loose(label: &str) -> Self {
        label.to_lowercase().parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Sentiment {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            _ => Err(format!("Invalid sentiment: {}", s)),
        }
    }
}

/// How the suggested content was produced from the note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Spelling and phrasing fixes only
    #[default]
    SuggestFix,
    /// Content expanded in the author's style
    AutoExpand,
    /// Content generated from the title alone
    TitleOnly,
}

impl AnalysisMode {
    /// Returns string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuggestFix => "suggest_fix",
            Self::AutoExpand => "auto_expand",
            Self::TitleOnly => "title_only",
        }
    }

    /// Resolve a model-supplied label. Matching is exact; anything else
    /// resolves to [`AnalysisMode::SuggestFix`].
    pub fn from_loose(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "suggest_fix" => Ok(Self::SuggestFix),
            "auto_expand" => Ok(Self::AutoExpand),
            "title_only" => Ok(Self::TitleOnly),
            _ => Err(format!("Invalid analysis mode: {}", s)),
        }
    }
}

/// Model-derived metadata attached to an analysed note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiMeta {
    pub keywords: Vec<String>,
    pub sentiment: Sentiment,
    /// Always within `1..=5`.
    pub importance: u8,
    pub mode: AnalysisMode,
    pub suggested_content: String,
}

impl Default for AiMeta {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            sentiment: Sentiment::default(),
            importance: defaults::IMPORTANCE_MIN,
            mode: AnalysisMode::default(),
            suggested_content: String::new(),
        }
    }
}

/// Structured analysis of a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteAnalysis {
    pub summary: String,
    pub tags: Vec<String>,
    #[serde(rename = "ai_meta")]
    pub meta: AiMeta,
}

// =============================================================================
// EMBEDDING TYPES
// =============================================================================

/// Embedding vector returned by the embedding provider.
///
/// Elements that the provider sent as non-numbers are kept as `NaN`, which
/// serializes to JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of elements that could not be read as numbers.
    pub fn nan_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_nan()).count()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Request body for embedding a single text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbedRequest {
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub text: Option<String>,
}

/// Response body carrying a single embedding.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedResponse {
    pub embedding: Embedding,
}

// =============================================================================
// ENRICHMENT TYPES
// =============================================================================

fn default_ui_mode() -> String {
    defaults::UI_MODE.to_string()
}

/// Accept any JSON scalar where a string is expected; `null` is absent.
fn deserialize_loose_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_null()).map(|v| coerce_string(&v)))
}

fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_loose_string(deserializer)?.unwrap_or_default())
}

fn deserialize_ui_mode<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_loose_string(deserializer)?.unwrap_or_else(default_ui_mode))
}

/// Request to analyse and embed a note.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub content: String,
    /// Editor UI mode forwarded to the prompt as a hint ("auto", "enhance", ...).
    #[serde(default = "default_ui_mode", deserialize_with = "deserialize_ui_mode")]
    pub mode: String,
}

impl Default for EnrichRequest {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            mode: default_ui_mode(),
        }
    }
}

impl EnrichRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Title and content joined by a blank line, skipping blank parts.
    ///
    /// Returns an empty string when both are blank.
    pub fn combined_text(&self) -> String {
        [self.title.as_str(), self.content.as_str()]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
            .trim()
            .to_string()
    }
}

/// Analysis plus embedding for one note.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedNote {
    #[serde(flatten)]
    pub analysis: NoteAnalysis,
    pub embedding: Embedding,
}

// =============================================================================
// SEARCH TYPES
// =============================================================================

/// Keep numeric JSON values, treat anything else as absent.
fn deserialize_loose_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

/// Hybrid search request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Free-text query; embedded when present.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub query: Option<String>,
    /// Tag filter; matched case-insensitively.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub tag: Option<String>,
    /// Owner of the notes to search. Required.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub user_id: Option<String>,
    /// Requested result count.
    #[serde(default, deserialize_with = "deserialize_loose_number")]
    pub limit: Option<f64>,
}

impl SearchQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_limit(mut self, limit: f64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Records returned by the retrieval engine, in the engine's order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub items: Vec<JsonValue>,
}

/// Arguments of the retrieval call.
///
/// Field names follow the `ai_search_notes` SQL function signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalParams {
    /// `None` for tag-only searches; never a zero vector.
    pub query_embedding: Option<Embedding>,
    #[serde(rename = "p_user_id")]
    pub user_id: String,
    pub match_count: i64,
    /// `None` when no tag filter applies; never an empty string.
    pub tag_filter: Option<String>,
}
