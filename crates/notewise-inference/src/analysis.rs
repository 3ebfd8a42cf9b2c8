//! Note analysis extraction.
//!
//! Turns the raw text completion of the analysis prompt into a [`NoteAnalysis`].
//! The model is a best-effort text generator: the completion may be wrapped in
//! a code fence, surrounded by prose, or not JSON at all. Extraction never
//! fails. When no JSON object can be recovered, a deterministic record built
//! from the note itself is returned so the user's text is never lost.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace, warn};

use notewise_core::defaults::{ELLIPSIS, FALLBACK_SUMMARY_CHARS, IMPORTANCE_MAX, IMPORTANCE_MIN};
use notewise_core::{
    coerce_number, coerce_string, coerce_string_list, truncate_chars, AiMeta, AnalysisMode,
    NoteAnalysis, Sentiment,
};

/// Opening code fence with an optional language tag.
static OPENING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```[a-zA-Z]*\n?").unwrap());

const FENCE: &str = "```";

/// Where an extracted analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Fields were read from the model's JSON.
    Model,
    /// The model output was unusable; the record was built from the note.
    Fallback,
}

/// Extract a [`NoteAnalysis`] from a raw model completion.
///
/// `original_text` is the note text the model was asked to analyse; it backs
/// the fallback record.
pub fn extract(raw_model_text: &str, original_text: &str) -> NoteAnalysis {
    extract_with_source(raw_model_text, original_text).0
}

/// Like [`extract`], also reporting whether the fallback path was taken.
pub fn extract_with_source(
    raw_model_text: &str,
    original_text: &str,
) -> (NoteAnalysis, ExtractionSource) {
    trace!(raw = raw_model_text, "Extracting analysis from model output");

    let cleaned = strip_code_fence(raw_model_text);
    let candidate = json_object_range(cleaned);

    match serde_json::from_str::<JsonValue>(candidate) {
        Ok(JsonValue::Object(fields)) => {
            debug!(
                subsystem = "inference",
                component = "analysis",
                op = "extract",
                fallback = false,
                "Parsed model analysis"
            );
            (normalize(&fields), ExtractionSource::Model)
        }
        Ok(other) => {
            warn!(
                subsystem = "inference",
                component = "analysis",
                op = "extract",
                fallback = true,
                json_type = json_type_name(&other),
                "Model analysis is not a JSON object, using fallback"
            );
            (fallback_analysis(original_text), ExtractionSource::Fallback)
        }
        Err(e) => {
            warn!(
                subsystem = "inference",
                component = "analysis",
                op = "extract",
                fallback = true,
                error = %e,
                "Model analysis is not valid JSON, using fallback"
            );
            (fallback_analysis(original_text), ExtractionSource::Fallback)
        }
    }
}

/// Deterministic analysis built from the note text alone.
///
/// The summary is the first characters of the note, with an ellipsis only when
/// something was cut; the full note becomes the suggested content.
pub fn fallback_analysis(original_text: &str) -> NoteAnalysis {
    let head = truncate_chars(original_text, FALLBACK_SUMMARY_CHARS);
    let summary = if head.len() < original_text.len() {
        format!("{}{}", head, ELLIPSIS)
    } else {
        head.to_string()
    };

    NoteAnalysis {
        summary,
        tags: Vec::new(),
        meta: AiMeta {
            keywords: Vec::new(),
            sentiment: Sentiment::Neutral,
            importance: IMPORTANCE_MIN,
            mode: AnalysisMode::SuggestFix,
            suggested_content: original_text.to_string(),
        },
    }
}

/// Remove a surrounding markdown code fence, if the text starts with one.
fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    if !text.starts_with(FENCE) {
        return text;
    }

    let body = match OPENING_FENCE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    let body = body.strip_suffix(FENCE).unwrap_or(body);
    body.trim()
}

/// Narrow the text to the span between the first `{` and the last `}`.
///
/// Recovers a JSON object embedded in prose. Text without such a span is
/// returned unchanged.
fn json_object_range(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(open), Some(close)) if close > open => &text[open..=close],
        _ => text,
    }
}

fn normalize(fields: &Map<String, JsonValue>) -> NoteAnalysis {
    let summary = present(fields.get("summary"))
        .map(coerce_string)
        .unwrap_or_default();
    let tags = coerce_string_list(fields.get("tags"));

    let meta = fields.get("ai_meta").and_then(JsonValue::as_object);
    let meta_field = |name: &str| meta.and_then(|m| present(m.get(name)));

    let keywords = coerce_string_list(meta.and_then(|m| m.get("keywords")));

    let sentiment = meta_field("sentiment")
        .map(|v| Sentiment::from_loose(&coerce_string(v)))
        .unwrap_or_default();

    let importance = normalize_importance(meta_field("importance").map(coerce_number));

    let mode = meta_field("mode")
        .map(|v| AnalysisMode::from_loose(&coerce_string(v)))
        .unwrap_or_default();

    let suggested_content = meta_field("suggested_content")
        .map(coerce_string)
        .unwrap_or_default();

    NoteAnalysis {
        summary,
        tags,
        meta: AiMeta {
            keywords,
            sentiment,
            importance,
            mode,
            suggested_content,
        },
    }
}

/// Missing and `null` fields are treated alike.
fn present(value: Option<&JsonValue>) -> Option<&JsonValue> {
    value.filter(|v| !v.is_null())
}

/// Round to the nearest integer within the importance range.
/// Missing or non-finite scores become the minimum.
fn normalize_importance(score: Option<f64>) -> u8 {
    let score = score
        .filter(|s| s.is_finite())
        .unwrap_or(IMPORTANCE_MIN as f64);
    score
        .round()
        .clamp(IMPORTANCE_MIN as f64, IMPORTANCE_MAX as f64) as u8
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
