//! Loose coercion of untrusted JSON values.
//!
//! Model and provider payloads are only loosely typed: a field documented as a
//! string may arrive as a number, an array of strings may contain `null`, a
//! numeric score may be a quoted string. These helpers turn any JSON value into
//! the scalar the caller asked for without ever failing, following the usual
//! JavaScript conversion rules (`String(x)` / `Number(x)`) that such payloads are
//! typically written against.

use serde_json::Value as JsonValue;

/// Convert any JSON value to a string.
///
/// `null` becomes the empty string, arrays are joined with `,`, objects become
/// `[object Object]`.
pub fn coerce_string(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(number_to_string).unwrap_or_default()
            }
        }
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(coerce_string)
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(_) => "[object Object]".to_string(),
    }
}

/// Render a float the way `String(x)` does: plain decimal digits, switching to
/// exponent form (`1e+21`, `1.5e-7`) outside `1e-6 <= |x| < 1e21`.
fn number_to_string(f: f64) -> String {
    let magnitude = f.abs();
    if f == 0.0 || (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }

    let rendered = format!("{:e}", f);
    match rendered.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => rendered,
    }
}

/// Convert any JSON value to a number.
///
/// Values with no numeric reading yield `NaN` instead of an error; callers
/// decide whether a non-finite result is acceptable.
pub fn coerce_number(value: &JsonValue) -> f64 {
    match value {
        JsonValue::Null => 0.0,
        JsonValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        JsonValue::String(s) => parse_numeric_str(s),
        JsonValue::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => parse_numeric_str(&coerce_string(single)),
            _ => f64::NAN,
        },
        JsonValue::Object(_) => f64::NAN,
    }
}

fn parse_numeric_str(raw: &str) -> f64 {
    let s = raw.trim();
    match s {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if radix_prefix(s).is_some() => parse_radix_literal(s),
        // Rust accepts "inf" and "nan" spellings that are not numeric text here.
        _ if s
            .chars()
            .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') =>
        {
            f64::NAN
        }
        _ => s.parse::<f64>().unwrap_or(f64::NAN),
    }
}

fn radix_prefix(s: &str) -> Option<u32> {
    match s.get(..2)? {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    }
}

/// Unsigned `0x` / `0o` / `0b` integer literal.
fn parse_radix_literal(s: &str) -> f64 {
    let (Some(radix), Some(digits)) = (radix_prefix(s), s.get(2..)) else {
        return f64::NAN;
    };
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
        })
        .unwrap_or(f64::NAN)
}

/// Read an optional JSON array as a list of trimmed, non-empty strings.
///
/// Anything that is not an array yields an empty list.
pub fn coerce_string_list(value: Option<&JsonValue>) -> Vec<String> {
    match value {
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| coerce_string(item).trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Return the prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
