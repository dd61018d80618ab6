//! Best-effort recovery of a JSON array from free-form model output.
//!
//! Extraction runs in two stages. [`parse_direct`] treats the whole (fence
//! stripped) text as JSON. When that fails, [`parse_embedded`] scans the text
//! for bracketed spans, preferring the first valid array that holds objects.

use serde_json::Value as JsonValue;
use tracing::debug;

/// Object keys under which a model sometimes nests the question array.
const WRAPPER_KEYS: [&str; 2] = ["questions", "quiz"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("response is empty")]
    Empty,
    #[error("response is JSON but not an array")]
    NotAnArray,
    #[error("invalid JSON: {0}")]
    Invalid(String),
    #[error("no JSON array found in response")]
    NoArrayFound,
}

/// Removes a surrounding Markdown code fence, with or without a language tag.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// First stage: the cleaned text is itself a JSON array (or an object
/// wrapping one).
pub fn parse_direct(text: &str) -> Result<Vec<JsonValue>, ExtractError> {
    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }
    let value: JsonValue =
        serde_json::from_str(text).map_err(|e| ExtractError::Invalid(e.to_string()))?;
    into_array(value)
}

/// Second stage: find an array embedded in surrounding prose. An array of
/// objects wins over an earlier array of scalars such as a bracketed `[2]`.
pub fn parse_embedded(text: &str) -> Result<Vec<JsonValue>, ExtractError> {
    let mut candidates = root_array_spans(text);
    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if start < end && !candidates.contains(&(start, end)) {
            candidates.push((start, end));
        }
    }

    let mut scalar_array = None;
    for (start, end) in candidates {
        let slice = &text[start..=end];
        match serde_json::from_str::<JsonValue>(slice) {
            Ok(JsonValue::Array(items)) if items.iter().any(JsonValue::is_object) => {
                debug!(start, end, "recovered embedded JSON array");
                return Ok(items);
            }
            Ok(JsonValue::Array(items)) => {
                debug!(start, end, "embedded array holds no objects, looking further");
                scalar_array.get_or_insert(items);
            }
            Ok(_) => continue,
            Err(e) => debug!(start, end, error = %e, "embedded candidate rejected"),
        }
    }
    scalar_array.ok_or(ExtractError::NoArrayFound)
}

/// Runs both stages on raw model output.
pub fn extract_array(raw: &str) -> Result<Vec<JsonValue>, ExtractError> {
    let cleaned = strip_code_fences(raw);
    match parse_direct(cleaned) {
        Ok(items) => Ok(items),
        Err(ExtractError::Empty) => Err(ExtractError::Empty),
        Err(direct_err) => {
            debug!(error = %direct_err, "direct parse failed, scanning for embedded array");
            parse_embedded(cleaned)
        }
    }
}

fn into_array(value: JsonValue) -> Result<Vec<JsonValue>, ExtractError> {
    match value {
        JsonValue::Array(items) => Ok(items),
        JsonValue::Object(mut map) => WRAPPER_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(JsonValue::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or(ExtractError::NotAnArray),
        _ => Err(ExtractError::NotAnArray),
    }
}

/// Byte spans (inclusive) of balanced top-level `[...]` groups, ignoring
/// brackets inside string literals.
fn root_array_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut stack: Vec<(usize, u8)> = Vec::new();
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match b {
                b'\\' => escape = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            // Quotes only matter once we're inside a bracketed group; prose
            // around the array may contain stray quote characters.
            b'"' if !stack.is_empty() => in_string = true,
            b'[' | b'{' => stack.push((i, b)),
            b']' | b'}' => {
                let open = if b == b']' { b'[' } else { b'{' };
                match stack.pop() {
                    Some((start, kind)) if kind == open => {
                        if stack.is_empty() && kind == b'[' {
                            spans.push((start, i));
                        }
                    }
                    Some(_) => stack.clear(),
                    None => {}
                }
            }
            _ => {}
        }
    }

    spans
}
