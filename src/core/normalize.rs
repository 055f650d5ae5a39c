//! Tolerant JSON parsing
//!
//! Game configuration files are usually strict JSON, but hand-edited files
//! show up with single quotes, bare keys, trailing commas and comments. The
//! strict parser runs first; on failure a single repair pass rewrites the
//! text and the strict parser runs once more.

use super::error::ParseError;
use super::format::SETTINGS_KEY;
use super::schema::RECOGNIZED_SECTION_KEYS;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use regex::Regex;

/// Identifier-like key directly after `{` or `,` and before `:`
static BARE_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([{,]\s*)([A-Za-z0-9_]+)(\s*:)").expect("Invalid bare key regex")
});

static TRAILING_COMMA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("Invalid trailing comma regex"));

static LINE_COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("Invalid line comment regex"));

static BLOCK_COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("Invalid block comment regex"));

/// Whether a parsed tree looks like a game configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognition {
    Recognized,
    Unrecognized,
}

/// Parse raw file bytes. Content must be UTF-8 and not blank.
pub fn normalize_bytes(bytes: &[u8]) -> Result<Map<String, Value>, ParseError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ParseError::Malformed(format!("file is not valid UTF-8: {}", e)))?;

    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ParseError::Malformed("file is empty".to_string()));
    }

    normalize(text)
}

/// Parse text into a top-level object, repairing it once if needed.
pub fn normalize(raw: &str) -> Result<Map<String, Value>, ParseError> {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(strict_err) => {
            tracing::debug!("Strict parse failed, repairing: {}", strict_err);
            let repaired = repair(raw);
            serde_json::from_str::<Value>(&repaired)
                .map_err(|e| ParseError::Malformed(e.to_string()))?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NotAnObject),
    }
}

/// Apply the repair rewrites, in order. This is a text heuristic, not a
/// grammar: it can damage string contents such as apostrophes or URLs.
pub fn repair(raw: &str) -> String {
    let text = raw.strip_prefix('\u{FEFF}').unwrap_or(raw);
    let text = BARE_KEY_REGEX.replace_all(text, r#"${1}"${2}"${3}"#);
    let text = text.replace('\'', "\"");
    let text = TRAILING_COMMA_REGEX.replace_all(&text, "${1}");
    let text = LINE_COMMENT_REGEX.replace_all(&text, "");
    BLOCK_COMMENT_REGEX.replace_all(&text, "").into_owned()
}

/// Look for a known section key at the top level or under `settings`.
pub fn recognize(tree: &Map<String, Value>) -> Recognition {
    let has_known_key = |map: &Map<String, Value>| {
        RECOGNIZED_SECTION_KEYS
            .iter()
            .any(|key| map.contains_key(*key))
    };

    let wrapped = tree
        .get(SETTINGS_KEY)
        .and_then(Value::as_object)
        .is_some_and(has_known_key);

    if wrapped || has_known_key(tree) {
        Recognition::Recognized
    } else {
        Recognition::Unrecognized
    }
}
