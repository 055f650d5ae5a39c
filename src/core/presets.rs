//! Fullscreen resolution presets
//!
//! `engine::WindowSettings.values` is a list of `{ key, value }` entries. Only
//! entries whose value holds a `"resolution fullscreen"` object are presets;
//! the rest are left alone.

use super::document::Document;
use super::error::{EditError, PresetError};
use super::field::as_integer;
use super::schema::WINDOW_SETTINGS_KEY;
use serde_json::Value;

const VALUES_KEY: &str = "values";
const RESOLUTION_KEY: &str = "resolution fullscreen";

pub const WIDTH_MIN: i64 = 800;
pub const WIDTH_MAX: i64 = 7680;
pub const HEIGHT_MIN: i64 = 600;
pub const HEIGHT_MAX: i64 = 4320;
pub const SIZE_STEP: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPreset {
    /// Position in the `values` list
    pub index: usize,
    pub label: String,
    pub width: i64,
    pub height: i64,
}

fn resolution(entry: &Value) -> Option<&serde_json::Map<String, Value>> {
    entry.get("value")?.get(RESOLUTION_KEY)?.as_object()
}

/// Presets in list order. A missing or non-integer dimension reads as its
/// minimum.
pub fn resolution_presets(doc: &Document) -> Vec<ResolutionPreset> {
    let Some(values) = doc
        .get(&[WINDOW_SETTINGS_KEY, VALUES_KEY])
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    values
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let size = resolution(entry)?;
            let label = entry
                .get("key")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Resolution Preset {}", index + 1));
            Some(ResolutionPreset {
                index,
                label,
                width: size.get("width").and_then(as_integer).unwrap_or(WIDTH_MIN),
                height: size.get("height").and_then(as_integer).unwrap_or(HEIGHT_MIN),
            })
        })
        .collect()
}

/// Set the size of an existing preset, clamping both dimensions. Returns
/// the stored `(width, height)`.
pub fn set_resolution_preset(
    doc: &mut Document,
    index: usize,
    width: i64,
    height: i64,
) -> Result<(i64, i64), EditError> {
    let size = doc
        .get_mut(&[WINDOW_SETTINGS_KEY, VALUES_KEY])
        .and_then(Value::as_array_mut)
        .and_then(|values| values.get_mut(index))
        .and_then(|entry| entry.get_mut("value"))
        .and_then(|value| value.get_mut(RESOLUTION_KEY))
        .and_then(Value::as_object_mut)
        .ok_or(PresetError::NotFound(index))?;

    let width = width.clamp(WIDTH_MIN, WIDTH_MAX);
    let height = height.clamp(HEIGHT_MIN, HEIGHT_MAX);
    size.insert("width".to_string(), Value::from(width));
    size.insert("height".to_string(), Value::from(height));
    Ok((width, height))
}
