//! Error types for the config document model.

use thiserror::Error;

/// Failure to turn raw file content into a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Neither the strict parse nor the repaired parse succeeded.
    #[error("error parsing configuration: {0}")]
    Malformed(String),

    /// The content parsed, but the top level is not a JSON object.
    #[error("configuration is not a JSON object")]
    NotAnObject,
}

/// A value rejected by a field's schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid value '{value}' for {key}; expected one of: {}", .allowed.join(", "))]
    InvalidEnumValue {
        key: String,
        value: String,
        allowed: Vec<String>,
    },

    /// Only raised for values that cannot be clamped (NaN, infinities).
    #[error("value {value} for {key} cannot be stored")]
    OutOfRange { key: String, value: f64 },

    #[error("{key} expects {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: String,
    },
}

/// The document's shape prevents a write.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    /// An intermediate segment exists but is not an object.
    #[error("cannot write below '{path}': existing value is not an object")]
    PathConflict { path: String },
}

/// Lookup failure in the schema registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("unknown field '{key}' in section {section}")]
    UnknownField { section: String, key: String },

    #[error("unknown marker relation: {0} (expected ally, enemy or platoon)")]
    UnknownRelation(String),

    #[error("unknown marker state: {0}")]
    UnknownLifecycle(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PresetError {
    #[error("no resolution preset at index {0}")]
    NotFound(usize),
}

/// Any failure of a mutating operation. The document is unchanged when one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Preset(#[from] PresetError),
}

/// Failure to encode a session back to bytes.
#[derive(Debug, Error)]
#[error("failed to serialize configuration: {0}")]
pub struct WriteError(#[from] pub serde_json::Error);
