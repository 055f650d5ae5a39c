//! Field accessor
//!
//! Reads return the stored value when it has the right type and the schema
//! default otherwise; they never clamp and never touch the document. Writes
//! validate, clamp numeric values into bounds, and create missing
//! containers.

use super::document::Document;
use super::error::{EditError, ValidationError};
use super::schema::{self, FieldKind, FieldSpec, FieldValue, Section};
use serde_json::Value;

/// Current value of `section.key`
pub fn read_field(doc: &Document, section: Section, key: &str) -> Result<FieldValue, EditError> {
    let spec = schema::spec_for(section, key)?;
    Ok(read_with_spec(doc, spec))
}

pub fn read_with_spec(doc: &Document, spec: &FieldSpec) -> FieldValue {
    let stored = doc
        .object_at(spec.section.path())
        .and_then(|section| section.get(spec.key));

    match stored {
        Some(value) => from_stored(&spec.kind, value).unwrap_or_else(|| {
            tracing::trace!(
                "{}.{} holds {}, using default",
                spec.section,
                spec.key,
                value
            );
            spec.default.clone()
        }),
        None => spec.default.clone(),
    }
}

/// Interpret a stored JSON value under `kind`, without range checks
fn from_stored(kind: &FieldKind, value: &Value) -> Option<FieldValue> {
    match kind {
        FieldKind::FloatRange { .. } => value.as_f64().map(FieldValue::Float),
        FieldKind::IntRange { .. } => as_integer(value).map(FieldValue::Int),
        FieldKind::Boolean => value.as_bool().map(FieldValue::Bool),
        FieldKind::Enum(_) => value.as_str().map(|s| FieldValue::Text(s.to_string())),
    }
}

/// Integers, and floats with no fractional part
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Validate `value` against `spec` and clamp it into range
pub fn coerce(spec: &FieldSpec, value: FieldValue) -> Result<FieldValue, ValidationError> {
    let mismatch = |found: &FieldValue| ValidationError::TypeMismatch {
        key: spec.key.to_string(),
        expected: spec.kind.describe(),
        found: found.to_string(),
    };

    match (&spec.kind, value) {
        (FieldKind::FloatRange { min, max, .. }, FieldValue::Float(v)) => {
            if !v.is_finite() {
                return Err(ValidationError::OutOfRange {
                    key: spec.key.to_string(),
                    value: v,
                });
            }
            Ok(FieldValue::Float(v.clamp(*min, *max)))
        }
        (FieldKind::FloatRange { min, max, .. }, FieldValue::Int(v)) => {
            Ok(FieldValue::Float((v as f64).clamp(*min, *max)))
        }
        (FieldKind::IntRange { min, max, .. }, FieldValue::Int(v)) => {
            Ok(FieldValue::Int(v.clamp(*min, *max)))
        }
        (FieldKind::IntRange { min, max, .. }, FieldValue::Float(v)) => {
            if !v.is_finite() {
                return Err(ValidationError::OutOfRange {
                    key: spec.key.to_string(),
                    value: v,
                });
            }
            if v.fract() != 0.0 {
                return Err(mismatch(&FieldValue::Float(v)));
            }
            // Saturating cast, then clamp into range
            Ok(FieldValue::Int((v as i64).clamp(*min, *max)))
        }
        (FieldKind::Boolean, FieldValue::Bool(v)) => Ok(FieldValue::Bool(v)),
        (FieldKind::Enum(options), FieldValue::Text(v)) => {
            if options.contains(&v.as_str()) {
                Ok(FieldValue::Text(v))
            } else {
                Err(ValidationError::InvalidEnumValue {
                    key: spec.key.to_string(),
                    value: v,
                    allowed: options.iter().map(|o| o.to_string()).collect(),
                })
            }
        }
        (_, other) => Err(mismatch(&other)),
    }
}

/// Parse user input text into a value of the field's kind
pub fn parse_input(spec: &FieldSpec, input: &str) -> Result<FieldValue, ValidationError> {
    let input = input.trim();
    let mismatch = || ValidationError::TypeMismatch {
        key: spec.key.to_string(),
        expected: spec.kind.describe(),
        found: input.to_string(),
    };

    match spec.kind {
        FieldKind::FloatRange { .. } => input
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| mismatch()),
        FieldKind::IntRange { .. } => input
            .parse::<i64>()
            .map(FieldValue::Int)
            .or_else(|_| input.parse::<f64>().map(FieldValue::Float))
            .map_err(|_| mismatch()),
        FieldKind::Boolean => input.parse::<bool>().map(FieldValue::Bool).map_err(|_| mismatch()),
        FieldKind::Enum(_) => Ok(FieldValue::Text(input.to_string())),
    }
}

/// Store `value` in `section.key` and return what was actually stored
pub fn write_field(
    doc: &mut Document,
    section: Section,
    key: &str,
    value: FieldValue,
) -> Result<FieldValue, EditError> {
    let spec = schema::spec_for(section, key)?;
    write_with_spec(doc, spec, value)
}

pub fn write_with_spec(
    doc: &mut Document,
    spec: &FieldSpec,
    value: FieldValue,
) -> Result<FieldValue, EditError> {
    let stored = coerce(spec, value)?;
    let path: Vec<&str> = spec.section.path().iter().copied().chain([spec.key]).collect();
    doc.set(&path, stored.to_json())?;
    Ok(stored)
}

pub fn reset_field_to_schema_default(
    doc: &mut Document,
    section: Section,
    key: &str,
) -> Result<FieldValue, EditError> {
    let spec = schema::spec_for(section, key)?;
    write_with_spec(doc, spec, spec.default.clone())
}

/// Every field of `section` with its current value, in display order
pub fn section_fields(doc: &Document, section: Section) -> Vec<(&'static FieldSpec, FieldValue)> {
    schema::registry()
        .fields(section)
        .iter()
        .map(|spec| (spec, read_with_spec(doc, spec)))
        .collect()
}

/// Reset every field of `section` if the section exists. Absent sections
/// stay absent. Returns whether anything was written.
pub fn reset_section(doc: &mut Document, section: Section) -> bool {
    if doc.object_at(section.path()).is_none() {
        return false;
    }

    let Ok(container) = doc.ensure_object(section.path()) else {
        return false;
    };
    for spec in schema::registry().fields(section) {
        container.insert(spec.key.to_string(), spec.default.to_json());
    }
    true
}
