//! Core module
//!
//! Config document model for the game's `coldwar.project` file: tolerant
//! parsing, schema-driven field access, marker matrix and faithful writing.
//! Nothing here touches the file system.

pub mod document;
pub mod error;
pub mod field;
pub mod format;
pub mod marker;
pub mod normalize;
pub mod presets;
pub mod schema;
pub mod session;
pub mod writer;

pub use document::Document;
pub use error::{
    EditError, ParseError, PresetError, SchemaError, StructureError, ValidationError, WriteError,
};
pub use format::Shape;
pub use marker::{AttributeSet, Lifecycle, Relation};
pub use normalize::Recognition;
pub use presets::ResolutionPreset;
pub use schema::{FieldKind, FieldSpec, FieldValue, Section};
pub use session::{EditSession, Editor, FieldChange, ResetSummary};

/// Build a session from raw file content
pub fn load_from_bytes(bytes: &[u8]) -> Result<EditSession, ParseError> {
    EditSession::from_bytes(bytes)
}

/// Encode a session for writing back to disk
pub fn serialize_for_save(session: &EditSession) -> Result<Vec<u8>, WriteError> {
    writer::serialize(session)
}
