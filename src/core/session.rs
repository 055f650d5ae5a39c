//! Edit session
//!
//! One loaded configuration: the live document, a shadow copy of what was
//! loaded, and the shape needed to write it back.

use super::document::Document;
use super::error::{EditError, ParseError, WriteError};
use super::field;
use super::format::{self, Shape};
use super::marker::{self, AttributeSet, Lifecycle, Relation};
use super::normalize::{self, Recognition};
use super::presets::{self, ResolutionPreset};
use super::schema::{self, FieldSpec, FieldValue, Section};
use super::writer;
use std::path::{Path, PathBuf};

/// A schema field whose effective value differs from the loaded file
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub spec: &'static FieldSpec,
    pub loaded: FieldValue,
    pub current: FieldValue,
}

/// What `reset_all_to_schema_defaults` touched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResetSummary {
    pub sections: Vec<Section>,
    pub relations: Vec<Relation>,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    document: Document,
    loaded: Document,
    shape: Shape,
    recognition: Recognition,
    source: Option<PathBuf>,
}

impl EditSession {
    /// Parse and adapt raw file content. Nothing is built unless both steps
    /// succeed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let tree = normalize::normalize_bytes(bytes)?;
        let recognition = normalize::recognize(&tree);
        let (document, shape) = format::adapt(tree);

        tracing::info!(
            "Loaded configuration ({} bytes, {})",
            bytes.len(),
            if shape.is_wrapped() { "wrapped" } else { "bare" }
        );
        if recognition == Recognition::Unrecognized {
            tracing::warn!("No known settings sections found; file accepted as unrecognized");
        }

        Ok(Self {
            loaded: document.clone(),
            document,
            shape,
            recognition,
            source: None,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn recognition(&self) -> Recognition {
        self.recognition
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn section_fields(&self, section: Section) -> Vec<(&'static FieldSpec, FieldValue)> {
        field::section_fields(&self.document, section)
    }

    pub fn get_field(&self, section: Section, key: &str) -> Result<FieldValue, EditError> {
        field::read_field(&self.document, section, key)
    }

    pub fn set_field(
        &mut self,
        section: Section,
        key: &str,
        value: impl Into<FieldValue>,
    ) -> Result<FieldValue, EditError> {
        field::write_field(&mut self.document, section, key, value.into())
    }

    /// Parse `input` under the field's kind, then write it
    pub fn set_field_from_str(
        &mut self,
        section: Section,
        key: &str,
        input: &str,
    ) -> Result<FieldValue, EditError> {
        let spec = schema::spec_for(section, key)?;
        let value = field::parse_input(spec, input)?;
        field::write_with_spec(&mut self.document, spec, value)
    }

    pub fn reset_field(&mut self, section: Section, key: &str) -> Result<FieldValue, EditError> {
        field::reset_field_to_schema_default(&mut self.document, section, key)
    }

    /// Reset every present section to schema defaults and fully replace every
    /// present marker matrix. Absent sections are not created.
    pub fn reset_all_to_schema_defaults(&mut self) -> ResetSummary {
        let sections = Section::ALL
            .into_iter()
            .filter(|section| field::reset_section(&mut self.document, *section))
            .collect();
        let relations = marker::reset_markers(&mut self.document);

        let summary = ResetSummary { sections, relations };
        tracing::warn!(
            "Reset {} sections and {} marker matrices to defaults",
            summary.sections.len(),
            summary.relations.len()
        );
        summary
    }

    pub fn marker_read(&self, relation: Relation, lifecycle: Lifecycle) -> AttributeSet {
        marker::read_marker(&self.document, relation, lifecycle)
    }

    pub fn marker_write(
        &mut self,
        relation: Relation,
        lifecycle: Lifecycle,
        attrs: AttributeSet,
    ) -> Result<AttributeSet, EditError> {
        marker::write_marker(&mut self.document, relation, lifecycle, attrs)
    }

    pub fn resolution_presets(&self) -> Vec<ResolutionPreset> {
        presets::resolution_presets(&self.document)
    }

    pub fn set_resolution_preset(
        &mut self,
        index: usize,
        width: i64,
        height: i64,
    ) -> Result<(i64, i64), EditError> {
        presets::set_resolution_preset(&mut self.document, index, width, height)
    }

    pub fn serialize_for_save(&self) -> Result<Vec<u8>, WriteError> {
        writer::serialize(self)
    }

    pub fn is_modified(&self) -> bool {
        self.document != self.loaded
    }

    /// Discard all edits since load
    pub fn revert_to_loaded(&mut self) {
        self.document = self.loaded.clone();
    }

    /// Schema fields whose effective value changed since load
    pub fn changes(&self) -> Vec<FieldChange> {
        schema::registry()
            .iter()
            .filter_map(|spec| {
                let loaded = field::read_with_spec(&self.loaded, spec);
                let current = field::read_with_spec(&self.document, spec);
                (loaded != current).then_some(FieldChange {
                    spec,
                    loaded,
                    current,
                })
            })
            .collect()
    }
}

/// Holder for the single live session
#[derive(Debug, Default)]
pub struct Editor {
    session: Option<EditSession>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the live session with one built from `bytes`. On failure the
    /// previous session stays live.
    pub fn load(
        &mut self,
        bytes: &[u8],
        source: Option<PathBuf>,
    ) -> Result<&mut EditSession, ParseError> {
        let mut session = EditSession::from_bytes(bytes)?;
        session.source = source;
        Ok(self.session.insert(session))
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn close(&mut self) -> Option<EditSession> {
        self.session.take()
    }
}
