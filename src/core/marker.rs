//! Vehicle marker matrix
//!
//! Marker visibility is configured per relation (ally, enemy, platoon) and
//! per lifecycle state, each cell holding the same five attributes:
//!
//! ```text
//! <section>."Vehicle Marker Settings".markerSettings
//!     .<relation>MarkerSettings.markerSettings.<State>
//!         { opacity, isEnabled, isNameEnabled, isHealthBarEnabled, isDistanceEnabled }
//! ```
//!
//! A cell that is missing any attribute reads as the built-in default for
//! the whole cell.

use super::document::Document;
use super::error::{EditError, SchemaError, ValidationError};
use super::schema::{self, MARKER_SECTION_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

const VEHICLE_MARKER_KEY: &str = "Vehicle Marker Settings";
const MARKER_SETTINGS_KEY: &str = "markerSettings";

pub const OPACITY_MIN: f64 = 0.0;
pub const OPACITY_MAX: f64 = 1.0;
pub const OPACITY_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Ally,
    Enemy,
    Platoon,
}

impl Relation {
    pub const ALL: [Relation; 3] = [Relation::Ally, Relation::Enemy, Relation::Platoon];

    pub fn name(self) -> &'static str {
        match self {
            Relation::Ally => "ally",
            Relation::Enemy => "enemy",
            Relation::Platoon => "platoon",
        }
    }

    /// Key of this relation's object, e.g. `allyMarkerSettings`
    pub fn settings_key(self) -> &'static str {
        match self {
            Relation::Ally => "allyMarkerSettings",
            Relation::Enemy => "enemyMarkerSettings",
            Relation::Platoon => "platoonMarkerSettings",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Relation {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relation::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SchemaError::UnknownRelation(s.to_string()))
    }
}

/// Lifecycle state of a marked vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    InDirectVisible,
    Dead,
    DeadHotKey,
    DeadInAiming,
    InDirectInvisible,
}

impl Lifecycle {
    pub const ALL: [Lifecycle; 5] = [
        Lifecycle::InDirectVisible,
        Lifecycle::Dead,
        Lifecycle::DeadHotKey,
        Lifecycle::DeadInAiming,
        Lifecycle::InDirectInvisible,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Lifecycle::InDirectVisible => "InDirectVisible",
            Lifecycle::Dead => "Dead",
            Lifecycle::DeadHotKey => "DeadHotKey",
            Lifecycle::DeadInAiming => "DeadInAiming",
            Lifecycle::InDirectInvisible => "InDirectInvisible",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Lifecycle {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lifecycle::ALL
            .into_iter()
            .find(|l| l.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| SchemaError::UnknownLifecycle(s.to_string()))
    }
}

/// One cell of the matrix. Field names serialize to the stored keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSet {
    pub opacity: f64,
    pub is_enabled: bool,
    pub is_name_enabled: bool,
    pub is_health_bar_enabled: bool,
    pub is_distance_enabled: bool,
}

impl AttributeSet {
    /// Stored keys of the boolean attributes, in display order
    pub const TOGGLE_KEYS: [&'static str; 4] = [
        "isEnabled",
        "isNameEnabled",
        "isHealthBarEnabled",
        "isDistanceEnabled",
    ];

    const fn new(
        opacity: f64,
        enabled: bool,
        name: bool,
        health_bar: bool,
        distance: bool,
    ) -> Self {
        Self {
            opacity,
            is_enabled: enabled,
            is_name_enabled: name,
            is_health_bar_enabled: health_bar,
            is_distance_enabled: distance,
        }
    }

    /// Boolean attributes paired with their stored keys
    pub fn toggles(&self) -> [(&'static str, bool); 4] {
        [
            (Self::TOGGLE_KEYS[0], self.is_enabled),
            (Self::TOGGLE_KEYS[1], self.is_name_enabled),
            (Self::TOGGLE_KEYS[2], self.is_health_bar_enabled),
            (Self::TOGGLE_KEYS[3], self.is_distance_enabled),
        ]
    }

    fn to_entries(self) -> [(&'static str, Value); 5] {
        [
            ("opacity", schema::number(self.opacity)),
            ("isEnabled", Value::Bool(self.is_enabled)),
            ("isNameEnabled", Value::Bool(self.is_name_enabled)),
            ("isHealthBarEnabled", Value::Bool(self.is_health_bar_enabled)),
            ("isDistanceEnabled", Value::Bool(self.is_distance_enabled)),
        ]
    }
}

/// Built-in attributes for a cell.
///
/// The game ships one default table per relation. The three tables are
/// currently identical, so `relation` does not change the result, but callers
/// still name the relation so a table that diverges later only touches this
/// function.
pub fn default_attributes(_relation: Relation, lifecycle: Lifecycle) -> AttributeSet {
    match lifecycle {
        Lifecycle::InDirectVisible => AttributeSet::new(1.0, true, true, true, true),
        Lifecycle::Dead => AttributeSet::new(0.5, true, false, false, false),
        Lifecycle::DeadHotKey => AttributeSet::new(0.7, true, true, false, false),
        Lifecycle::DeadInAiming => AttributeSet::new(0.3, false, false, false, false),
        Lifecycle::InDirectInvisible => AttributeSet::new(0.8, true, true, true, true),
    }
}

/// The full default matrix for one relation, as stored in the document
pub fn default_matrix(relation: Relation) -> Map<String, Value> {
    Lifecycle::ALL
        .into_iter()
        .map(|lifecycle| {
            let cell: Map<String, Value> = default_attributes(relation, lifecycle)
                .to_entries()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect();
            (lifecycle.key().to_string(), Value::Object(cell))
        })
        .collect()
}

/// Path to a relation's `markerSettings` object
fn matrix_path(relation: Relation) -> [&'static str; 5] {
    [
        MARKER_SECTION_KEY,
        VEHICLE_MARKER_KEY,
        MARKER_SETTINGS_KEY,
        relation.settings_key(),
        MARKER_SETTINGS_KEY,
    ]
}

fn cell_path(relation: Relation, lifecycle: Lifecycle) -> [&'static str; 6] {
    let [a, b, c, d, e] = matrix_path(relation);
    [a, b, c, d, e, lifecycle.key()]
}

/// Attributes of a cell, or the built-in default if the cell is absent or
/// incomplete. Stored opacity is returned as-is, without clamping.
pub fn read_marker(doc: &Document, relation: Relation, lifecycle: Lifecycle) -> AttributeSet {
    doc.get(&cell_path(relation, lifecycle))
        .filter(|node| node.is_object())
        .and_then(|node| AttributeSet::deserialize(node).ok())
        .unwrap_or_else(|| default_attributes(relation, lifecycle))
}

/// Store all attributes of a cell. Opacity is clamped to [0, 1]; other keys
/// already present in the cell are kept.
pub fn write_marker(
    doc: &mut Document,
    relation: Relation,
    lifecycle: Lifecycle,
    attrs: AttributeSet,
) -> Result<AttributeSet, EditError> {
    if !attrs.opacity.is_finite() {
        return Err(ValidationError::OutOfRange {
            key: "opacity".to_string(),
            value: attrs.opacity,
        }
        .into());
    }

    let stored = AttributeSet {
        opacity: attrs.opacity.clamp(OPACITY_MIN, OPACITY_MAX),
        ..attrs
    };

    let cell = doc.ensure_object(&cell_path(relation, lifecycle))?;
    for (key, value) in stored.to_entries() {
        cell.insert(key.to_string(), value);
    }
    Ok(stored)
}

/// Replace each present relation's matrix with the full default matrix.
///
/// This is a full replace: keys under a relation's `markerSettings` that are
/// not lifecycle states are dropped. Relations that are absent stay absent.
/// Returns the relations that were reset.
pub fn reset_markers(doc: &mut Document) -> Vec<Relation> {
    let mut reset = Vec::new();
    for relation in Relation::ALL {
        let path = matrix_path(relation);
        if doc.object_at(&path).is_none() {
            continue;
        }
        let (parents, last) = path.split_at(path.len() - 1);
        if let Ok(parent) = doc.ensure_object(parents) {
            parent.insert(last[0].to_string(), Value::Object(default_matrix(relation)));
            reset.push(relation);
        }
    }
    reset
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => Document::new(map),
            _ => panic!("fixture must be an object"),
        }
    }

    fn with_ally_matrix(matrix: Value) -> Document {
        doc(json!({
            MARKER_SECTION_KEY: {
                "Vehicle Marker Settings": {
                    "markerSettings": {
                        "allyMarkerSettings": {
                            "markerSettings": matrix,
                            "color": "green"
                        }
                    }
                }
            }
        }))
    }

    #[test]
    fn test_read_absent_uses_default() {
        let d = doc(json!({}));
        for relation in Relation::ALL {
            for lifecycle in Lifecycle::ALL {
                assert_eq!(
                    read_marker(&d, relation, lifecycle),
                    default_attributes(relation, lifecycle)
                );
            }
        }
    }

    #[test]
    fn test_read_complete_cell() {
        let d = with_ally_matrix(json!({
            "Dead": {
                "opacity": 0.9,
                "isEnabled": false,
                "isNameEnabled": true,
                "isHealthBarEnabled": true,
                "isDistanceEnabled": true,
                "extra": 1
            }
        }));
        let attrs = read_marker(&d, Relation::Ally, Lifecycle::Dead);
        assert_eq!(attrs, AttributeSet::new(0.9, false, true, true, true));
    }

    #[test]
    fn test_incomplete_cell_is_not_merged() {
        let d = with_ally_matrix(json!({
            "Dead": {
                "opacity": 0.9,
                "isEnabled": false,
                "isHealthBarEnabled": true,
                "isDistanceEnabled": true
            }
        }));
        assert_eq!(
            read_marker(&d, Relation::Ally, Lifecycle::Dead),
            default_attributes(Relation::Ally, Lifecycle::Dead)
        );
    }

    #[test]
    fn test_non_object_segment_uses_default() {
        let d = with_ally_matrix(json!("broken"));
        assert_eq!(
            read_marker(&d, Relation::Ally, Lifecycle::InDirectVisible),
            default_attributes(Relation::Ally, Lifecycle::InDirectVisible)
        );
    }

    #[test]
    fn test_write_creates_path_and_clamps() {
        let mut d = doc(json!({}));
        let stored = write_marker(
            &mut d,
            Relation::Platoon,
            Lifecycle::DeadHotKey,
            AttributeSet::new(1.5, false, false, true, false),
        )
        .unwrap();
        assert_eq!(stored.opacity, 1.0);
        assert_eq!(read_marker(&d, Relation::Platoon, Lifecycle::DeadHotKey), stored);
    }

    #[test]
    fn test_write_keeps_extra_cell_keys() {
        let mut d = with_ally_matrix(json!({"Dead": {"note": "keep"}}));
        write_marker(
            &mut d,
            Relation::Ally,
            Lifecycle::Dead,
            default_attributes(Relation::Ally, Lifecycle::Dead),
        )
        .unwrap();
        let mut path = cell_path(Relation::Ally, Lifecycle::Dead).to_vec();
        path.push("note");
        assert_eq!(d.get(&path), Some(&json!("keep")));
    }

    #[test]
    fn test_reset_replaces_whole_matrix() {
        let mut d = with_ally_matrix(json!({
            "Dead": {"opacity": 0.1},
            "undocumented": true
        }));
        let reset = reset_markers(&mut d);
        assert_eq!(reset, vec![Relation::Ally]);

        let matrix = d.get(&matrix_path(Relation::Ally)).unwrap();
        assert_eq!(matrix, &Value::Object(default_matrix(Relation::Ally)));
        assert!(matrix.get("undocumented").is_none());

        // Siblings of the matrix survive, other relations are not created
        let mut color = matrix_path(Relation::Ally)[..4].to_vec();
        color.push("color");
        assert_eq!(d.get(&color), Some(&json!("green")));
        assert!(d.get(&matrix_path(Relation::Enemy)).is_none());
    }

    #[test]
    fn test_relations_share_default_table() {
        for lifecycle in Lifecycle::ALL {
            let ally = default_attributes(Relation::Ally, lifecycle);
            assert_eq!(default_attributes(Relation::Enemy, lifecycle), ally);
            assert_eq!(default_attributes(Relation::Platoon, lifecycle), ally);
        }
        assert_eq!(default_matrix(Relation::Enemy), default_matrix(Relation::Platoon));
    }

    #[test]
    fn test_attribute_keys_match_document() {
        let attrs = default_attributes(Relation::Enemy, Lifecycle::Dead);
        let value = serde_json::to_value(attrs).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            ["opacity", "isEnabled", "isNameEnabled", "isHealthBarEnabled", "isDistanceEnabled"]
        );
    }
}
