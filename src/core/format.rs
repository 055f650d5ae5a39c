//! Format adapter
//!
//! Newer game builds wrap the settings in a top-level `settings` object;
//! older ones store them at the root. The shape found at load time is kept
//! so the writer can reproduce it.

use super::document::Document;
use serde_json::{Map, Value};

pub const SETTINGS_KEY: &str = "settings";

/// Top-level layout of a loaded file
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Shape {
    /// The settings tree is the root itself
    #[default]
    Bare,
    /// `{ ..before, "settings": {..}, ..after }`. Sibling keys are kept
    /// verbatim, split around the wrapper so its position is reproduced.
    Wrapped {
        before: Map<String, Value>,
        after: Map<String, Value>,
    },
}

impl Shape {
    pub fn is_wrapped(&self) -> bool {
        matches!(self, Shape::Wrapped { .. })
    }

    /// Top-level keys stored beside the `settings` wrapper
    pub fn extra_keys(&self) -> Vec<&str> {
        match self {
            Shape::Bare => Vec::new(),
            Shape::Wrapped { before, after } => before
                .keys()
                .chain(after.keys())
                .map(String::as_str)
                .collect(),
        }
    }
}

/// Split a parsed tree into the settings document and its shape
pub fn adapt(tree: Map<String, Value>) -> (Document, Shape) {
    let wrapped = tree.get(SETTINGS_KEY).is_some_and(Value::is_object);
    if !wrapped {
        return (Document::new(tree), Shape::Bare);
    }

    let mut before = Map::new();
    let mut after = Map::new();
    let mut settings = Map::new();
    let mut seen = false;

    for (key, value) in tree {
        match value {
            Value::Object(map) if key == SETTINGS_KEY => {
                settings = map;
                seen = true;
            }
            value if seen => {
                after.insert(key, value);
            }
            value => {
                before.insert(key, value);
            }
        }
    }

    (Document::new(settings), Shape::Wrapped { before, after })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_bare() {
        let (doc, shape) = adapt(tree(json!({"cw::AimingProjectSettings": {}})));
        assert_eq!(shape, Shape::Bare);
        assert!(doc.root().contains_key("cw::AimingProjectSettings"));
    }

    #[test]
    fn test_wrapped_keeps_siblings_in_place() {
        let (doc, shape) = adapt(tree(json!({
            "version": 3,
            "settings": {"FrameLimiterSettings": {}},
            "meta": {"author": "x"}
        })));
        assert!(doc.root().contains_key("FrameLimiterSettings"));
        assert_eq!(
            shape,
            Shape::Wrapped {
                before: tree(json!({"version": 3})),
                after: tree(json!({"meta": {"author": "x"}})),
            }
        );
        assert_eq!(shape.extra_keys(), ["version", "meta"]);
    }

    #[test]
    fn test_non_object_settings_is_bare() {
        let (doc, shape) = adapt(tree(json!({"settings": "none", "a": 1})));
        assert_eq!(shape, Shape::Bare);
        assert_eq!(doc.get(&["settings"]), Some(&json!("none")));
    }
}
