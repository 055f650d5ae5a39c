//! Settings document tree
//!
//! An ordered JSON object with path-based access. Key order is the load
//! order; keys created by edits are appended.

use super::error::StructureError;
use serde_json::{Map, Value};

/// The settings tree being edited
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    pub fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Value at `path`, or `None` if any segment is absent or a parent is
    /// not an object.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        self.object_at(parents)?.get(*last)
    }

    pub fn get_mut(&mut self, path: &[&str]) -> Option<&mut Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.get_mut(*first)?;
        for segment in rest {
            current = current.as_object_mut()?.get_mut(*segment)?;
        }
        Some(current)
    }

    /// Object at `path`. The empty path is the root itself.
    pub fn object_at(&self, path: &[&str]) -> Option<&Map<String, Value>> {
        let mut current = &self.root;
        for segment in path {
            current = current.get(*segment)?.as_object()?;
        }
        Some(current)
    }

    /// Check that every existing segment of `path` is an object, so that
    /// [`Document::ensure_object`] cannot fail halfway.
    pub fn check_path(&self, path: &[&str]) -> Result<(), StructureError> {
        let mut current = &self.root;
        for (depth, segment) in path.iter().enumerate() {
            match current.get(*segment) {
                None => return Ok(()),
                Some(Value::Object(map)) => current = map,
                Some(_) => {
                    return Err(StructureError::PathConflict {
                        path: path[..=depth].join("."),
                    });
                }
            }
        }
        Ok(())
    }

    /// Object at `path`, creating missing containers on the way.
    ///
    /// Nothing is created when a conflict is found.
    pub fn ensure_object(
        &mut self,
        path: &[&str],
    ) -> Result<&mut Map<String, Value>, StructureError> {
        self.check_path(path)?;

        let mut current = &mut self.root;
        for (depth, segment) in path.iter().enumerate() {
            current = current
                .entry(*segment)
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()
                .ok_or_else(|| StructureError::PathConflict {
                    path: path[..=depth].join("."),
                })?;
        }
        Ok(current)
    }

    /// Store `value` at `path`, creating intermediate objects.
    pub fn set(&mut self, path: &[&str], value: Value) -> Result<(), StructureError> {
        let Some((last, parents)) = path.split_last() else {
            return Ok(());
        };
        let parent = self.ensure_object(parents)?;
        parent.insert((*last).to_string(), value);
        Ok(())
    }
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

    #[test]
    fn test_get_nested() {
        let d = doc(json!({"a": {"b": {"c": 3}}}));
        assert_eq!(d.get(&["a", "b", "c"]), Some(&json!(3)));
        assert_eq!(d.get(&["a", "x", "c"]), None);
        assert_eq!(d.get(&["a", "b", "c", "d"]), None);
        assert_eq!(d.get(&[]), None);
    }

    #[test]
    fn test_set_creates_intermediates_and_appends() {
        let mut d = doc(json!({"first": 1}));
        d.set(&["outer", "inner", "key"], json!(true)).unwrap();
        let keys: Vec<_> = d.root().keys().cloned().collect();
        assert_eq!(keys, ["first", "outer"]);
        assert_eq!(d.get(&["outer", "inner", "key"]), Some(&json!(true)));
    }

    #[test]
    fn test_set_keeps_key_position() {
        let mut d = doc(json!({"a": 1, "b": 2, "c": 3}));
        d.set(&["b"], json!(20)).unwrap();
        let keys: Vec<_> = d.root().keys().cloned().collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_conflict_leaves_document_unchanged() {
        let mut d = doc(json!({"a": {"b": "text"}}));
        let before = d.clone();
        let err = d.set(&["a", "b", "c", "d"], json!(1)).unwrap_err();
        assert_eq!(
            err,
            StructureError::PathConflict {
                path: "a.b".to_string()
            }
        );
        assert_eq!(d, before);
    }
}
