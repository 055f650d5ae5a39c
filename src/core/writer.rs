//! Document writer
//!
//! Pretty-printed JSON with two-space indentation and no trailing newline,
//! the layout the game writes. Key order is the in-memory order.

use super::error::WriteError;
use super::format::{SETTINGS_KEY, Shape};
use super::session::EditSession;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// A borrowed view of the file layout: the document at the root, or
/// re-wrapped under `settings` between its original siblings.
struct Envelope<'a> {
    document: &'a Map<String, Value>,
    shape: &'a Shape,
}

impl Serialize for Envelope<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.shape {
            Shape::Bare => self.document.serialize(serializer),
            Shape::Wrapped { before, after } => {
                let mut map = serializer.serialize_map(Some(before.len() + 1 + after.len()))?;
                for (key, value) in before {
                    map.serialize_entry(key, value)?;
                }
                map.serialize_entry(SETTINGS_KEY, self.document)?;
                for (key, value) in after {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Encode the session's document in its original shape
pub fn serialize(session: &EditSession) -> Result<Vec<u8>, WriteError> {
    let envelope = Envelope {
        document: session.document().root(),
        shape: session.shape(),
    };
    let bytes = serde_json::to_vec_pretty(&envelope)?;
    Ok(bytes)
}
