//! heat-configurator library root
//!
//! Re-exports the document model for external use.

pub mod config;
pub mod core;
pub mod util;

pub use config::Options;
pub use crate::core::{EditSession, Editor, load_from_bytes, serialize_for_save};
