//! Options schema
//!
//! Defines the structure of the options file.

use serde::{Deserialize, Serialize};

/// Main options structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(default)]
    pub general: GeneralOptions,
}

/// Game location and startup behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralOptions {
    /// Game installation directory (empty = not set)
    #[serde(default)]
    pub game_path: String,

    /// Open the game's configuration file on startup when no file is given
    #[serde(default = "default_true")]
    pub auto_load: bool,
}

impl Default for GeneralOptions {
    fn default() -> Self {
        Self {
            game_path: String::new(),
            auto_load: true,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}
