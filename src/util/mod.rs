//! Utility module
//!
//! Common utilities used across the application.

use std::path::PathBuf;

const APP_DIR: &str = "heat-configurator";

/// Get the configuration directory for the configurator
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(APP_DIR)
}

/// Label for a stored key: drops an `is` prefix and spaces out words, so
/// `isHealthBarEnabled` becomes `Health Bar Enabled`. Display only.
pub fn display_label(key: &str) -> String {
    let stem = key.strip_prefix("is").unwrap_or(key);
    let mut label = String::with_capacity(stem.len() + 4);
    for c in stem.chars() {
        if c.is_uppercase() && !label.is_empty() {
            label.push(' ');
        }
        label.push(c);
    }
    label
}
