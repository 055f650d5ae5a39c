//! Options module
//!
//! Handles loading and saving the configurator's own options.

mod schema;

pub use schema::{GeneralOptions, Options};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Name of the game's configuration file inside the installation directory
pub const PROJECT_FILE_NAME: &str = "coldwar.project";

/// Get the options directory path
pub fn config_dir() -> PathBuf {
    crate::util::config_dir()
}

/// Get the options file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load options from disk; defaults when no file exists yet
pub fn load() -> Result<Options> {
    load_from(&config_path())
}

pub fn load_from(path: &Path) -> Result<Options> {
    if !path.exists() {
        return Ok(Options::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options from {:?}", path))?;
    let options: Options =
        toml::from_str(&content).with_context(|| format!("Failed to parse options in {:?}", path))?;
    Ok(options)
}

/// Save options to disk
pub fn save(options: &Options) -> Result<()> {
    save_to(options, &config_path())
}

pub fn save_to(options: &Options, path: &Path) -> Result<()> {
    // Ensure options directory exists
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let content = toml::to_string_pretty(options)?;
    std::fs::write(path, content)?;

    tracing::info!("Options saved to {:?}", path);
    Ok(())
}

/// The game's configuration file, if it exists in `game_dir`
pub fn find_project_file(game_dir: &Path) -> Option<PathBuf> {
    let path = game_dir.join(PROJECT_FILE_NAME);
    path.is_file().then_some(path)
}

/// File to open when none was given: the game's configuration file, if
/// auto-load is on and the game path is set
pub fn auto_load_target(options: &Options) -> Option<PathBuf> {
    let general = &options.general;
    if !general.auto_load || general.game_path.is_empty() {
        return None;
    }
    find_project_file(Path::new(&general.game_path))
}
