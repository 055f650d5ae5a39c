//! CLI argument definitions
//!
//! Uses clap derive macros for argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// heat-config - Settings editor for World of Tanks: HEAT
#[derive(Parser, Debug)]
#[command(name = "heat-config")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Configuration file to read
#[derive(clap::Args, Debug)]
pub struct Source {
    /// Path to coldwar.project (defaults to the one in the game directory)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Configuration file to read and where to write the result
#[derive(clap::Args, Debug)]
pub struct Target {
    /// Path to coldwar.project (defaults to the one in the game directory)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Write the edited file here instead of overwriting the source
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that a file parses and report its layout
    Check {
        #[command(flatten)]
        source: Source,
    },

    /// Show current values with defaults and bounds
    Show {
        #[command(flatten)]
        source: Source,

        /// Only this section (aiming, followAim, ..., markers, presets)
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Set a field value
    Set {
        /// Section name, e.g. aiming
        section: String,
        /// Field key as stored, e.g. maxDistance
        key: String,
        /// New value
        #[arg(allow_hyphen_values = true)]
        value: String,

        #[command(flatten)]
        target: Target,
    },

    /// Reset a field, or everything, to defaults
    Reset {
        /// Section name
        section: Option<String>,
        /// Field key
        key: Option<String>,

        /// Reset all present sections and marker matrices
        #[arg(long, conflicts_with_all = ["section", "key"])]
        all: bool,

        #[command(flatten)]
        target: Target,
    },

    /// Show or edit a vehicle marker cell
    Marker {
        /// ally, enemy or platoon
        relation: String,
        /// InDirectVisible, Dead, DeadHotKey, DeadInAiming or InDirectInvisible
        state: String,

        #[arg(long)]
        opacity: Option<f64>,
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        name: Option<bool>,
        #[arg(long)]
        health_bar: Option<bool>,
        #[arg(long)]
        distance: Option<bool>,

        #[command(flatten)]
        target: Target,
    },

    /// Set the size of a fullscreen resolution preset
    Preset {
        /// Preset index as listed by `show --section presets`
        index: usize,
        width: i64,
        height: i64,

        #[command(flatten)]
        target: Target,
    },

    /// Show or change configurator options
    Options {
        /// Game installation directory ("" to clear)
        #[arg(long)]
        game_path: Option<String>,

        /// Open the game's configuration file when no file is given
        #[arg(long)]
        auto_load: Option<bool>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_set() {
        let args = Args::parse_from([
            "heat-config", "set", "aiming", "maxDistance", "2500", "-f", "coldwar.project",
        ]);
        match args.command {
            Commands::Set { section, key, value, target } => {
                assert_eq!(section, "aiming");
                assert_eq!(key, "maxDistance");
                assert_eq!(value, "2500");
                assert_eq!(target.file, Some(PathBuf::from("coldwar.project")));
                assert!(target.output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_reset_all_conflicts_with_field() {
        let args = ["heat-config", "reset", "aiming", "maxDistance", "--all"];
        assert!(Args::try_parse_from(args).is_err());
        assert!(Args::try_parse_from(["heat-config", "reset", "--all"]).is_ok());
    }
}
