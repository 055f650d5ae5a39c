//! CLI module
//!
//! Command-line interface for heat-config. This layer owns all file I/O:
//! it reads bytes, hands them to the document model, and writes the
//! serialized result back.

mod args;

pub use args::{Args, Commands, Source, Target};

use anyhow::{Context, Result};
use heat_configurator::config::{self, Options};
use heat_configurator::core::marker::{OPACITY_MAX, OPACITY_MIN, OPACITY_STEP};
use heat_configurator::core::presets::{HEIGHT_MAX, HEIGHT_MIN, SIZE_STEP, WIDTH_MAX, WIDTH_MIN};
use heat_configurator::core::{
    AttributeSet, EditSession, Editor, Lifecycle, ParseError, Recognition, Relation, Section,
};
use heat_configurator::util::display_label;
use std::path::{Path, PathBuf};

const PARSE_HINT: &str = "Tip: Make sure the file hasn't been modified incorrectly";

/// Run a parsed command
pub async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Check { source } => check(source).await,
        Commands::Show { source, section } => show(source, section.as_deref()).await,
        Commands::Set {
            section,
            key,
            value,
            target,
        } => set_field(&section, &key, &value, target).await,
        Commands::Reset {
            section,
            key,
            all,
            target,
        } => reset(section.as_deref(), key.as_deref(), all, target).await,
        Commands::Marker {
            relation,
            state,
            opacity,
            enabled,
            name,
            health_bar,
            distance,
            target,
        } => {
            let edit = MarkerEdit {
                opacity,
                enabled,
                name,
                health_bar,
                distance,
            };
            marker(&relation, &state, edit, target).await
        }
        Commands::Preset {
            index,
            width,
            height,
            target,
        } => preset(index, width, height, target).await,
        Commands::Options {
            game_path,
            auto_load,
        } => options(game_path, auto_load),
    }
}

/// The file given on the command line, or the game's own configuration file
fn resolve_file(file: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = file {
        return Ok(path);
    }

    let options = config::load()?;
    config::auto_load_target(&options).context(
        "No file given and no game configuration found. \
         Use --file, or set the game directory with 'heat-config options --game-path <dir>'.",
    )
}

/// Read and parse a configuration file into the editor's live session
async fn open<'a>(editor: &'a mut Editor, path: &Path) -> Result<&'a mut EditSession> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;

    editor
        .load(&bytes, Some(path.to_path_buf()))
        .map_err(|e| match e {
            ParseError::Malformed(_) => anyhow::anyhow!("{}\n{}", e, PARSE_HINT),
            ParseError::NotAnObject => anyhow::anyhow!("Invalid file format: {}", e),
        })
        .with_context(|| format!("Failed to load {:?}", path))
}

/// Write the session to `output`, or back to its source
async fn save(session: &EditSession, output: Option<&Path>) -> Result<()> {
    let path = output
        .or(session.source())
        .context("No destination for the edited file")?;
    let bytes = session.serialize_for_save()?;

    tokio::fs::write(path, &bytes)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;

    tracing::info!("Saved {} bytes to {:?}", bytes.len(), path);
    println!("💾 Saved to {}", path.display());
    Ok(())
}

async fn check(source: Source) -> Result<()> {
    let path = resolve_file(source.file)?;
    let mut editor = Editor::new();
    let session = open(&mut editor, &path).await?;

    println!("✅ {} parsed successfully", path.display());
    if session.shape().is_wrapped() {
        println!("   Layout: wrapped in \"settings\"");
        let extra = session.shape().extra_keys();
        if !extra.is_empty() {
            println!("   Other top-level keys: {}", extra.join(", "));
        }
    } else {
        println!("   Layout: bare");
    }

    if session.recognition() == Recognition::Unrecognized {
        println!("⚠️  No known settings sections found. Is this a coldwar.project file?");
    }

    for section in Section::ALL {
        let present = session.document().object_at(section.path()).is_some();
        println!(
            "   {} {}",
            if present { "●" } else { "○" },
            section.title()
        );
    }
    Ok(())
}

async fn show(source: Source, only: Option<&str>) -> Result<()> {
    let path = resolve_file(source.file)?;
    let mut editor = Editor::new();
    let session = open(&mut editor, &path).await?;

    match only {
        None => {
            for section in Section::ALL {
                print_section(session, section);
            }
            print_markers(session);
            print_presets(session);
        }
        Some(name) if name.eq_ignore_ascii_case("markers") => print_markers(session),
        Some(name) if name.eq_ignore_ascii_case("presets") => print_presets(session),
        Some(name) => print_section(session, name.parse()?),
    }
    Ok(())
}

fn print_section(session: &EditSession, section: Section) {
    println!("{} [{}]", section.title(), section.name());
    for (spec, value) in session.section_fields(section) {
        let marker = if value == spec.default { " " } else { "*" };
        println!(
            "  {}{:<34} {:<44} = {:<14} (default {}, {})",
            marker, spec.label, spec.key, value, spec.default, spec.kind
        );
    }
    println!();
}

fn print_markers(session: &EditSession) {
    println!(
        "Vehicle Markers [markers] (opacity {}..={} step {})",
        OPACITY_MIN, OPACITY_MAX, OPACITY_STEP
    );
    for relation in Relation::ALL {
        for lifecycle in Lifecycle::ALL {
            print_marker_cell(session.marker_read(relation, lifecycle), relation, lifecycle);
        }
    }
    println!();
}

fn print_marker_cell(attrs: AttributeSet, relation: Relation, lifecycle: Lifecycle) {
    let toggles: Vec<String> = attrs
        .toggles()
        .iter()
        .map(|(key, on)| format!("{}={}", display_label(key), on))
        .collect();
    println!(
        "  {:<8} {:<18} opacity={:<5} {}",
        relation.name(),
        lifecycle.key(),
        attrs.opacity,
        toggles.join(", ")
    );
}

fn print_presets(session: &EditSession) {
    println!(
        "Resolution Presets [presets] (width {}..={}, height {}..={}, step {})",
        WIDTH_MIN, WIDTH_MAX, HEIGHT_MIN, HEIGHT_MAX, SIZE_STEP
    );
    let presets = session.resolution_presets();
    if presets.is_empty() {
        println!("  (none)");
    }
    for preset in presets {
        println!(
            "  {:>3}  {:<28} {}x{}",
            preset.index, preset.label, preset.width, preset.height
        );
    }
    println!();
}

async fn set_field(section: &str, key: &str, value: &str, target: Target) -> Result<()> {
    let section: Section = section.parse()?;
    let path = resolve_file(target.file)?;
    let mut editor = Editor::new();
    let session = open(&mut editor, &path).await?;

    let stored = session.set_field_from_str(section, key, value)?;
    println!("✅ {}.{} = {}", section, key, stored);
    if stored.to_string() != value.trim() {
        println!("   (requested {}, stored within bounds)", value.trim());
    }

    save(session, target.output.as_deref()).await
}

async fn reset(section: Option<&str>, key: Option<&str>, all: bool, target: Target) -> Result<()> {
    let path = resolve_file(target.file)?;
    let mut editor = Editor::new();
    let session = open(&mut editor, &path).await?;

    if all {
        let summary = session.reset_all_to_schema_defaults();
        println!(
            "✅ Reset {} sections and {} marker matrices to defaults",
            summary.sections.len(),
            summary.relations.len()
        );
    } else {
        let (Some(section), Some(key)) = (section, key) else {
            anyhow::bail!("Specify SECTION and KEY, or use --all");
        };
        let section: Section = section.parse()?;
        let stored = session.reset_field(section, key)?;
        println!("✅ {}.{} reset to {}", section, key, stored);
    }

    save(session, target.output.as_deref()).await
}

/// Attribute overrides from the command line
struct MarkerEdit {
    opacity: Option<f64>,
    enabled: Option<bool>,
    name: Option<bool>,
    health_bar: Option<bool>,
    distance: Option<bool>,
}

impl MarkerEdit {
    fn is_empty(&self) -> bool {
        self.opacity.is_none()
            && self.enabled.is_none()
            && self.name.is_none()
            && self.health_bar.is_none()
            && self.distance.is_none()
    }

    fn apply(&self, attrs: AttributeSet) -> AttributeSet {
        AttributeSet {
            opacity: self.opacity.unwrap_or(attrs.opacity),
            is_enabled: self.enabled.unwrap_or(attrs.is_enabled),
            is_name_enabled: self.name.unwrap_or(attrs.is_name_enabled),
            is_health_bar_enabled: self.health_bar.unwrap_or(attrs.is_health_bar_enabled),
            is_distance_enabled: self.distance.unwrap_or(attrs.is_distance_enabled),
        }
    }
}

async fn marker(relation: &str, state: &str, edit: MarkerEdit, target: Target) -> Result<()> {
    let relation: Relation = relation.parse()?;
    let lifecycle: Lifecycle = state.parse()?;
    let path = resolve_file(target.file)?;
    let mut editor = Editor::new();
    let session = open(&mut editor, &path).await?;

    let current = session.marker_read(relation, lifecycle);
    if edit.is_empty() {
        print_marker_cell(current, relation, lifecycle);
        return Ok(());
    }

    let stored = session.marker_write(relation, lifecycle, edit.apply(current))?;
    print_marker_cell(stored, relation, lifecycle);
    save(session, target.output.as_deref()).await
}

async fn preset(index: usize, width: i64, height: i64, target: Target) -> Result<()> {
    let path = resolve_file(target.file)?;
    let mut editor = Editor::new();
    let session = open(&mut editor, &path).await?;

    let (width, height) = session.set_resolution_preset(index, width, height)?;
    println!("✅ Preset {} set to {}x{}", index, width, height);
    save(session, target.output.as_deref()).await
}

fn options(game_path: Option<String>, auto_load: Option<bool>) -> Result<()> {
    let mut options: Options = config::load()?;

    if game_path.is_none() && auto_load.is_none() {
        println!("⚙️  Options ({})", config::config_path().display());
        println!(
            "   Game path: {}",
            if options.general.game_path.is_empty() {
                "(not set)"
            } else {
                options.general.game_path.as_str()
            }
        );
        println!("   Auto-load: {}", options.general.auto_load);
        return Ok(());
    }

    if let Some(game_path) = game_path {
        if !game_path.is_empty() {
            match config::find_project_file(Path::new(&game_path)) {
                Some(found) => println!("📄 Found {}", found.display()),
                None => println!(
                    "⚠️  No {} in {}",
                    config::PROJECT_FILE_NAME,
                    game_path
                ),
            }
        }
        options.general.game_path = game_path;
    }
    if let Some(auto_load) = auto_load {
        options.general.auto_load = auto_load;
    }

    config::save(&options)?;
    println!("✅ Options saved successfully");
    Ok(())
}
