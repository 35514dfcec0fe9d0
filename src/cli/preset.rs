//! Code related to the preset scenarios and the CLI commands for interacting with them.
use super::{RunOpts, handle_run_command};
use crate::factor::Factor;
use crate::input::scenario::ScenarioFile;
use crate::settings::Settings;
use crate::tables::ModelTables;
use anyhow::{Context, Result, ensure};
use clap::Subcommand;
use include_dir::{Dir, File, include_dir};
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tempfile::TempDir;

/// The directory containing the preset scenario files.
static PRESETS_DIR: Dir<'static> = include_dir!("presets");

/// File extension of scenario files
const SCENARIO_EXTENSION: &str = "toml";

/// The available subcommands for managing presets.
#[derive(Subcommand)]
pub enum PresetSubcommands {
    /// List available presets.
    List,
    /// Provide information about the specified preset.
    Info {
        /// The name of the preset.
        name: String,
    },
    /// Extract a preset scenario to a new file.
    Extract {
        /// The name of the preset to extract.
        name: String,
        /// The destination file for the scenario.
        new_path: Option<PathBuf>,
    },
    /// Run a preset.
    Run {
        /// The name of the preset to run.
        name: String,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl PresetSubcommands {
    /// Execute the supplied preset subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_preset_list_command(),
            Self::Info { name } => handle_preset_info_command(&name)?,
            Self::Extract {
                name,
                new_path: dest,
            } => handle_preset_extract_command(&name, dest.as_deref())?,
            Self::Run { name, opts } => handle_preset_run_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// The names of all the presets, in alphabetical order
pub fn preset_names() -> Vec<&'static str> {
    PRESETS_DIR
        .files()
        .filter_map(|file| file.path().file_stem()?.to_str())
        .sorted_unstable()
        .collect()
}

/// Get the embedded scenario file for a preset
fn get_preset_file(name: &str) -> Result<&'static File<'static>> {
    let path: PathBuf = Path::new(name).with_extension(SCENARIO_EXTENSION);
    PRESETS_DIR.get_file(path).context("Preset not found.")
}

/// Parse the scenario of a preset
pub fn load_preset(name: &str) -> Result<ScenarioFile> {
    let contents = get_preset_file(name)?
        .contents_utf8()
        .context("Preset file is not UTF-8 encoded")?;
    ScenarioFile::from_toml_str(contents).with_context(|| format!("Invalid preset {name}"))
}

/// Handle the `preset list` command.
fn handle_preset_list_command() {
    for name in preset_names() {
        println!("{name}");
    }
}

/// Handle the `preset info` command.
fn handle_preset_info_command(name: &str) -> Result<()> {
    let file = load_preset(name)?;
    let input = file.input()?;
    let tables = ModelTables::builtin();

    println!("{}\n", file.description);
    for factor in Factor::iter() {
        let category = input.get(factor)?;
        let description = tables.describe(factor, category).unwrap_or("unknown");
        println!("{:<20} {category} ({description})", factor.label());
    }

    Ok(())
}

/// Handle the `preset extract` command
fn handle_preset_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    let default_dest: PathBuf;
    let dest = if let Some(dest) = dest {
        dest
    } else {
        default_dest = Path::new(name).with_extension(SCENARIO_EXTENSION);
        &default_dest
    };
    extract_preset(name, dest)
}

/// Write the scenario file of the specified preset to a new path
fn extract_preset(name: &str, new_path: &Path) -> Result<()> {
    let file = get_preset_file(name)?;

    ensure!(
        !new_path.exists(),
        "Destination file {} already exists",
        new_path.display()
    );

    fs::write(new_path, file.contents())
        .with_context(|| format!("Could not write {}", new_path.display()))?;

    Ok(())
}

/// Handle the `preset run` command.
pub fn handle_preset_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let scenario_path = temp_dir
        .path()
        .join(name)
        .with_extension(SCENARIO_EXTENSION);
    extract_preset(name, &scenario_path)?;
    handle_run_command(&scenario_path, opts, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use tempfile::tempdir;

    #[test]
    fn test_preset_names() {
        assert_eq!(
            preset_names(),
            [
                "average",
                "hydroponic",
                "optimal",
                "soilless",
                "traditional",
                "unfavorable"
            ]
        );
    }

    #[test]
    fn test_presets_are_valid() {
        let tables = ModelTables::builtin();
        for name in preset_names() {
            let file = load_preset(name).unwrap();
            assert!(!file.description.is_empty());
            tables.check_input(&file.input().unwrap()).unwrap();
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert_error!(load_preset("greenhouse"), "Preset not found.");
    }

    #[test]
    fn test_extract_preset() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("mine.toml");
        extract_preset("optimal", &dest).unwrap();
        let extracted = ScenarioFile::from_path(&dest).unwrap();
        assert_eq!(extracted, load_preset("optimal").unwrap());

        // Refuse to overwrite
        assert_error!(
            extract_preset("optimal", &dest),
            format!("Destination file {} already exists", dest.display())
        );
    }
}
