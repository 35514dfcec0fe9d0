//! Code for loading program settings.
use crate::get_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result, ensure};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# This file contains the program settings for strawberry-sim.
# Uncomment a line to change a setting. Command-line options take precedence over these values.
";

/// Default log level for program
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Default number of simulations per run
fn default_iterations() -> u32 {
    1
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    let mut path = get_config_dir();
    path.push(SETTINGS_FILE_NAME);

    path
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether to overwrite output files by default
    #[serde(default)]
    pub overwrite: bool,
    /// How many independent simulations to run for each scenario
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overwrite: false,
            iterations: default_iterations(),
        }
    }
}

impl Settings {
    /// Read the contents of the user's settings file.
    ///
    /// If the file is not present, default values for settings will be used
    ///
    /// # Returns
    ///
    /// The program settings as a `Settings` struct or an error if the file is invalid
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    /// Read from the specified path, falling back to defaults if there is no file
    pub fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        let settings: Settings = read_toml(file_path)?;
        ensure!(
            settings.iterations > 0,
            "iterations must be at least one (in {})",
            file_path.display()
        );

        Ok(settings)
    }

    /// Write a commented-out default settings file to `file_path` unless one is already there.
    ///
    /// # Returns
    ///
    /// Whether a new file was written.
    pub fn create_default_file(file_path: &Path) -> Result<bool> {
        if file_path.is_file() {
            return Ok(false);
        }

        if let Some(dir_path) = file_path.parent() {
            fs::create_dir_all(dir_path).with_context(|| {
                format!("Could not create settings folder {}", dir_path.display())
            })?;
        }
        fs::write(file_path, Self::default_file_contents())
            .with_context(|| format!("Could not write settings file {}", file_path.display()))?;

        Ok(true)
    }

    /// The settings in effect, as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Could not convert settings to TOML")
    }

    /// The contents of the default settings file
    pub fn default_file_contents() -> String {
        // Settings object with default values set by serde
        let settings: Settings =
            toml::from_str("").expect("Cannot create settings from empty TOML file");

        // Convert to TOML
        let settings_raw = toml::to_string(&settings).expect("Could not convert settings to TOML");

        // Iterate through the generated TOML, commenting out lines and adding docs
        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        for line in settings_raw.split('\n') {
            if let Some(last) = line.find('=') {
                // Add documentation from doc comments
                let field = line[..last].trim();

                // Use doc comment to document parameter. All fields should have doc comments.
                let docs = Settings::get_field_docs(field).expect("Missing doc comment for field");
                for line in docs.split('\n') {
                    write!(&mut out, "\n# # {}\n", line.trim()).unwrap();
                }

                writeln!(&mut out, "# {}", line.trim()).unwrap();
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_settings_load_from_path_no_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME); // NB: doesn't exist
        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_settings_load_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "log_level = \"warn\"\niterations = 20").unwrap();
        }

        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings {
                log_level: "warn".to_string(),
                overwrite: false,
                iterations: 20,
            }
        );
    }

    #[test]
    fn test_settings_zero_iterations() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&file_path, "iterations = 0\n").unwrap();
        assert_error!(
            Settings::load_from_path(&file_path),
            format!("iterations must be at least one (in {})", file_path.display())
        );
    }

    #[test]
    fn test_serde_defaults_match_default() {
        assert_eq!(
            toml::from_str::<Settings>("").unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_create_default_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("strawberry-sim").join(SETTINGS_FILE_NAME);
        assert!(Settings::create_default_file(&file_path).unwrap());
        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings::default()
        );

        // User edits are kept
        fs::write(&file_path, "iterations = 5\n").unwrap();
        assert!(!Settings::create_default_file(&file_path).unwrap());
        assert_eq!(Settings::load_from_path(&file_path).unwrap().iterations, 5);
    }

    #[test]
    fn test_to_toml() {
        let settings = Settings {
            log_level: "debug".to_string(),
            overwrite: true,
            iterations: 3,
        };
        let text = settings.to_toml().unwrap();
        assert_eq!(toml::from_str::<Settings>(&text).unwrap(), settings);
    }

    #[test]
    fn test_default_file_contents() {
        let contents = Settings::default_file_contents();
        assert!(contents.starts_with(DEFAULT_SETTINGS_FILE_HEADER));
        assert!(contents.contains("# log_level = \"info\""));
        assert!(contents.contains("# iterations = 1"));
        assert!(contents.contains("# # How many independent simulations"));
    }
}
