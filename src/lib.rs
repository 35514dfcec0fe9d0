//! Simulation of yield, resource use and financial performance for strawberry-farming scenarios.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod benchmark;
pub mod calendar;
pub mod cli;
pub mod factor;
pub mod finance;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod scenario;
pub mod settings;
pub mod simulation;
pub mod tables;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the folder where the program's configuration files are stored
pub fn get_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No known config folder on this platform; use the working directory
        return PathBuf::new();
    };
    config_dir.push("strawberry-sim");

    config_dir
}
