//! Code for reading scenario files.
use super::{input_err_msg, read_toml};
use crate::finance::{FinancialParameters, RawFinancialParameters};
use crate::scenario::ScenarioInput;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// The contents of a scenario TOML file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// Free-text description of the scenario
    #[serde(default)]
    pub description: String,
    /// Seed for the random source. Runs are only reproducible if this is set.
    pub seed: Option<u64>,
    /// The category chosen for each factor, keyed by factor name
    pub factors: IndexMap<String, String>,
    /// Prices and costs; absent entries take their defaults
    #[serde(default)]
    pub financial: RawFinancialParameters,
}

impl ScenarioFile {
    /// Read a scenario from a TOML file
    pub fn from_path(file_path: &Path) -> Result<Self> {
        read_toml(file_path)
    }

    /// Parse a scenario from the contents of a TOML file
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// The factor choices of the scenario
    pub fn input(&self) -> Result<ScenarioInput> {
        let input = ScenarioInput::from_names(&self.factors)?;
        input.check_complete()?;
        Ok(input)
    }

    /// The financial parameters of the scenario
    pub fn financial_parameters(&self) -> FinancialParameters {
        FinancialParameters::from_raw(&self.financial)
    }
}

/// Read a scenario file and get its factor choices and financial parameters
pub fn read_scenario(file_path: &Path) -> Result<(ScenarioFile, ScenarioInput)> {
    let file = ScenarioFile::from_path(file_path)?;
    let input = file.input().with_context(|| input_err_msg(file_path))?;
    Ok((file, input))
}
