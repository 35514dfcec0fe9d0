//! The module responsible for writing output data to disk.
use crate::benchmark::{Assessment, ConsumptionRating, YieldRating};
use crate::calendar::MonthlyYield;
use crate::simulation::ScenarioOutcome;
use crate::units::{FertiliserPerArea, MoneyPerArea, WaterPerArea, YieldPerArea};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "strawberry_results";

/// The output file name for per-iteration results
const RESULTS_FILE_NAME: &str = "results.csv";

/// The output file name for the monthly production
const MONTHLY_YIELD_FILE_NAME: &str = "monthly_yield.csv";

/// Get the scenario name from the path to its file
pub fn get_scenario_name(scenario_path: &Path) -> Result<&str> {
    scenario_path
        .file_stem()
        .context("Scenario path has no file name")?
        .to_str()
        .context("Invalid chars in scenario file name")
}

/// Get the default output folder for the named scenario
pub fn get_output_dir(scenario_name: &str) -> PathBuf {
    [OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect()
}

/// Create a new output directory, optionally replacing an existing one.
///
/// # Returns
///
/// Whether an existing non-empty folder was deleted.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let mut overwritten = false;
    if output_dir.is_dir() {
        let is_empty = output_dir
            .read_dir()
            .with_context(|| format!("Could not read output folder {}", output_dir.display()))?
            .next()
            .is_none();
        if is_empty {
            return Ok(false);
        }

        if !allow_overwrite {
            bail!(
                "Output folder {} already exists and is not empty. Use --overwrite or change \
                the overwrite setting to replace it.",
                output_dir.display()
            );
        }

        fs::remove_dir_all(output_dir).with_context(|| {
            format!("Could not delete output folder {}", output_dir.display())
        })?;
        overwritten = true;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Could not create output folder {}", output_dir.display()))?;

    Ok(overwritten)
}

/// Represents a row in the results CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ResultRow {
    iteration: u32,
    yield_kg_per_m2: YieldPerArea,
    water_l_per_m2: WaterPerArea,
    fertiliser_kg_per_m2: FertiliserPerArea,
    revenue: MoneyPerArea,
    cost_water: MoneyPerArea,
    cost_fertiliser: MoneyPerArea,
    cost_other: MoneyPerArea,
    gross_profit: MoneyPerArea,
    yield_rating: YieldRating,
    water_rating: ConsumptionRating,
    fertiliser_rating: ConsumptionRating,
}

impl ResultRow {
    /// Create a new [`ResultRow`]
    fn new(iteration: u32, outcome: &ScenarioOutcome, assessment: &Assessment) -> Self {
        let financials = &outcome.financials;
        Self {
            iteration,
            yield_kg_per_m2: outcome.yield_per_area,
            water_l_per_m2: outcome.resources.water,
            fertiliser_kg_per_m2: outcome.resources.fertiliser,
            revenue: financials.revenue,
            cost_water: financials.cost_water,
            cost_fertiliser: financials.cost_fertiliser,
            cost_other: financials.cost_other,
            gross_profit: financials.gross_profit,
            yield_rating: assessment.yield_rating,
            water_rating: assessment.water_rating,
            fertiliser_rating: assessment.fertiliser_rating,
        }
    }
}

/// An object for writing simulation results to file
pub struct DataWriter {
    results_writer: csv::Writer<File>,
    monthly_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            results_writer: new_writer(RESULTS_FILE_NAME)?,
            monthly_writer: new_writer(MONTHLY_YIELD_FILE_NAME)?,
        })
    }

    /// Write the outcome of one iteration to the results file
    pub fn write_outcome(
        &mut self,
        iteration: u32,
        outcome: &ScenarioOutcome,
        assessment: &Assessment,
    ) -> Result<()> {
        self.results_writer
            .serialize(ResultRow::new(iteration, outcome, assessment))?;

        Ok(())
    }

    /// Write the monthly production to file
    pub fn write_monthly_yield(&mut self, months: &[MonthlyYield]) -> Result<()> {
        for month in months {
            self.monthly_writer.serialize(month)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.results_writer.flush()?;
        self.monthly_writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::assess;
    use crate::calendar::monthly_yield;
    use crate::finance::FinancialParameters;
    use crate::fixture::{optimal_input, rng, tables};
    use crate::scenario::ScenarioInput;
    use crate::simulation::run_scenario;
    use crate::tables::ModelTables;
    use itertools::{Itertools, assert_equal};
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;
    use std::iter;
    use tempfile::tempdir;

    #[test]
    fn test_get_scenario_name() {
        assert_eq!(
            get_scenario_name(Path::new("some/dir/greenhouse.toml")).unwrap(),
            "greenhouse"
        );
        assert!(get_scenario_name(Path::new("/")).is_err());
    }

    #[test]
    fn test_get_output_dir() {
        assert_eq!(
            get_output_dir("greenhouse"),
            Path::new("strawberry_results").join("greenhouse")
        );
    }

    #[test]
    fn test_create_output_directory() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("nested").join("output");

        // New folder
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // Empty folder is reused
        assert!(!create_output_directory(&output_dir, false).unwrap());

        // Non-empty folder needs permission to overwrite
        fs::write(output_dir.join("old.csv"), "stale").unwrap();
        assert!(create_output_directory(&output_dir, false).is_err());
        assert!(create_output_directory(&output_dir, true).unwrap());
        assert!(!output_dir.join("old.csv").exists());
    }

    #[rstest]
    fn test_write_outcome(
        tables: &'static ModelTables,
        optimal_input: ScenarioInput,
        mut rng: ChaCha8Rng,
    ) {
        let outcome = run_scenario(
            tables,
            &optimal_input,
            &FinancialParameters::default(),
            &mut rng,
        )
        .unwrap();
        let assessment = assess(&optimal_input, &outcome).unwrap();
        let dir = tempdir().unwrap();

        // Write an outcome
        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer.write_outcome(1, &outcome, &assessment).unwrap();
            writer.flush().unwrap();
        }

        // Read back and compare
        let expected = ResultRow::new(1, &outcome, &assessment);
        let records: Vec<ResultRow> = csv::Reader::from_path(dir.path().join(RESULTS_FILE_NAME))
            .unwrap()
            .into_deserialize()
            .try_collect()
            .unwrap();
        assert_equal(records, iter::once(expected));
    }

    #[test]
    fn test_write_monthly_yield() {
        let dir = tempdir().unwrap();
        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer
                .write_monthly_yield(&monthly_yield(YieldPerArea(10.0)))
                .unwrap();
            writer.flush().unwrap();
        }

        let mut reader = csv::Reader::from_path(dir.path().join(MONTHLY_YIELD_FILE_NAME)).unwrap();
        assert_eq!(
            reader.headers().unwrap().iter().collect_vec(),
            ["month", "share_percent", "yield_per_area"]
        );
        let records: Vec<csv::StringRecord> = reader.records().try_collect().unwrap();
        assert_eq!(records.len(), 12);
        assert_eq!(&records[0][0], "January");
        assert_eq!(&records[0][1], "5");
    }
}
