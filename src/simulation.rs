//! The scenario simulation engine.
//!
//! Yield and resource consumption are stochastic: every call draws fresh values from the
//! intervals in the factor tables, so the same scenario gives different answers on different
//! calls. Pass a seeded random source to make results reproducible.
use crate::benchmark::{assess, rate_yield};
use crate::calendar::monthly_yield;
use crate::factor::Interval;
use crate::finance::{FinancialParameters, FinancialResult, simulate_financials};
use crate::output::DataWriter;
use crate::scenario::{ScenarioError, ScenarioInput};
use crate::tables::ModelTables;
use crate::units::{Dimensionless, FertiliserPerArea, WaterPerArea, YieldPerArea};
use anyhow::{Result, ensure};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::Path;

/// Maximum achievable yield over one growing season under flawless conditions
pub const BASE_POTENTIAL_YIELD: YieldPerArea = YieldPerArea::new(10.0);

/// Range of water consumption (l/m²) before any factor is applied
pub const BASE_WATER_CONSUMPTION: Interval = Interval {
    min: 300.0,
    max: 450.0,
};

/// Range of fertiliser consumption (kg/m²) before any factor is applied
pub const BASE_FERTILISER_CONSUMPTION: Interval = Interval {
    min: 0.010,
    max: 0.015,
};

/// Create the random source for a simulation.
///
/// With a seed the sequence of draws is reproducible; without one it is seeded from the OS.
pub fn new_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Water and fertiliser used per square metre over the season
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceConsumption {
    /// Water consumption (l/m²)
    pub water: WaterPerArea,
    /// Fertiliser consumption (kg/m²)
    pub fertiliser: FertiliserPerArea,
}

/// Everything computed for one evaluation of a scenario
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioOutcome {
    /// Simulated yield
    pub yield_per_area: YieldPerArea,
    /// Simulated resource consumption
    pub resources: ResourceConsumption,
    /// Financial roll-up of the above
    pub financials: FinancialResult,
}

/// Simulate the annual yield of a scenario.
///
/// The base potential yield is scaled by one random multiplier per factor, drawn from the
/// interval of the chosen category.
pub fn simulate_yield<R: Rng + ?Sized>(
    tables: &ModelTables,
    input: &ScenarioInput,
    rng: &mut R,
) -> Result<YieldPerArea, ScenarioError> {
    let weights = tables.yield_weights.resolve(input)?;
    let multiplier: f64 = weights.into_iter().map(|weight| weight.sample(rng)).product();

    Ok(BASE_POTENTIAL_YIELD * Dimensionless(multiplier))
}

/// The lowest and highest yields [`simulate_yield`] can produce for a scenario
pub fn yield_bounds(
    tables: &ModelTables,
    input: &ScenarioInput,
) -> Result<(YieldPerArea, YieldPerArea), ScenarioError> {
    let weights = tables.yield_weights.resolve(input)?;
    let min: f64 = weights.iter().map(|weight| weight.min).product();
    let max: f64 = weights.iter().map(|weight| weight.max).product();

    Ok((
        BASE_POTENTIAL_YIELD * Dimensionless(min),
        BASE_POTENTIAL_YIELD * Dimensionless(max),
    ))
}

/// Apply the summed fractional change to a base consumption, flooring at zero
fn apply_delta(base: f64, delta: f64) -> f64 {
    (base * (1.0 + delta)).max(0.0)
}

/// Simulate the water and fertiliser consumption of a scenario.
///
/// A base consumption is drawn for each resource, then one fractional change per factor. The
/// changes are summed and applied to the base in a single step.
pub fn simulate_resources<R: Rng + ?Sized>(
    tables: &ModelTables,
    input: &ScenarioInput,
    rng: &mut R,
) -> Result<ResourceConsumption, ScenarioError> {
    let impacts = tables.resource_impacts.resolve(input)?;

    let base_water = BASE_WATER_CONSUMPTION.sample(rng);
    let base_fertiliser = BASE_FERTILISER_CONSUMPTION.sample(rng);
    let mut water_delta = 0.0;
    let mut fertiliser_delta = 0.0;
    for impact in impacts {
        water_delta += impact.water.sample(rng);
        fertiliser_delta += impact.fertiliser.sample(rng);
    }
    if water_delta < -1.0 || fertiliser_delta < -1.0 {
        debug!(
            "Summed resource changes (water {water_delta:.3}, fertiliser {fertiliser_delta:.3}) \
            exceed -100%; consumption floored at zero"
        );
    }

    Ok(ResourceConsumption {
        water: WaterPerArea(apply_delta(base_water, water_delta)),
        fertiliser: FertiliserPerArea(apply_delta(base_fertiliser, fertiliser_delta)),
    })
}

/// The lowest and highest consumption [`simulate_resources`] can produce for a scenario
pub fn resource_bounds(
    tables: &ModelTables,
    input: &ScenarioInput,
) -> Result<(ResourceConsumption, ResourceConsumption), ScenarioError> {
    let impacts = tables.resource_impacts.resolve(input)?;
    let water_min: f64 = impacts.iter().map(|impact| impact.water.min).sum();
    let water_max: f64 = impacts.iter().map(|impact| impact.water.max).sum();
    let fertiliser_min: f64 = impacts.iter().map(|impact| impact.fertiliser.min).sum();
    let fertiliser_max: f64 = impacts.iter().map(|impact| impact.fertiliser.max).sum();

    let lower = ResourceConsumption {
        water: WaterPerArea(apply_delta(BASE_WATER_CONSUMPTION.min, water_min)),
        fertiliser: FertiliserPerArea(apply_delta(
            BASE_FERTILISER_CONSUMPTION.min,
            fertiliser_min,
        )),
    };
    let upper = ResourceConsumption {
        water: WaterPerArea(apply_delta(BASE_WATER_CONSUMPTION.max, water_max)),
        fertiliser: FertiliserPerArea(apply_delta(
            BASE_FERTILISER_CONSUMPTION.max,
            fertiliser_max,
        )),
    };

    Ok((lower, upper))
}

/// Simulate yield and resource consumption, then calculate the financial performance
pub fn run_scenario<R: Rng + ?Sized>(
    tables: &ModelTables,
    input: &ScenarioInput,
    parameters: &FinancialParameters,
    rng: &mut R,
) -> Result<ScenarioOutcome, ScenarioError> {
    // Check every lookup before drawing anything
    tables.check_input(input)?;

    let yield_per_area = simulate_yield(tables, input, rng)?;
    let resources = simulate_resources(tables, input, rng)?;
    let financials = simulate_financials(yield_per_area, &resources, parameters);

    Ok(ScenarioOutcome {
        yield_per_area,
        resources,
        financials,
    })
}

/// Run a scenario several times, writing every outcome to the output folder.
///
/// # Arguments
///
/// * `tables` - The factor tables
/// * `input` - The scenario to simulate
/// * `parameters` - Prices and costs
/// * `iterations` - How many independent simulations to run
/// * `rng` - Random source shared by all iterations
/// * `output_path` - The folder to which output files will be written
pub fn run<R: Rng + ?Sized>(
    tables: &ModelTables,
    input: &ScenarioInput,
    parameters: &FinancialParameters,
    iterations: u32,
    rng: &mut R,
    output_path: &Path,
) -> Result<()> {
    ensure!(iterations > 0, "Number of iterations must be at least one");
    let mut writer = DataWriter::create(output_path)?;

    let mut total_yield = YieldPerArea(0.0);
    for iteration in 1..=iterations {
        let outcome = run_scenario(tables, input, parameters, rng)?;
        let assessment = assess(input, &outcome)?;
        debug!(
            "Iteration {iteration}: yield {:.3} kg/m², water {:.1} l/m², fertiliser {:.4} kg/m², \
            gross profit {:.2} €/m²",
            outcome.yield_per_area.value(),
            outcome.resources.water.value(),
            outcome.resources.fertiliser.value(),
            outcome.financials.gross_profit.value()
        );

        writer.write_outcome(iteration, &outcome, &assessment)?;
        total_yield = total_yield + outcome.yield_per_area;
    }

    let mean_yield = total_yield / Dimensionless(f64::from(iterations));
    writer.write_monthly_yield(&monthly_yield(mean_yield))?;
    writer.flush()?;

    info!(
        "Mean yield over {iterations} iteration(s): {:.3} kg/m² ({})",
        mean_yield.value(),
        rate_yield(mean_yield)
    );

    Ok(())
}
