//! Fixed reference values and the rules used to interpret simulated results against them.
//!
//! The benchmarks are constants used for comparison only; nothing here feeds back into the
//! simulation.
use crate::factor::{CLOSED_LOOP_HYDROPONIC, Factor, Interval};
use crate::scenario::{ScenarioError, ScenarioInput};
use crate::simulation::ScenarioOutcome;
use crate::units::YieldPerArea;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Yield typical of unfavourable growing conditions
pub const UNFAVOURABLE_YIELD: YieldPerArea = YieldPerArea::new(3.0);

/// Yield typical of average growing conditions
pub const AVERAGE_YIELD: YieldPerArea = YieldPerArea::new(5.5);

/// Yield typical of optimal growing conditions
pub const OPTIMAL_YIELD: YieldPerArea = YieldPerArea::new(8.5);

/// Reference range of water consumption (l/m²) for an open or soil system
pub const WATER_RANGE: Interval = Interval {
    min: 300.0,
    max: 450.0,
};

/// Reference range of fertiliser consumption (kg/m²) for an open or soil system
pub const FERTILISER_RANGE: Interval = Interval {
    min: 0.010,
    max: 0.015,
};

/// How resource consumption should be judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionPolicy {
    /// Consumption should stay within the reference range. Too little indicates stress.
    WithinRange,
    /// Less is always better, as water and nutrients are recirculated
    LowerIsBetter,
}

/// The policy for judging consumption under the given cultivation system
pub fn consumption_policy(cultivation_system: &str) -> ConsumptionPolicy {
    if cultivation_system == CLOSED_LOOP_HYDROPONIC {
        ConsumptionPolicy::LowerIsBetter
    } else {
        ConsumptionPolicy::WithinRange
    }
}

/// Verdict on a resource consumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionRating {
    /// Below the reference range, suggesting the crop is under-supplied
    Deficient,
    /// Within the reference range
    Optimal,
    /// Above the reference range
    Excessive,
    /// Below the reference range thanks to recirculation
    Efficient,
}

/// Rate a consumption against its reference range
pub fn rate_consumption(
    value: f64,
    range: &Interval,
    policy: ConsumptionPolicy,
) -> ConsumptionRating {
    if value > range.max {
        return ConsumptionRating::Excessive;
    }

    match policy {
        ConsumptionPolicy::LowerIsBetter if value < range.min => ConsumptionRating::Efficient,
        ConsumptionPolicy::WithinRange if value < range.min => ConsumptionRating::Deficient,
        _ => ConsumptionRating::Optimal,
    }
}

/// Verdict on a yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum YieldRating {
    /// At or below the unfavourable benchmark
    Unfavourable,
    /// Between the unfavourable and average benchmarks
    BelowAverage,
    /// Between the average and optimal benchmarks
    Average,
    /// At or above the optimal benchmark
    Optimal,
}

/// Rate a yield against the reference yields
pub fn rate_yield(value: YieldPerArea) -> YieldRating {
    if value >= OPTIMAL_YIELD {
        YieldRating::Optimal
    } else if value >= AVERAGE_YIELD {
        YieldRating::Average
    } else if value > UNFAVOURABLE_YIELD {
        YieldRating::BelowAverage
    } else {
        YieldRating::Unfavourable
    }
}

/// All the ratings for one simulated outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assessment {
    /// Rating of the yield
    pub yield_rating: YieldRating,
    /// Rating of the water consumption
    pub water_rating: ConsumptionRating,
    /// Rating of the fertiliser consumption
    pub fertiliser_rating: ConsumptionRating,
    /// The policy the consumption ratings were made with
    pub policy: ConsumptionPolicy,
}

/// Rate a simulated outcome of `input` against the benchmarks
pub fn assess(
    input: &ScenarioInput,
    outcome: &ScenarioOutcome,
) -> Result<Assessment, ScenarioError> {
    let policy = consumption_policy(input.get(Factor::CultivationSystem)?.as_str());

    Ok(Assessment {
        yield_rating: rate_yield(outcome.yield_per_area),
        water_rating: rate_consumption(outcome.resources.water.value(), &WATER_RANGE, policy),
        fertiliser_rating: rate_consumption(
            outcome.resources.fertiliser.value(),
            &FERTILISER_RANGE,
            policy,
        ),
        policy,
    })
}
