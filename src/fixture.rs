//! Fixtures for tests

use crate::factor::Factor;
use crate::scenario::ScenarioInput;
use crate::tables::{Category, CategoryMap, ModelTables};
use indexmap::indexmap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::fixture;
use strum::IntoEnumIterator;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn tables() -> &'static ModelTables {
    ModelTables::builtin()
}

/// A catalogue with a single category called "only" for every factor
#[fixture]
pub fn single_category_map() -> CategoryMap {
    Factor::iter()
        .map(|factor| {
            let category = Category {
                id: "only".into(),
                description: "The only choice".into(),
            };
            (factor, indexmap! { category.id.clone() => category })
        })
        .collect()
}

#[fixture]
pub fn optimal_input() -> ScenarioInput {
    ScenarioInput::new()
        .with(Factor::Temperature, "optimal")
        .with(Factor::Light, "high")
        .with(Factor::RelativeHumidity, "optimal")
        .with(Factor::Irrigation, "drip")
        .with(Factor::Fertilisation, "hydroponic")
        .with(Factor::PathogenControl, "integrated")
        .with(Factor::HarvestFrequency, "high")
        .with(Factor::Pollination, "bumblebee")
        .with(Factor::CultivationSystem, "closed_loop_hydroponic")
}

#[fixture]
pub fn unfavourable_input() -> ScenarioInput {
    ScenarioInput::new()
        .with(Factor::Temperature, "critical")
        .with(Factor::Light, "low")
        .with(Factor::RelativeHumidity, "high_risky")
        .with(Factor::Irrigation, "manual")
        .with(Factor::Fertilisation, "organic")
        .with(Factor::PathogenControl, "organic")
        .with(Factor::HarvestFrequency, "low")
        .with(Factor::Pollination, "manual")
        .with(Factor::CultivationSystem, "traditional_soil")
}

/// A scenario whose water deltas can sum to less than -100%
#[fixture]
pub fn water_saving_input() -> ScenarioInput {
    ScenarioInput::new()
        .with(Factor::Temperature, "sub_cold")
        .with(Factor::Light, "low")
        .with(Factor::RelativeHumidity, "high_risky")
        .with(Factor::Irrigation, "drip")
        .with(Factor::Fertilisation, "hydroponic")
        .with(Factor::PathogenControl, "integrated")
        .with(Factor::HarvestFrequency, "low")
        .with(Factor::Pollination, "natural")
        .with(Factor::CultivationSystem, "closed_loop_hydroponic")
}

#[fixture]
pub fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
