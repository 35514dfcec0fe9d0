//! The financial roll-up of a simulated scenario.
//!
//! Monetary inputs arrive as user-supplied text. Anything which cannot be read as a finite number
//! is treated as zero rather than rejected, so a half-typed value never stops the computation.
use crate::simulation::ResourceConsumption;
use crate::units::{
    MoneyPerArea, MoneyPerCubicMetre, MoneyPerHectare, MoneyPerKilogram, YieldPerArea,
};
use log::warn;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Default sale price of the fruit
pub const DEFAULT_PRICE_PER_KG: MoneyPerKilogram = MoneyPerKilogram::new(3.50);

/// Default price of irrigation water
pub const DEFAULT_WATER_COST_PER_M3: MoneyPerCubicMetre = MoneyPerCubicMetre::new(1.00);

/// Default price of fertiliser
pub const DEFAULT_FERTILISER_COST_PER_KG: MoneyPerKilogram = MoneyPerKilogram::new(2.50);

/// Default for all other variable costs (labour, plants, energy, ...)
pub const DEFAULT_OTHER_COSTS_PER_HECTARE: MoneyPerHectare = MoneyPerHectare::new(5000.0);

/// Read a monetary amount from text, returning `None` unless it is a finite number
fn try_parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Read a monetary amount from text, falling back to zero
pub fn parse_amount(text: &str) -> f64 {
    try_parse_amount(text).unwrap_or(0.0)
}

/// A monetary amount as written in a scenario file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// A TOML integer or float
    Number(f64),
    /// A string which may or may not contain a number
    Text(String),
    /// Anything else (booleans, arrays, tables)
    Other(IgnoredAny),
}

impl RawAmount {
    /// The numeric value, if it is a finite number
    fn parse(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value).filter(|value| value.is_finite()),
            Self::Text(text) => try_parse_amount(text),
            Self::Other(_) => None,
        }
    }
}

/// Get the value of an optional amount, using `default` if it is absent
fn amount_or_default(name: &str, raw: Option<&RawAmount>, default: f64) -> f64 {
    let Some(raw) = raw else {
        return default;
    };

    raw.parse().unwrap_or_else(|| {
        warn!("Could not read {name} from {raw:?}; treating it as zero");
        0.0
    })
}

/// The monetary inputs of a scenario file, each of which may be missing or malformed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFinancialParameters {
    /// Sale price (€/kg)
    pub price_per_kg: Option<RawAmount>,
    /// Water cost (€/m³)
    pub water_cost_per_m3: Option<RawAmount>,
    /// Fertiliser cost (€/kg)
    pub fertiliser_cost_per_kg: Option<RawAmount>,
    /// Other variable costs (€/ha)
    pub other_costs_per_hectare: Option<RawAmount>,
}

/// Prices and costs used to turn simulated quantities into money
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancialParameters {
    /// Sale price of the fruit
    pub price_per_kg: MoneyPerKilogram,
    /// Price of irrigation water
    pub water_cost_per_m3: MoneyPerCubicMetre,
    /// Price of fertiliser
    pub fertiliser_cost_per_kg: MoneyPerKilogram,
    /// All other variable costs
    pub other_costs_per_hectare: MoneyPerHectare,
}

impl Default for FinancialParameters {
    fn default() -> Self {
        Self {
            price_per_kg: DEFAULT_PRICE_PER_KG,
            water_cost_per_m3: DEFAULT_WATER_COST_PER_M3,
            fertiliser_cost_per_kg: DEFAULT_FERTILISER_COST_PER_KG,
            other_costs_per_hectare: DEFAULT_OTHER_COSTS_PER_HECTARE,
        }
    }
}

impl FinancialParameters {
    /// Read parameters from user-supplied text.
    ///
    /// Any value which does not parse as a finite number becomes zero.
    pub fn from_text(
        price_per_kg: &str,
        water_cost_per_m3: &str,
        fertiliser_cost_per_kg: &str,
        other_costs_per_hectare: &str,
    ) -> Self {
        Self {
            price_per_kg: MoneyPerKilogram(parse_amount(price_per_kg)),
            water_cost_per_m3: MoneyPerCubicMetre(parse_amount(water_cost_per_m3)),
            fertiliser_cost_per_kg: MoneyPerKilogram(parse_amount(fertiliser_cost_per_kg)),
            other_costs_per_hectare: MoneyPerHectare(parse_amount(other_costs_per_hectare)),
        }
    }

    /// Resolve the parameters of a scenario file.
    ///
    /// Absent values take their defaults; malformed ones become zero.
    pub fn from_raw(raw: &RawFinancialParameters) -> Self {
        let defaults = Self::default();
        Self {
            price_per_kg: MoneyPerKilogram(amount_or_default(
                "price_per_kg",
                raw.price_per_kg.as_ref(),
                defaults.price_per_kg.value(),
            )),
            water_cost_per_m3: MoneyPerCubicMetre(amount_or_default(
                "water_cost_per_m3",
                raw.water_cost_per_m3.as_ref(),
                defaults.water_cost_per_m3.value(),
            )),
            fertiliser_cost_per_kg: MoneyPerKilogram(amount_or_default(
                "fertiliser_cost_per_kg",
                raw.fertiliser_cost_per_kg.as_ref(),
                defaults.fertiliser_cost_per_kg.value(),
            )),
            other_costs_per_hectare: MoneyPerHectare(amount_or_default(
                "other_costs_per_hectare",
                raw.other_costs_per_hectare.as_ref(),
                defaults.other_costs_per_hectare.value(),
            )),
        }
    }
}

/// Revenue, costs and profit per square metre.
///
/// Costs are positive magnitudes, so that
/// `revenue == cost_water + cost_fertiliser + cost_other + gross_profit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancialResult {
    /// Income from selling the yield
    pub revenue: MoneyPerArea,
    /// Cost of irrigation water
    pub cost_water: MoneyPerArea,
    /// Cost of fertiliser
    pub cost_fertiliser: MoneyPerArea,
    /// All other variable costs
    pub cost_other: MoneyPerArea,
    /// Revenue minus all costs
    pub gross_profit: MoneyPerArea,
}

impl FinancialResult {
    /// The sum of all costs
    pub fn total_costs(&self) -> MoneyPerArea {
        self.cost_water + self.cost_fertiliser + self.cost_other
    }
}

/// Calculate the financial performance of a simulated yield and resource consumption
pub fn simulate_financials(
    yield_per_area: YieldPerArea,
    resources: &ResourceConsumption,
    parameters: &FinancialParameters,
) -> FinancialResult {
    let revenue = yield_per_area * parameters.price_per_kg;
    let cost_water = resources.water * parameters.water_cost_per_m3;
    let cost_fertiliser = resources.fertiliser * parameters.fertiliser_cost_per_kg;
    let cost_other = parameters.other_costs_per_hectare.per_square_metre();

    let mut result = FinancialResult {
        revenue,
        cost_water,
        cost_fertiliser,
        cost_other,
        gross_profit: MoneyPerArea(0.0),
    };
    result.gross_profit = revenue - result.total_costs();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{FertiliserPerArea, WaterPerArea};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn resources(water: f64, fertiliser: f64) -> ResourceConsumption {
        ResourceConsumption {
            water: WaterPerArea(water),
            fertiliser: FertiliserPerArea(fertiliser),
        }
    }

    #[test]
    fn test_simulate_financials() {
        let result = simulate_financials(
            YieldPerArea(8.0),
            &resources(400.0, 0.012),
            &FinancialParameters::from_text("3.50", "1.00", "2.50", "5000"),
        );
        assert_approx_eq!(MoneyPerArea, result.revenue, MoneyPerArea(28.0));
        assert_approx_eq!(MoneyPerArea, result.cost_water, MoneyPerArea(0.4));
        assert_approx_eq!(MoneyPerArea, result.cost_fertiliser, MoneyPerArea(0.03));
        assert_approx_eq!(MoneyPerArea, result.cost_other, MoneyPerArea(0.5));
        assert_approx_eq!(
            MoneyPerArea,
            result.gross_profit,
            MoneyPerArea(27.07),
            epsilon = 1e-9
        );
    }

    #[rstest]
    #[case(0.0, 0.0, 0.0)]
    #[case(8.0, 400.0, 0.012)]
    #[case(2.5, 1234.5, 0.5)]
    #[case(9.99, 0.0, 0.0)]
    fn test_financials_balance(#[case] yield_: f64, #[case] water: f64, #[case] fertiliser: f64) {
        let result = simulate_financials(
            YieldPerArea(yield_),
            &resources(water, fertiliser),
            &FinancialParameters::default(),
        );
        assert_approx_eq!(
            MoneyPerArea,
            result.revenue,
            result.total_costs() + result.gross_profit,
            epsilon = 1e-9
        );
    }

    #[rstest]
    #[case("3.5", 3.5)]
    #[case(" 2.25 ", 2.25)]
    #[case("", 0.0)]
    #[case("abc", 0.0)]
    #[case("1,00", 0.0)]
    #[case("NaN", 0.0)]
    #[case("inf", 0.0)]
    fn test_parse_amount(#[case] text: &str, #[case] expected: f64) {
        assert_approx_eq!(f64, parse_amount(text), expected);
    }

    #[rstest]
    #[case::price(["abc", "1.00", "2.50", "5000"], ["0", "1.00", "2.50", "5000"])]
    #[case::water(["3.50", "n/a", "2.50", "5000"], ["3.50", "0", "2.50", "5000"])]
    #[case::fertiliser(["3.50", "1.00", "?", "5000"], ["3.50", "1.00", "0", "5000"])]
    #[case::other(["3.50", "1.00", "2.50", "five"], ["3.50", "1.00", "2.50", "0"])]
    fn test_malformed_text_same_as_zero(#[case] malformed: [&str; 4], #[case] zeroed: [&str; 4]) {
        let simulate = |[price, water, fertiliser, other]: [&str; 4]| {
            simulate_financials(
                YieldPerArea(8.0),
                &resources(400.0, 0.012),
                &FinancialParameters::from_text(price, water, fertiliser, other),
            )
        };
        assert_eq!(simulate(malformed), simulate(zeroed));
    }

    #[test]
    fn test_from_raw_defaults() {
        assert_eq!(
            FinancialParameters::from_raw(&RawFinancialParameters::default()),
            FinancialParameters::default()
        );
    }

    #[test]
    fn test_from_raw_malformed() {
        let raw: RawFinancialParameters = toml::from_str(
            "price_per_kg = 4\nwater_cost_per_m3 = \"1,5\"\nfertiliser_cost_per_kg = true",
        )
        .unwrap();
        assert_eq!(
            FinancialParameters::from_raw(&raw),
            FinancialParameters {
                price_per_kg: MoneyPerKilogram(4.0),
                water_cost_per_m3: MoneyPerCubicMetre(0.0),
                fertiliser_cost_per_kg: MoneyPerKilogram(0.0),
                other_costs_per_hectare: DEFAULT_OTHER_COSTS_PER_HECTARE,
            }
        );
    }
}
