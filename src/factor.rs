//! Agronomic factors, the categories a user can choose for them and the intervals used to
//! describe each category's effect.
use crate::id::define_id_type;
use anyhow::{Result, ensure};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

define_id_type! {CategoryID}

/// The category of the cultivation system which recirculates its nutrient solution
pub const CLOSED_LOOP_HYDROPONIC: &str = "closed_loop_hydroponic";

/// An agronomic dimension subject to user choice.
///
/// The set is fixed: a scenario must choose exactly one category for every variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    /// Air temperature band
    Temperature,
    /// Hours of light per day
    Light,
    /// Relative humidity band
    RelativeHumidity,
    /// Irrigation method
    Irrigation,
    /// Fertilisation strategy
    Fertilisation,
    /// Pathogen-control strategy
    PathogenControl,
    /// How often the fruit is picked
    HarvestFrequency,
    /// Pollination method
    Pollination,
    /// Cultivation substrate system
    CultivationSystem,
}

impl Factor {
    /// A short human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Light => "Light",
            Self::RelativeHumidity => "Relative humidity",
            Self::Irrigation => "Irrigation",
            Self::Fertilisation => "Fertilisation",
            Self::PathogenControl => "Pathogen control",
            Self::HarvestFrequency => "Harvest frequency",
            Self::Pollination => "Pollination",
            Self::CultivationSystem => "Cultivation system",
        }
    }
}

/// A closed interval of real numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Interval {
    /// Create a new [`Interval`], checking that both bounds are finite and ordered
    pub fn new(min: f64, max: f64) -> Result<Self> {
        ensure!(
            min.is_finite() && max.is_finite(),
            "Interval bounds must be finite numbers"
        );
        ensure!(
            min <= max,
            "Interval lower bound ({min}) is greater than upper bound ({max})"
        );
        ensure!(
            (max - min).is_finite(),
            "Interval from {min} to {max} is too wide to sample from"
        );

        Ok(Self { min, max })
    }

    /// Draw a value uniformly from the interval
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..=self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(0.0, 0.0, true)]
    #[case(-0.5, 0.5, true)]
    #[case(1.0, 0.5, false)]
    #[case(f64::NAN, 1.0, false)]
    #[case(0.0, f64::INFINITY, false)]
    #[case(-1e308, 1e308, false)]
    #[case(-1e307, 1e307, true)]
    fn test_interval_new(#[case] min: f64, #[case] max: f64, #[case] valid: bool) {
        assert_eq!(Interval::new(min, max).is_ok(), valid);
    }

    #[test]
    fn test_interval_sample() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let interval = Interval::new(0.8, 0.9).unwrap();
        for _ in 0..1000 {
            let value = interval.sample(&mut rng);
            assert!((interval.min..=interval.max).contains(&value));
        }

        // Degenerate interval always gives the same value
        let point = Interval::new(0.25, 0.25).unwrap();
        assert_approx_eq!(f64, point.sample(&mut rng), 0.25);
    }

    #[test]
    fn test_factor_names() {
        assert_eq!(Factor::COUNT, 9);
        assert_eq!(
            "relative_humidity".parse::<Factor>().unwrap(),
            Factor::RelativeHumidity
        );
        assert!("soil_ph".parse::<Factor>().is_err());
        for factor in Factor::iter() {
            assert_eq!(factor.to_string().parse::<Factor>().unwrap(), factor);
        }
    }
}
