#![allow(missing_docs)]

//! This module defines the unit types used by the engine and their conversions.
//!
//! All quantities are expressed per square metre of cultivated area unless stated otherwise.
use serde::{Deserialize, Serialize};

/// Litres in a cubic metre
const LITRES_PER_CUBIC_METRE: f64 = 1000.0;

/// Square metres in a hectare
const SQUARE_METRES_PER_HECTARE: f64 = 10_000.0;

/// Represents a dimensionless quantity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub const fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl float_cmp::ApproxEq for $name {
            type Margin = float_cmp::F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                float_cmp::ApproxEq::approx_eq(self.0, other.0, margin)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

// Quantities per unit of cultivated area
unit_struct!(YieldPerArea);
unit_struct!(WaterPerArea);
unit_struct!(FertiliserPerArea);
unit_struct!(MoneyPerArea);

// Prices and costs
unit_struct!(MoneyPerKilogram);
unit_struct!(MoneyPerCubicMetre);
unit_struct!(MoneyPerHectare);

// Multiplication rules
impl_mul!(YieldPerArea, MoneyPerKilogram, MoneyPerArea);
impl_mul!(FertiliserPerArea, MoneyPerKilogram, MoneyPerArea);

impl WaterPerArea {
    /// Convert litres per m² into cubic metres per m²
    pub fn cubic_metres(self) -> f64 {
        self.0 / LITRES_PER_CUBIC_METRE
    }
}

impl std::ops::Mul<MoneyPerCubicMetre> for WaterPerArea {
    type Output = MoneyPerArea;

    fn mul(self, rhs: MoneyPerCubicMetre) -> MoneyPerArea {
        MoneyPerArea(self.cubic_metres() * rhs.0)
    }
}

impl MoneyPerHectare {
    /// Spread a per-hectare amount over a single square metre
    pub fn per_square_metre(self) -> MoneyPerArea {
        MoneyPerArea(self.0 / SQUARE_METRES_PER_HECTARE)
    }
}
