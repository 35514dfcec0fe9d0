//! The production calendar: how the annual harvest is spread over the months of the year.
use crate::units::{Dimensionless, YieldPerArea};
use chrono::Month;
use serde::Serialize;

/// One month of the production calendar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarMonth {
    /// The month
    pub month: Month,
    /// Percentage of the annual production harvested in this month
    pub share_percent: u32,
    /// The main agronomic activity in this month
    pub activity: &'static str,
}

/// Production calendar for a Mediterranean strawberry season, January to December
pub const PRODUCTION_CALENDAR: [CalendarMonth; 12] = [
    CalendarMonth {
        month: Month::January,
        share_percent: 5,
        activity: "Vegetative regrowth and first harvests of the earliest varieties",
    },
    CalendarMonth {
        month: Month::February,
        share_percent: 8,
        activity: "Early harvests intensify; full flowering",
    },
    CalendarMonth {
        month: Month::March,
        share_percent: 18,
        activity: "Production peak begins for the main cultivars",
    },
    CalendarMonth {
        month: Month::April,
        share_percent: 28,
        activity: "Harvest peak and highest market demand",
    },
    CalendarMonth {
        month: Month::May,
        share_percent: 23,
        activity: "Full production, declining towards the end of the month",
    },
    CalendarMonth {
        month: Month::June,
        share_percent: 8,
        activity: "Late harvests and end of the production season",
    },
    CalendarMonth {
        month: Month::July,
        share_percent: 2,
        activity: "Harvest ends; plants removed and soil prepared",
    },
    CalendarMonth {
        month: Month::August,
        share_percent: 2,
        activity: "Soil solarisation for disinfection",
    },
    CalendarMonth {
        month: Month::September,
        share_percent: 2,
        activity: "Soil preparation and first transplants for the new cycle",
    },
    CalendarMonth {
        month: Month::October,
        share_percent: 2,
        activity: "Main transplanting of new rooted plants",
    },
    CalendarMonth {
        month: Month::November,
        share_percent: 1,
        activity: "Early vegetative growth of the new plants",
    },
    CalendarMonth {
        month: Month::December,
        share_percent: 1,
        activity: "Vegetative rest or minimal growth before regrowth",
    },
];

/// The share of an annual yield harvested in one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyYield {
    /// Name of the month
    pub month: &'static str,
    /// Percentage of the annual production
    pub share_percent: u32,
    /// Yield harvested in this month
    pub yield_per_area: YieldPerArea,
}

/// Split an annual yield across the months of the production calendar
pub fn monthly_yield(annual: YieldPerArea) -> Vec<MonthlyYield> {
    PRODUCTION_CALENDAR
        .iter()
        .map(|entry| MonthlyYield {
            month: entry.month.name(),
            share_percent: entry.share_percent,
            yield_per_area: annual * Dimensionless(f64::from(entry.share_percent) / 100.0),
        })
        .collect()
}
