//! The immutable factor tables which describe the effect of every category.
use crate::factor::{CategoryID, Factor, Interval};
use crate::input::{TableSource, load_tables};
use crate::scenario::{ScenarioError, ScenarioInput};
use anyhow::Result;
use indexmap::IndexMap;
use std::path::Path;
use std::sync::OnceLock;

/// The built-in tables, parsed on first use
static BUILTIN_TABLES: OnceLock<ModelTables> = OnceLock::new();

/// A category which can be chosen for a factor
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Unique identifier within the factor (e.g. "sub_cold")
    pub id: CategoryID,
    /// Human-readable description (e.g. "12-17°C")
    pub description: String,
}

/// The catalogue of categories available for each factor, in canonical factor order
pub type CategoryMap = IndexMap<Factor, IndexMap<CategoryID, Category>>;

/// A value for every (factor, category) pair
#[derive(Debug, Clone, PartialEq)]
pub struct FactorTable<T>(IndexMap<Factor, IndexMap<CategoryID, T>>);

impl<T> FactorTable<T> {
    /// Create a new [`FactorTable`]
    pub fn new(map: IndexMap<Factor, IndexMap<CategoryID, T>>) -> Self {
        Self(map)
    }

    /// Look up the entry for a factor's category
    pub fn get(&self, factor: Factor, category: &CategoryID) -> Result<&T, ScenarioError> {
        self.0
            .get(&factor)
            .and_then(|categories| categories.get(category))
            .ok_or_else(|| ScenarioError::UnknownCategory {
                factor,
                category: category.clone(),
            })
    }

    /// Look up the entries for every factor of a scenario, in canonical factor order.
    ///
    /// Either every lookup succeeds or an error is returned.
    pub fn resolve(&self, input: &ScenarioInput) -> Result<Vec<&T>, ScenarioError> {
        input
            .iter_complete()
            .map(|result| {
                let (factor, category) = result?;
                self.get(factor, category)
            })
            .collect()
    }

    /// Iterate over every entry in the table
    pub fn iter(&self) -> impl Iterator<Item = (Factor, &CategoryID, &T)> {
        self.0.iter().flat_map(|(factor, categories)| {
            categories
                .iter()
                .map(move |(category, value)| (*factor, category, value))
        })
    }
}

/// The signed fractional change in consumption caused by a category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceImpact {
    /// Change in water consumption
    pub water: Interval,
    /// Change in fertiliser consumption
    pub fertiliser: Interval,
}

/// Multiplicative yield intervals
pub type YieldWeightTable = FactorTable<Interval>;

/// Additive resource-consumption deltas
pub type ResourceImpactTable = FactorTable<ResourceImpact>;

/// All the tables needed to simulate a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTables {
    /// Categories available for every factor
    pub categories: CategoryMap,
    /// Yield weight for every category
    pub yield_weights: YieldWeightTable,
    /// Resource impact of every category
    pub resource_impacts: ResourceImpactTable,
}

impl ModelTables {
    /// The tables embedded in the program.
    ///
    /// These are parsed the first time this function is called.
    pub fn builtin() -> &'static ModelTables {
        BUILTIN_TABLES.get_or_init(|| {
            load_tables(TableSource::Builtin).expect("Built-in factor tables are invalid")
        })
    }

    /// Read the tables from the CSV files in `tables_dir`
    pub fn from_path<P: AsRef<Path>>(tables_dir: P) -> Result<ModelTables> {
        load_tables(TableSource::Directory(tables_dir.as_ref()))
    }

    /// Check that every factor of `input` has a category known to all tables
    pub fn check_input(&self, input: &ScenarioInput) -> Result<(), ScenarioError> {
        self.yield_weights.resolve(input)?;
        self.resource_impacts.resolve(input)?;

        Ok(())
    }

    /// Get the description of a factor's category
    pub fn describe(&self, factor: Factor, category: &CategoryID) -> Option<&str> {
        self.categories
            .get(&factor)?
            .get(category)
            .map(|category| category.description.as_str())
    }
}
