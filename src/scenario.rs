//! A scenario is one complete set of agronomic choices: a category for every [`Factor`].
use crate::factor::{CategoryID, Factor};
use indexmap::IndexMap;
use strum::IntoEnumIterator;
use thiserror::Error;

/// Errors raised when a scenario cannot be evaluated against the factor tables
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    /// No category was chosen for a factor
    #[error("No category chosen for factor `{0}`")]
    MissingFactor(Factor),
    /// The chosen category does not exist for the factor
    #[error("Unknown category `{category}` for factor `{factor}`")]
    UnknownCategory {
        /// The factor being looked up
        factor: Factor,
        /// The category which was not found
        category: CategoryID,
    },
    /// A factor name which is not one of the known factors
    #[error("Unknown factor `{0}`")]
    UnknownFactor(String),
}

/// A mapping from each factor to the chosen category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioInput(IndexMap<Factor, CategoryID>);

impl ScenarioInput {
    /// Create an empty scenario
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scenario from (factor name, category) string pairs
    pub fn from_names<I, F, C>(pairs: I) -> Result<Self, ScenarioError>
    where
        I: IntoIterator<Item = (F, C)>,
        F: AsRef<str>,
        C: AsRef<str>,
    {
        let mut input = Self::new();
        for (factor, category) in pairs {
            let factor = factor.as_ref();
            let factor: Factor = factor
                .parse()
                .map_err(|_| ScenarioError::UnknownFactor(factor.to_string()))?;
            input.set(factor, category.as_ref());
        }

        Ok(input)
    }

    /// Choose a category for a factor, replacing any previous choice
    pub fn set(&mut self, factor: Factor, category: &str) {
        self.0.insert(factor, category.into());
    }

    /// Builder-style variant of [`ScenarioInput::set`]
    pub fn with(mut self, factor: Factor, category: &str) -> Self {
        self.set(factor, category);
        self
    }

    /// The category chosen for `factor`
    pub fn get(&self, factor: Factor) -> Result<&CategoryID, ScenarioError> {
        self.0
            .get(&factor)
            .ok_or(ScenarioError::MissingFactor(factor))
    }

    /// Iterate over every factor in canonical order with its chosen category.
    ///
    /// Fails on the first factor without a category.
    pub fn iter_complete(
        &self,
    ) -> impl Iterator<Item = Result<(Factor, &CategoryID), ScenarioError>> {
        Factor::iter().map(|factor| Ok((factor, self.get(factor)?)))
    }

    /// Check that every factor has a category
    pub fn check_complete(&self) -> Result<(), ScenarioError> {
        self.iter_complete().try_for_each(|result| result.map(|_| ()))
    }
}

impl FromIterator<(Factor, CategoryID)> for ScenarioInput {
    fn from_iter<T: IntoIterator<Item = (Factor, CategoryID)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::optimal_input;
    use rstest::rstest;

    #[rstest]
    fn test_get(optimal_input: ScenarioInput) {
        assert_eq!(
            optimal_input.get(Factor::Pollination).unwrap().as_str(),
            "bumblebee"
        );
    }

    #[rstest]
    fn test_missing_factor(mut optimal_input: ScenarioInput) {
        assert!(optimal_input.check_complete().is_ok());
        optimal_input.0.shift_remove(&Factor::Light);
        assert_eq!(
            optimal_input.check_complete(),
            Err(ScenarioError::MissingFactor(Factor::Light))
        );
    }

    #[test]
    fn test_from_names() {
        let input =
            ScenarioInput::from_names([("temperature", "optimal"), ("light", "low")]).unwrap();
        assert_eq!(input.get(Factor::Light).unwrap().as_str(), "low");
        assert_eq!(
            input.get(Factor::Irrigation),
            Err(ScenarioError::MissingFactor(Factor::Irrigation))
        );
    }

    #[test]
    fn test_from_names_unknown_factor() {
        assert_eq!(
            ScenarioInput::from_names([("soil_ph", "acid")]),
            Err(ScenarioError::UnknownFactor("soil_ph".into()))
        );
    }

    #[test]
    fn test_set_replaces() {
        let input = ScenarioInput::new()
            .with(Factor::Light, "low")
            .with(Factor::Light, "high");
        assert_eq!(input.get(Factor::Light).unwrap().as_str(), "high");
    }
}
