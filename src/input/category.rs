//! Code for reading the category catalogue from a CSV file.
use super::{TableSource, input_err_msg};
use crate::factor::Factor;
use crate::tables::{Category, CategoryMap};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use strum::IntoEnumIterator;

const CATEGORIES_FILE_NAME: &str = "categories.csv";

/// A row of the categories CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct CategoryRaw {
    factor: Factor,
    id: String,
    description: String,
}

/// Read the catalogue of categories for every factor.
///
/// # Arguments
///
/// * `source` - Where to read table files from
///
/// # Returns
///
/// The categories grouped by factor, in canonical factor order
pub fn read_categories(source: &TableSource) -> Result<CategoryMap> {
    let categories_raw = source.read_csv(CATEGORIES_FILE_NAME)?;
    read_categories_from_iter(categories_raw.into_iter())
        .with_context(|| input_err_msg(source.file_path(CATEGORIES_FILE_NAME)))
}

fn read_categories_from_iter<I>(iter: I) -> Result<CategoryMap>
where
    I: Iterator<Item = CategoryRaw>,
{
    let mut map: CategoryMap = Factor::iter()
        .map(|factor| (factor, IndexMap::new()))
        .collect();

    for raw in iter {
        ensure!(
            !raw.id.is_empty(),
            "Empty category ID for factor {}",
            raw.factor
        );

        let category = Category {
            id: raw.id.into(),
            description: raw.description,
        };
        let categories = map.entry(raw.factor).or_default();
        ensure!(
            !categories.contains_key(&category.id),
            "Duplicate category {} for factor {}",
            category.id,
            raw.factor
        );
        categories.insert(category.id.clone(), category);
    }

    for (factor, categories) in &map {
        ensure!(
            !categories.is_empty(),
            "No categories defined for factor {factor}"
        );
    }

    Ok(map)
}
