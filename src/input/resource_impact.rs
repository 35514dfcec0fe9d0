//! Code for reading the resource impact table from a CSV file.
use super::{TableSource, build_factor_table, input_err_msg};
use crate::factor::{Factor, Interval};
use crate::tables::{CategoryMap, ResourceImpact, ResourceImpactTable};
use anyhow::{Context, Result};
use serde::Deserialize;

const RESOURCE_IMPACTS_FILE_NAME: &str = "resource_impacts.csv";

/// A row of the resource impacts CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct ResourceImpactRaw {
    factor: Factor,
    category: String,
    water_min: f64,
    water_max: f64,
    fertiliser_min: f64,
    fertiliser_max: f64,
}

impl ResourceImpactRaw {
    /// Convert to a table row, checking both intervals are valid
    fn into_row(self) -> Result<(Factor, String, ResourceImpact)> {
        let context = || {
            format!(
                "Invalid resource impact for category {} of factor {}",
                self.category, self.factor
            )
        };
        let impact = ResourceImpact {
            water: Interval::new(self.water_min, self.water_max).with_context(context)?,
            fertiliser: Interval::new(self.fertiliser_min, self.fertiliser_max)
                .with_context(context)?,
        };

        Ok((self.factor, self.category, impact))
    }
}

/// Read the resource impact of every category.
///
/// Impacts are signed fractional changes, so negative values (savings) are allowed.
///
/// # Arguments
///
/// * `source` - Where to read table files from
/// * `categories` - The category catalogue
pub fn read_resource_impacts(
    source: &TableSource,
    categories: &CategoryMap,
) -> Result<ResourceImpactTable> {
    let impacts_raw = source.read_csv(RESOURCE_IMPACTS_FILE_NAME)?;
    read_resource_impacts_from_iter(impacts_raw.into_iter(), categories)
        .with_context(|| input_err_msg(source.file_path(RESOURCE_IMPACTS_FILE_NAME)))
}

fn read_resource_impacts_from_iter<I>(
    iter: I,
    categories: &CategoryMap,
) -> Result<ResourceImpactTable>
where
    I: Iterator<Item = ResourceImpactRaw>,
{
    let rows = iter
        .map(ResourceImpactRaw::into_row)
        .collect::<Result<Vec<_>>>()?;
    build_factor_table(categories, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, single_category_map};
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use strum::IntoEnumIterator;
    use tempfile::tempdir;

    /// Create an example resource impacts file in `dir_path`
    fn create_resource_impacts_file(dir_path: &Path) {
        let file_path = dir_path.join(RESOURCE_IMPACTS_FILE_NAME);
        let mut file = File::create(file_path).unwrap();
        writeln!(
            file,
            "factor,category,water_min,water_max,fertiliser_min,fertiliser_max"
        )
        .unwrap();
        for factor in Factor::iter() {
            writeln!(file, "{factor},only,-0.2,-0.1,0.0,0.05").unwrap();
        }
    }

    #[rstest]
    fn test_read_resource_impacts(single_category_map: CategoryMap) {
        let dir = tempdir().unwrap();
        create_resource_impacts_file(dir.path());
        let table =
            read_resource_impacts(&TableSource::Directory(dir.path()), &single_category_map)
                .unwrap();
        assert_eq!(table.iter().count(), 9);
        assert_eq!(
            *table
                .get(Factor::CultivationSystem, &"only".into())
                .unwrap(),
            ResourceImpact {
                water: Interval::new(-0.2, -0.1).unwrap(),
                fertiliser: Interval::new(0.0, 0.05).unwrap(),
            }
        );
    }

    #[rstest]
    #[case(0.0, 0.0, 0.1, -0.1)]
    #[case(-1e308, 1e308, 0.0, 0.0)]
    fn test_read_resource_impacts_bad_interval(
        single_category_map: CategoryMap,
        #[case] water_min: f64,
        #[case] water_max: f64,
        #[case] fertiliser_min: f64,
        #[case] fertiliser_max: f64,
    ) {
        let raw = Factor::iter().map(|factor| ResourceImpactRaw {
            factor,
            category: "only".into(),
            water_min,
            water_max,
            fertiliser_min,
            fertiliser_max,
        });
        assert_error!(
            read_resource_impacts_from_iter(raw, &single_category_map),
            "Invalid resource impact for category only of factor temperature"
        );
    }
}
