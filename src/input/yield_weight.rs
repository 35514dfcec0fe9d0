//! Code for reading the yield weight table from a CSV file.
use super::{TableSource, build_factor_table, input_err_msg};
use crate::factor::{Factor, Interval};
use crate::tables::{CategoryMap, YieldWeightTable};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;

const YIELD_WEIGHTS_FILE_NAME: &str = "yield_weights.csv";

/// A row of the yield weights CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct YieldWeightRaw {
    factor: Factor,
    category: String,
    min: f64,
    max: f64,
}

impl YieldWeightRaw {
    /// Convert to a table row, checking the interval is valid
    fn into_row(self) -> Result<(Factor, String, Interval)> {
        let interval = Interval::new(self.min, self.max).with_context(|| {
            format!(
                "Invalid yield weight for category {} of factor {}",
                self.category, self.factor
            )
        })?;
        ensure!(
            interval.min > 0.0,
            "Yield weight for category {} of factor {} must be greater than zero",
            self.category,
            self.factor
        );

        Ok((self.factor, self.category, interval))
    }
}

/// Read the yield weight of every category.
///
/// # Arguments
///
/// * `source` - Where to read table files from
/// * `categories` - The category catalogue
///
/// # Returns
///
/// A [`YieldWeightTable`] with an interval for every catalogued category
pub fn read_yield_weights(
    source: &TableSource,
    categories: &CategoryMap,
) -> Result<YieldWeightTable> {
    let weights_raw = source.read_csv(YIELD_WEIGHTS_FILE_NAME)?;
    read_yield_weights_from_iter(weights_raw.into_iter(), categories)
        .with_context(|| input_err_msg(source.file_path(YIELD_WEIGHTS_FILE_NAME)))
}

fn read_yield_weights_from_iter<I>(iter: I, categories: &CategoryMap) -> Result<YieldWeightTable>
where
    I: Iterator<Item = YieldWeightRaw>,
{
    let rows = iter.map(YieldWeightRaw::into_row).collect::<Result<Vec<_>>>()?;
    build_factor_table(categories, rows)
}
