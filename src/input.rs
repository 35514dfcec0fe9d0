//! Common routines for handling input data.
use crate::factor::{CategoryID, Factor};
use crate::id::IDCollection;
use crate::tables::{CategoryMap, FactorTable, ModelTables};
use anyhow::{Context, Result, ensure};
use include_dir::{Dir, include_dir};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

mod category;
use category::read_categories;
mod resource_impact;
use resource_impact::read_resource_impacts;
pub mod scenario;
mod yield_weight;
use yield_weight::read_yield_weights;

/// The copy of the factor tables which is embedded in the program
const BUILTIN_TABLES_DIR: Dir = include_dir!("data");

/// Where the factor table files are read from
#[derive(Debug, Clone, Copy)]
pub enum TableSource<'a> {
    /// The tables embedded in the program
    Builtin,
    /// A folder containing user-supplied table files
    Directory(&'a Path),
}

impl TableSource<'_> {
    /// The path to a table file, used for error messages
    fn file_path(&self, file_name: &str) -> PathBuf {
        match self {
            Self::Builtin => ["<built-in>", file_name].iter().collect(),
            Self::Directory(dir) => dir.join(file_name),
        }
    }

    /// Read a table file into a `Vec<T>`
    fn read_csv<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>> {
        match self {
            Self::Builtin => {
                let file = BUILTIN_TABLES_DIR
                    .get_file(file_name)
                    .with_context(|| format!("Built-in table {file_name} not found"))?;
                read_csv_from_reader(file.contents(), &self.file_path(file_name))
            }
            Self::Directory(dir) => read_csv(&dir.join(file_name)),
        }
    }
}

/// Read a series of type `T`s from a CSV file.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let file = File::open(file_path).with_context(|| input_err_msg(file_path))?;
    read_csv_from_reader(file, file_path)
}

/// Read a series of type `T`s from CSV data, returning an error if there are none
fn read_csv_from_reader<T, R>(reader: R, file_path: &Path) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let vec: Vec<T> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .with_context(|| input_err_msg(file_path))?;
    ensure!(
        !vec.is_empty(),
        "CSV file {} cannot be empty",
        file_path.display()
    );

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Assemble a [`FactorTable`] from `(factor, category, value)` rows.
///
/// Every category in `categories` must appear exactly once and no other categories may appear.
fn build_factor_table<T, I>(categories: &CategoryMap, rows: I) -> Result<FactorTable<T>>
where
    I: IntoIterator<Item = (Factor, String, T)>,
{
    let mut map: IndexMap<Factor, IndexMap<CategoryID, T>> = categories
        .keys()
        .map(|factor| (*factor, IndexMap::new()))
        .collect();

    for (factor, category, value) in rows {
        let id = categories
            .get(&factor)
            .with_context(|| format!("Unknown factor {factor}"))?
            .get_id_by_str(&category)
            .with_context(|| format!("Invalid category for factor {factor}"))?;
        let entries = map.entry(factor).or_default();
        ensure!(
            entries.insert(id.clone(), value).is_none(),
            "Duplicate entry for category {id} of factor {factor}"
        );
    }

    for (factor, known) in categories {
        for id in known.keys() {
            ensure!(
                map[factor].contains_key(id),
                "Missing entry for category {id} of factor {factor}"
            );
        }
    }

    Ok(FactorTable::new(map))
}

/// Read all the factor tables from the given source.
///
/// The category catalogue is read first and used to validate the other tables.
pub fn load_tables(source: TableSource) -> Result<ModelTables> {
    let categories = read_categories(&source)?;
    let yield_weights = read_yield_weights(&source, &categories)?;
    let resource_impacts = read_resource_impacts(&source, &categories)?;

    Ok(ModelTables {
        categories,
        yield_weights,
        resource_impacts,
    })
}
