//! City registry: which file holds each city's trips and which columns it has.
//!
//! The registry is built from an immutable [`RegistryConfig`]. The built-in
//! default covers the three published cities; a JSON file can replace it:
//! ```json
//! {
//!   "data_dir": "data",
//!   "months": ["january", "february", "march", "april", "may", "june"],
//!   "cities": [
//!     { "id": "washington", "source": "washington.csv",
//!       "columns": ["End Time", "Start Station", "End Station", "User Type"] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::dataset::{Field, Schema};
use crate::error::{Error, Result};
use crate::source::Location;

const DEFAULT_MONTHS: [&str; 6] = ["january", "february", "march", "april", "may", "june"];

/// One supported city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    pub id: String,
    /// File name, path or `http(s)` URL of the trip file.
    pub source: String,
    /// Optional columns the file provides. `Start Time` is always implied.
    #[serde(default)]
    pub columns: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Month names that can be selected; position + 1 is the calendar month.
    #[serde(default = "default_months")]
    pub months: Vec<String>,
    pub cities: Vec<CityEntry>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_months() -> Vec<String> {
    DEFAULT_MONTHS.iter().map(|m| m.to_string()).collect()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        use Field::*;

        let city = |id: &str, source: &str, columns: &[Field]| CityEntry {
            id: id.to_string(),
            source: source.to_string(),
            columns: columns.to_vec(),
        };

        RegistryConfig {
            data_dir: default_data_dir(),
            months: default_months(),
            cities: vec![
                city(
                    "chicago",
                    "chicago.csv",
                    &[EndTime, StartStation, EndStation, UserType, Gender, BirthYear],
                ),
                city(
                    "new york city",
                    "new_york_city.csv",
                    &[EndTime, StartStation, EndStation, UserType, Gender, BirthYear],
                ),
                city(
                    "washington",
                    "washington.csv",
                    &[EndTime, StartStation, EndStation, UserType],
                ),
            ],
        }
    }
}

impl RegistryConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        let config: RegistryConfig = serde_json::from_str(&content)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        if config.cities.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "{}: no cities configured",
                path.display()
            )));
        }
        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

/// Where a city's trips live and which columns to expect there.
#[derive(Debug, Clone, PartialEq)]
pub struct CitySource {
    pub location: Location,
    pub expected: Schema,
}

#[derive(Debug, Clone)]
pub struct CityRegistry {
    config: RegistryConfig,
}

impl CityRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    /// Resolves a city id (case-insensitive) to its source and expected columns.
    pub fn resolve(&self, city_id: &str) -> Result<CitySource> {
        let wanted = city_id.trim().to_lowercase();
        let entry = self
            .config
            .cities
            .iter()
            .find(|c| c.id.to_lowercase() == wanted)
            .ok_or_else(|| Error::UnknownCity(city_id.to_string()))?;

        let location = Location::parse(&entry.source, &self.config.data_dir);
        debug!(city = %entry.id, location = %location, "Resolved city source");

        Ok(CitySource {
            location,
            expected: Schema::from_fields(entry.columns.iter().copied()),
        })
    }

    /// Configured city ids, in configuration order.
    pub fn city_ids(&self) -> impl Iterator<Item = &str> {
        self.config.cities.iter().map(|c| c.id.as_str())
    }

    pub fn months(&self) -> &[String] {
        &self.config.months
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}
