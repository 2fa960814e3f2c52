#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Flat-file dataset loading.
//!
//! Each loader parses one source file into typed records keyed by a
//! natural id. Malformed or short rows are skipped without emitting a
//! partial record, and the `*_or_empty` variants degrade a missing or
//! unreadable file to an empty collection with a warning, so the rest
//! of the pipeline renders blanks instead of crashing.

pub mod census;
pub mod cities;
pub mod gdp;
pub mod income;
pub mod listings;
pub mod sample;

use std::path::PathBuf;

use econ_map_economy_models::PropertyListing;
use econ_map_geography_models::CensusDivision;
use thiserror::Error;

use crate::{
    cities::CityTable,
    gdp::{GdpTable, RegionalGdpTable},
    income::IncomeTable,
};

/// Errors that can occur while loading datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Source file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Locations of the flat files the loaders consume.
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub gdp: PathBuf,
    pub regional_gdp: PathBuf,
    pub income: PathBuf,
    pub census_divisions: PathBuf,
    pub cities: PathBuf,
    pub listings: PathBuf,
}

/// Every loaded dataset, bundled.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub gdp: GdpTable,
    pub regional_gdp: RegionalGdpTable,
    pub income: IncomeTable,
    pub census_divisions: Vec<CensusDivision>,
    pub cities: CityTable,
    pub listings: Vec<PropertyListing>,
}

/// Loads every dataset, degrading each unreadable file to an empty
/// collection independently so one bad file never takes down the rest.
#[must_use]
pub fn load_all(paths: &DatasetPaths) -> Datasets {
    Datasets {
        gdp: gdp::load_province_gdp_or_empty(&paths.gdp),
        regional_gdp: gdp::load_regional_gdp_or_empty(&paths.regional_gdp),
        income: income::load_income_or_empty(&paths.income),
        census_divisions: census::load_census_divisions_or_empty(&paths.census_divisions),
        cities: cities::load_cities_or_empty(&paths.cities),
        listings: listings::load_listings_or_empty(&paths.listings),
    }
}

/// Collapses a load failure into an empty collection with a warning.
pub(crate) fn or_empty<T: Default>(result: Result<T, DatasetError>, label: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to load {label}: {e}; continuing with empty data");
            T::default()
        }
    }
}

/// Parses a numeric field, tolerating thousands separators and
/// surrounding whitespace.
pub(crate) fn parse_numeric(field: &str) -> Option<f64> {
    let cleaned = field.trim().replace(',', "");

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse().ok().filter(|value: &f64| value.is_finite())
}

/// Returns the column index of the first header matching any
/// candidate, case-insensitively, or the positional fallback when no
/// header matches.
pub(crate) fn header_index(
    headers: &csv::StringRecord,
    candidates: &[&str],
    fallback: usize,
) -> usize {
    headers
        .iter()
        .position(|header| {
            candidates
                .iter()
                .any(|candidate| header.trim().eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_fields_tolerate_separators() {
        assert_eq!(parse_numeric("74,431.5"), Some(74_431.5));
        assert_eq!(parse_numeric("  12 "), Some(12.0));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("n/a"), None);
    }

    #[test]
    fn header_lookup_falls_back_to_position() {
        let headers = csv::StringRecord::from(vec!["REF_DATE", "GEO", "VALUE"]);

        assert_eq!(header_index(&headers, &["value"], 11), 2);
        assert_eq!(header_index(&headers, &["DGUID"], 11), 11);
    }

    #[test]
    fn missing_files_degrade_to_an_empty_bundle() {
        let missing = PathBuf::from("no-such-directory");
        let paths = DatasetPaths {
            gdp: missing.join("province-level-gdp.csv"),
            regional_gdp: missing.join("region-level-gdp.csv"),
            income: missing.join("personal-income.csv"),
            census_divisions: missing.join("census_division_gdp_2021.csv"),
            cities: missing.join("cities.json"),
            listings: missing.join("property-listings.csv"),
        };

        let datasets = load_all(&paths);

        assert!(datasets.gdp.is_empty());
        assert!(datasets.income.is_empty());
        assert!(datasets.census_divisions.is_empty());
        assert!(datasets.listings.is_empty());
    }
}
