//! Provincial and regional GDP table parsing.
//!
//! The provincial table is a Statistics Canada CSV export where each
//! row carries an observation year, a geography name, and a value in
//! millions of chained 2017 dollars. Values above a thousand are
//! quoted with thousands separators, which is why numeric parsing
//! strips commas.

use std::{collections::BTreeMap, fs, path::Path};

pub use econ_map_economy_models::GdpTable;
use econ_map_geography_models::{Region, sgc};

use crate::{DatasetError, header_index, parse_numeric};

/// Regional GDP totals keyed by region.
pub type RegionalGdpTable = BTreeMap<Region, f64>;

/// Header candidates for the observation year column.
const YEAR_HEADERS: &[&str] = &["REF_DATE", "year"];

/// Header candidates for the geography name column.
const GEO_HEADERS: &[&str] = &["GEO", "geography", "province"];

/// Header candidates for the observation value column.
const VALUE_HEADERS: &[&str] = &["VALUE", "gdp_millions", "gdp"];

/// Header candidates for the region name column.
const REGION_HEADERS: &[&str] = &["region", "REGION"];

/// Column positions in the Statistics Canada export, used when no
/// header matches.
const YEAR_FALLBACK: usize = 0;
const GEO_FALLBACK: usize = 1;
const VALUE_FALLBACK: usize = 11;

/// Loads the provincial GDP table from a CSV file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or the CSV
/// envelope is malformed.
pub fn load_province_gdp(path: &Path) -> Result<GdpTable, DatasetError> {
    let text = fs::read_to_string(path)?;
    let table = parse_province_gdp(&text)?;

    log::info!(
        "Loaded GDP for {} provinces from {}",
        table.len(),
        path.display()
    );

    Ok(table)
}

/// Like [`load_province_gdp`], degrading failure to an empty table.
#[must_use]
pub fn load_province_gdp_or_empty(path: &Path) -> GdpTable {
    crate::or_empty(load_province_gdp(path), "province GDP table")
}

/// Parses the provincial GDP table from CSV text.
///
/// Rows with an unknown geography name, a missing year, or an
/// unparseable value are skipped.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV header row cannot be read.
pub fn parse_province_gdp(text: &str) -> Result<GdpTable, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let year_idx = header_index(&headers, YEAR_HEADERS, YEAR_FALLBACK);
    let geo_idx = header_index(&headers, GEO_HEADERS, GEO_FALLBACK);
    let value_idx = header_index(&headers, VALUE_HEADERS, VALUE_FALLBACK);

    let mut table = GdpTable::new();

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("skipping malformed GDP row: {e}");
                continue;
            }
        };

        let Some(year) = record
            .get(year_idx)
            .and_then(|year| year.trim().parse::<u16>().ok())
        else {
            continue;
        };

        let Some(id) = record.get(geo_idx).and_then(sgc::resolve) else {
            continue;
        };

        let Some(value) = record.get(value_idx).and_then(parse_numeric) else {
            continue;
        };

        table.entry(id).or_default().insert(year, value);
    }

    Ok(table)
}

/// Loads the regional GDP table from a CSV file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or the CSV
/// envelope is malformed.
pub fn load_regional_gdp(path: &Path) -> Result<RegionalGdpTable, DatasetError> {
    let text = fs::read_to_string(path)?;
    let table = parse_regional_gdp(&text)?;

    log::info!(
        "Loaded GDP for {} regions from {}",
        table.len(),
        path.display()
    );

    Ok(table)
}

/// Like [`load_regional_gdp`], degrading failure to an empty table.
#[must_use]
pub fn load_regional_gdp_or_empty(path: &Path) -> RegionalGdpTable {
    crate::or_empty(load_regional_gdp(path), "regional GDP table")
}

/// Parses the regional GDP table from CSV text. Rows naming an
/// unknown region are skipped.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV header row cannot be read.
pub fn parse_regional_gdp(text: &str) -> Result<RegionalGdpTable, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let region_idx = header_index(&headers, REGION_HEADERS, 0);
    let value_idx = header_index(&headers, VALUE_HEADERS, 1);

    let mut table = RegionalGdpTable::new();

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("skipping malformed regional GDP row: {e}");
                continue;
            }
        };

        let Some(region) = record
            .get(region_idx)
            .and_then(|name| name.trim().parse::<Region>().ok())
        else {
            continue;
        };

        let Some(value) = record.get(value_idx).and_then(parse_numeric) else {
            continue;
        };

        table.insert(region, value);
    }

    Ok(table)
}
