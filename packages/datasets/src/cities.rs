//! City GDP table loading.
//!
//! A static JSON object keyed by province, each key holding the
//! cities with estimated metropolitan GDP for that province. The
//! province id is injected into each record at parse time so a city
//! always knows its parent.

use std::{collections::BTreeMap, fs, path::Path};

use econ_map_economy_models::City;
use econ_map_geography_models::sgc;
use serde::Deserialize;

use crate::DatasetError;

/// Cities keyed by province id.
pub type CityTable = BTreeMap<&'static str, Vec<City>>;

/// A raw city entry, before the province id is attached.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCity {
    id: String,
    name: String,
    lat: f64,
    lng: f64,
    gdp: f64,
    population: u64,
    #[serde(default)]
    has_street_view: bool,
}

/// Loads the city table from a JSON file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or is not a
/// JSON object of city arrays.
pub fn load_cities(path: &Path) -> Result<CityTable, DatasetError> {
    let text = fs::read_to_string(path)?;
    let table = parse_cities(&text)?;

    let cities: usize = table.values().map(Vec::len).sum();
    log::info!(
        "Loaded {cities} cities across {} provinces from {}",
        table.len(),
        path.display()
    );

    Ok(table)
}

/// Like [`load_cities`], degrading failure to an empty table.
#[must_use]
pub fn load_cities_or_empty(path: &Path) -> CityTable {
    crate::or_empty(load_cities(path), "city table")
}

/// Parses the city table from JSON text. Entries under an unknown
/// province key are skipped.
///
/// # Errors
///
/// Returns [`DatasetError`] if the text is not a JSON object of city
/// arrays.
pub fn parse_cities(text: &str) -> Result<CityTable, DatasetError> {
    let raw: BTreeMap<String, Vec<RawCity>> = serde_json::from_str(text)?;

    let mut table = CityTable::new();

    for (province, raw_cities) in raw {
        let Some(province_id) = sgc::resolve(&province) else {
            log::warn!("Skipping cities under unknown province key: {province}");
            continue;
        };

        let cities = raw_cities
            .into_iter()
            .map(|city| City {
                id: city.id,
                name: city.name,
                province_id: province_id.to_string(),
                lat: city.lat,
                lng: city.lng,
                gdp: city.gdp,
                population: city.population,
                has_street_view: city.has_street_view,
            })
            .collect();

        table.insert(province_id, cities);
    }

    Ok(table)
}
