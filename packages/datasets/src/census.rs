//! Census division parsing: the GDP allocation artifact and the raw
//! Statistics Canada census profile.
//!
//! The artifact is produced by the `allocate-census` pipeline step:
//! one row per census division with its 2021 population and the slice
//! of provincial GDP allocated to it. Divisions the allocation could
//! not cover carry an empty GDP field, which parses as `None`.
//!
//! The raw profile (98-401 export) is the allocation step's input. It
//! is a long-format file with one row per (geography, characteristic)
//! pair, shipped in Windows-1252 rather than UTF-8, so it is decoded
//! field by field.

use std::{collections::BTreeMap, fs, path::Path};

use econ_map_geography_models::{CensusDivision, province_info, sgc};

use crate::{DatasetError, header_index, parse_numeric};

/// Level marker for census-division rows in the profile export.
const PROFILE_DIVISION_LEVEL: &str = "Census division";

/// Header candidates for the profile columns we read.
const PROFILE_LEVEL_HEADERS: &[&str] = &["GEO_LEVEL"];
const PROFILE_UID_HEADERS: &[&str] = &["ALT_GEO_CODE"];
const PROFILE_CHARACTERISTIC_HEADERS: &[&str] = &["CHARACTERISTIC_NAME"];
const PROFILE_COUNT_HEADERS: &[&str] = &["C1_COUNT_TOTAL"];

/// Column positions in the 98-401 export, used when no header matches.
const PROFILE_LEVEL_FALLBACK: usize = 3;
const PROFILE_UID_FALLBACK: usize = 2;
const PROFILE_CHARACTERISTIC_FALLBACK: usize = 9;
const PROFILE_COUNT_FALLBACK: usize = 11;

/// Loads census division rows from a CSV file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or the CSV
/// envelope is malformed.
pub fn load_census_divisions(path: &Path) -> Result<Vec<CensusDivision>, DatasetError> {
    let text = fs::read_to_string(path)?;
    let divisions = parse_census_divisions(&text)?;

    log::info!(
        "Loaded {} census divisions from {}",
        divisions.len(),
        path.display()
    );

    Ok(divisions)
}

/// Like [`load_census_divisions`], degrading failure to an empty list.
#[must_use]
pub fn load_census_divisions_or_empty(path: &Path) -> Vec<CensusDivision> {
    crate::or_empty(load_census_divisions(path), "census division table")
}

/// Parses census division rows from CSV text. Rows whose uid does not
/// nest under their recorded province code are skipped.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV header row cannot be read.
pub fn parse_census_divisions(text: &str) -> Result<Vec<CensusDivision>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut divisions = Vec::new();

    for result in reader.deserialize::<CensusDivision>() {
        let division = match result {
            Ok(d) => d,
            Err(e) => {
                log::trace!("skipping malformed census division row: {e}");
                continue;
            }
        };

        if !division.uid_matches_province() {
            log::warn!(
                "skipping census division {}: uid does not nest under province {}",
                division.cd_uid,
                division.province_code
            );
            continue;
        }

        divisions.push(division);
    }

    Ok(divisions)
}

/// Loads census divisions from a raw Statistics Canada profile export.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or the CSV
/// envelope is malformed.
pub fn load_census_profile(path: &Path) -> Result<Vec<CensusDivision>, DatasetError> {
    let bytes = fs::read(path)?;
    let divisions = parse_census_profile(&bytes)?;

    log::info!(
        "Loaded {} census divisions from profile {}",
        divisions.len(),
        path.display()
    );

    Ok(divisions)
}

/// Like [`load_census_profile`], degrading failure to an empty list.
#[must_use]
pub fn load_census_profile_or_empty(path: &Path) -> Vec<CensusDivision> {
    crate::or_empty(load_census_profile(path), "census profile")
}

/// Parses census-division populations from raw profile bytes.
///
/// Only rows at the census-division geography level are considered,
/// de-duplicated by uid. The population comes from the first
/// characteristic row naming a population total; divisions where no
/// such row parses carry a weight of `1`, so a province whose profile
/// lacks population counts still splits equally downstream. The GDP
/// field is always `None` here; allocation fills it in later.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV header row cannot be read.
pub fn parse_census_profile(bytes: &[u8]) -> Result<Vec<CensusDivision>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers = csv::StringRecord::from(
        reader
            .byte_headers()?
            .iter()
            .map(|header| String::from_utf8_lossy(header).into_owned())
            .collect::<Vec<_>>(),
    );
    let level_idx = header_index(&headers, PROFILE_LEVEL_HEADERS, PROFILE_LEVEL_FALLBACK);
    let uid_idx = header_index(&headers, PROFILE_UID_HEADERS, PROFILE_UID_FALLBACK);
    let characteristic_idx = header_index(
        &headers,
        PROFILE_CHARACTERISTIC_HEADERS,
        PROFILE_CHARACTERISTIC_FALLBACK,
    );
    let count_idx = header_index(&headers, PROFILE_COUNT_HEADERS, PROFILE_COUNT_FALLBACK);

    let mut populations: BTreeMap<String, Option<f64>> = BTreeMap::new();

    for result in reader.byte_records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("skipping malformed profile row: {e}");
                continue;
            }
        };

        if profile_field(&record, level_idx) != PROFILE_DIVISION_LEVEL {
            continue;
        }

        let cd_uid = profile_field(&record, uid_idx);
        if cd_uid.get(..2).and_then(sgc::resolve).is_none() {
            continue;
        }

        let population = populations.entry(cd_uid).or_insert(None);
        if population.is_some() {
            continue;
        }

        let characteristic = profile_field(&record, characteristic_idx).to_lowercase();
        if characteristic.contains("population")
            && (characteristic.contains("total") || characteristic.contains("2021"))
        {
            *population = parse_numeric(&profile_field(&record, count_idx))
                .filter(|count| *count > 0.0);
        }
    }

    let divisions = populations
        .into_iter()
        .filter_map(|(cd_uid, population)| {
            let id = cd_uid.get(..2).and_then(sgc::resolve)?;
            let province_code = cd_uid.get(..2)?.to_string();

            Some(CensusDivision {
                cd_uid,
                province_code,
                province_name: province_info(id).map_or(id, |info| info.name).to_string(),
                population_2021: population.unwrap_or(1.0),
                gdp_2021_millions: None,
            })
        })
        .collect();

    Ok(divisions)
}

/// Decodes one field of a byte record, tolerating the Windows-1252
/// bytes Statistics Canada ships in place of UTF-8.
fn profile_field(record: &csv::ByteRecord, index: usize) -> String {
    record
        .get(index)
        .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT: &str = "\
cd_uid,province_code,province_name,population_2021,gdp_2021_millions
3520,35,Ontario,2794356.0,399731.123
3521,35,Ontario,1451022.0,207577.517
2466,24,Quebec,2004265.0,
4811,48,Alberta,1487395.0,22646.011
9901,35,Ontario,1000.0,5.0
";

    #[test]
    fn rows_parse_with_optional_gdp() {
        let divisions = parse_census_divisions(ARTIFACT).unwrap();

        assert_eq!(divisions.len(), 4);
        assert_eq!(divisions[0].cd_uid, "3520");
        assert_eq!(divisions[0].gdp_2021_millions, Some(399_731.123));
        assert_eq!(divisions[2].gdp_2021_millions, None);
        assert_eq!(divisions[2].province_id(), "qc");
    }

    #[test]
    fn mismatched_uid_prefix_is_skipped() {
        let divisions = parse_census_divisions(ARTIFACT).unwrap();

        assert!(divisions.iter().all(|division| division.cd_uid != "9901"));
    }

    const PROFILE: &str = "\
CENSUS_YEAR,DGUID,ALT_GEO_CODE,GEO_LEVEL,GEO_NAME,TNR_SF,TNR_LF,DATA_QUALITY_FLAG,CHARACTERISTIC_ID,CHARACTERISTIC_NAME,CHARACTERISTIC_NOTE,C1_COUNT_TOTAL
2021,2021A000224,24,Province,Quebec,2.2,3.9,0,1,\"Population, 2021\",1,8501833
2021,2021A00033520,3520,Census division,Toronto,2.5,4.1,0,1,\"Population, 2021\",1,2794356
2021,2021A00033520,3520,Census division,Toronto,2.5,4.1,0,2,\"Population, 2016\",1,2731571
2021,2021A00032466,2466,Census division,Montr?al,2.1,3.7,0,6,Total - Age groups of the population - 100% data,,2004265
2021,2021A00034811,4811,Census division,Division No. 11,2.0,3.5,0,3,Land area in square kilometres,,25192.4
2021,2021A00039901,9901,Census division,Atlantis,0,0,0,1,\"Population, 2021\",1,1000
";

    #[test]
    fn profile_rows_reduce_to_one_division_each() {
        let divisions = parse_census_profile(PROFILE.as_bytes()).unwrap();

        assert_eq!(divisions.len(), 3);
        let toronto = divisions
            .iter()
            .find(|division| division.cd_uid == "3520")
            .unwrap();
        assert_eq!(toronto.population_2021, 2_794_356.0);
        assert_eq!(toronto.province_code, "35");
        assert_eq!(toronto.province_name, "Ontario");
        assert_eq!(toronto.gdp_2021_millions, None);
    }

    #[test]
    fn age_group_totals_stand_in_for_population() {
        let divisions = parse_census_profile(PROFILE.as_bytes()).unwrap();

        let montreal = divisions
            .iter()
            .find(|division| division.cd_uid == "2466")
            .unwrap();
        assert_eq!(montreal.population_2021, 2_004_265.0);
    }

    #[test]
    fn divisions_without_population_counts_weigh_one() {
        let divisions = parse_census_profile(PROFILE.as_bytes()).unwrap();

        let unmeasured = divisions
            .iter()
            .find(|division| division.cd_uid == "4811")
            .unwrap();
        assert_eq!(unmeasured.population_2021, 1.0);
    }

    #[test]
    fn province_level_and_unknown_uid_rows_are_dropped() {
        let divisions = parse_census_profile(PROFILE.as_bytes()).unwrap();

        assert!(divisions.iter().all(|division| division.cd_uid != "24"));
        assert!(divisions.iter().all(|division| division.cd_uid != "9901"));
    }

    #[test]
    fn windows_1252_place_names_do_not_poison_the_row() {
        let mut bytes = PROFILE.as_bytes().to_vec();
        let marker = bytes.iter().position(|&b| b == b'?').unwrap();
        bytes[marker] = 0xE9;

        let divisions = parse_census_profile(&bytes).unwrap();

        assert!(divisions.iter().any(|division| division.cd_uid == "2466"));
    }
}
