#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for generating the map's JSON artifacts from flat source
//! files.
//!
//! Every artifact is a pure function of the loaded inputs: the
//! provincial and regional choropleth collections, the per-province
//! metrics table, the census-division heatmap, the city markers, and
//! the per-city night skies. Source loading is sequential and each
//! file degrades independently, so the binary always produces the
//! artifacts it still can.
//!
//! Supports checksum-based caching: a manifest file tracks an md5
//! digest per input file so unchanged data is not re-rendered. Each
//! output is tracked independently, allowing partial regeneration
//! after interrupted runs or when only some outputs are missing.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use econ_map_choropleth::{
    allocate::{allocate_by_area, allocate_by_population},
    bands::{DivisionBand, contribution_bands},
};
use econ_map_datasets::{
    DatasetError, DatasetPaths, Datasets, census, gdp, listings, load_all, sample,
};
use econ_map_economy_models::{City, GdpTable, PropertyListing};
use econ_map_geography::{
    DivisionBoundary, GeographyError, bbox_area, load_division_boundaries,
    load_province_boundaries,
};
use econ_map_geography_models::{CensusDivision, province_info, sgc};
use econ_map_layers::{
    MapData, Scope, ViewState, choropleth_features, city_features, division_features,
};
use econ_map_metrics::{
    aggregate_regions, apply_regional_gdp, build_province_economies, build_province_metrics,
};
use econ_map_nightsky::star_field;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current manifest schema version. Bump this when the manifest format
/// changes in a backward-incompatible way.
const MANIFEST_VERSION: u32 = 1;

/// Output name constant for the provincial choropleth collection.
pub const OUTPUT_PROVINCES: &str = "provinces";

/// Output name constant for the per-province metrics table.
pub const OUTPUT_PROVINCE_METRICS: &str = "province-metrics";

/// Output name constant for the regional choropleth collection.
pub const OUTPUT_REGIONS: &str = "regions";

/// Output name constant for the census-division heatmap collection.
pub const OUTPUT_CENSUS_DIVISIONS: &str = "census-divisions";

/// Output name constant for the city marker collection.
pub const OUTPUT_CITIES: &str = "cities";

/// Every fixed-name output, in generation order.
pub const ALL_OUTPUTS: &[&str] = &[
    OUTPUT_PROVINCES,
    OUTPUT_PROVINCE_METRICS,
    OUTPUT_REGIONS,
    OUTPUT_CENSUS_DIVISIONS,
    OUTPUT_CITIES,
];

/// Input file names under the data directory.
const INPUT_GDP: &str = "province-level-gdp.csv";
const INPUT_REGIONAL_GDP: &str = "region-level-gdp.csv";
const INPUT_INCOME: &str = "personal-income.csv";
const INPUT_CENSUS_DIVISIONS: &str = "census_division_gdp_2021.csv";
const INPUT_CITIES: &str = "cities.json";
const INPUT_LISTINGS: &str = "property-listings.csv";
const INPUT_PROVINCE_BOUNDARIES: &str = "canada.geojson";
const INPUT_DIVISION_BOUNDARIES: &str = "canada_census_divisions.geojson";
const INPUT_CENSUS_PROFILE: &str = "provinces/98-401-X2021020_English_CSV_data.csv";

/// Every input that participates in the change-detection fingerprint.
const INPUT_FILES: &[&str] = &[
    INPUT_GDP,
    INPUT_REGIONAL_GDP,
    INPUT_INCOME,
    INPUT_CENSUS_DIVISIONS,
    INPUT_CITIES,
    INPUT_LISTINGS,
    INPUT_PROVINCE_BOUNDARIES,
    INPUT_DIVISION_BOUNDARIES,
    INPUT_CENSUS_PROFILE,
];

/// Column order of the census allocation artifact.
const CENSUS_ARTIFACT_HEADER: &str =
    "cd_uid,province_code,province_name,population_2021,gdp_2021_millions";

/// Errors that can occur while generating artifacts.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An artifact or the manifest failed to serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A dataset load failed beyond what degradation covers.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// A boundary file failed to load.
    #[error("Boundary error: {0}")]
    Boundary(#[from] GeographyError),

    /// Inputs were readable but semantically unusable.
    #[error("Normalization error: {message}")]
    Normalization {
        /// Description of what went wrong.
        message: String,
    },
}

/// Shared arguments for all generate subcommands.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Directory holding the source data files.
    pub data_dir: PathBuf,

    /// Directory artifacts are written into.
    pub out_dir: PathBuf,

    /// Pretty-print JSON artifacts.
    pub pretty: bool,

    /// Force regeneration even if input files haven't changed.
    pub force: bool,
}

/// Generation manifest stored at `out_dir/manifest.json`.
///
/// Records the input checksums at the time of last generation so
/// subsequent runs can skip unchanged outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Manifest {
    version: u32,
    /// Map of input file name to md5 digest at last generation.
    /// Missing inputs are absent, so a file appearing later changes
    /// the fingerprint set.
    inputs: BTreeMap<String, String>,
    /// Map of output name to ISO 8601 timestamp of last successful
    /// generation.
    outputs: BTreeMap<String, String>,
}

/// Runs the generation pipeline with manifest-based caching.
///
/// Compares current input checksums against the stored manifest to
/// determine which `requested_outputs` actually need regeneration.
/// Skips outputs that are already up-to-date unless `--force` is
/// specified.
///
/// # Errors
///
/// Returns an error if an artifact or the manifest cannot be written.
/// Missing or unreadable input files are not errors; they degrade to
/// empty collections per file.
pub fn run_with_cache(
    args: &GenerateArgs,
    requested_outputs: &[&str],
) -> Result<(), GenerateError> {
    let current_inputs = fingerprint_inputs(&args.data_dir);
    log::info!("Checksummed {} input files", current_inputs.len());

    let mut manifest = load_manifest(&args.out_dir);

    // Determine what needs regeneration
    let needs: BTreeMap<&str, bool> = requested_outputs
        .iter()
        .map(|&name| {
            let path = output_file_path(&args.out_dir, name);
            let needed =
                output_needs_regen(manifest.as_ref(), &current_inputs, name, &path, args.force);
            (name, needed)
        })
        .collect();

    if needs.values().all(|&needed| !needed) {
        log::info!("All requested outputs are up-to-date, nothing to regenerate");
        return Ok(());
    }

    for (&name, &needed) in &needs {
        if needed {
            log::info!("{name}: needs regeneration");
        } else {
            log::info!("{name}: up-to-date, skipping");
        }
    }

    // Ensure we have a manifest to update
    let manifest = manifest.get_or_insert_with(|| Manifest {
        version: MANIFEST_VERSION,
        inputs: BTreeMap::new(),
        outputs: BTreeMap::new(),
    });

    let Datasets {
        mut gdp,
        regional_gdp,
        income,
        census_divisions,
        cities,
        listings: _,
    } = load_all(&dataset_paths(&args.data_dir));

    if gdp.is_empty() {
        log::warn!("Provincial GDP table is empty; falling back to the embedded sample");
        gdp = sample::sample_gdp();
    }

    let economies = build_province_economies(&gdp);
    let mut regions = aggregate_regions(&economies);
    apply_regional_gdp(&mut regions, &regional_gdp);
    let metrics = build_province_metrics(&economies);

    // Boundaries are only read when a choropleth output is stale.
    let needs_boundaries = needs.get(OUTPUT_PROVINCES) == Some(&true)
        || needs.get(OUTPUT_REGIONS) == Some(&true);
    let boundaries = if needs_boundaries {
        boundaries_or_empty(
            load_province_boundaries(&args.data_dir.join(INPUT_PROVINCE_BOUNDARIES)),
            "province boundaries",
        )
    } else {
        Vec::new()
    };

    let data = MapData {
        boundaries,
        economies,
        regions,
        incomes: income,
    };

    if needs.get(OUTPUT_PROVINCES) == Some(&true) {
        let collection = choropleth_features(&data, ViewState::default());
        write_artifact(args, OUTPUT_PROVINCES, &collection)?;
        record_output(manifest, OUTPUT_PROVINCES);
        save_manifest(&args.out_dir, manifest)?;
    }

    if needs.get(OUTPUT_PROVINCE_METRICS) == Some(&true) {
        write_artifact(args, OUTPUT_PROVINCE_METRICS, &metrics)?;
        record_output(manifest, OUTPUT_PROVINCE_METRICS);
        save_manifest(&args.out_dir, manifest)?;
    }

    if needs.get(OUTPUT_REGIONS) == Some(&true) {
        let view = ViewState::default().with_scope(Scope::Region);
        let collection = choropleth_features(&data, view);
        write_artifact(args, OUTPUT_REGIONS, &collection)?;
        record_output(manifest, OUTPUT_REGIONS);
        save_manifest(&args.out_dir, manifest)?;
    }

    if needs.get(OUTPUT_CENSUS_DIVISIONS) == Some(&true) {
        let division_boundaries = boundaries_or_empty(
            load_division_boundaries(&args.data_dir.join(INPUT_DIVISION_BOUNDARIES)),
            "division boundaries",
        );
        let bands = division_bands(&census_divisions, &division_boundaries, &gdp);
        let collection = division_features(&division_boundaries, &bands);
        write_artifact(args, OUTPUT_CENSUS_DIVISIONS, &collection)?;
        record_output(manifest, OUTPUT_CENSUS_DIVISIONS);
        save_manifest(&args.out_dir, manifest)?;
    }

    if needs.get(OUTPUT_CITIES) == Some(&true) {
        let all_cities: Vec<City> = cities.into_values().flatten().collect();
        let collection = city_features(&all_cities);
        write_artifact(args, OUTPUT_CITIES, &collection)?;
        record_output(manifest, OUTPUT_CITIES);
        save_manifest(&args.out_dir, manifest)?;
    }

    // Update manifest with current input checksums
    manifest.inputs = current_inputs;
    manifest.version = MANIFEST_VERSION;
    save_manifest(&args.out_dir, manifest)?;

    Ok(())
}

/// Generates the night-sky artifact for one city.
///
/// The output name carries the city slug, so skies for different
/// cities cache independently. Canvas size is not part of the
/// fingerprint; pass `--force` when changing it.
///
/// # Errors
///
/// Returns an error if the artifact or manifest cannot be written.
pub fn run_night_sky(
    args: &GenerateArgs,
    city: &str,
    width: f64,
    height: f64,
) -> Result<(), GenerateError> {
    let output_name = format!("night-sky-{}", city_slug(city));
    let current_inputs = fingerprint_inputs(&args.data_dir);
    let mut manifest = load_manifest(&args.out_dir);
    let output_path = output_file_path(&args.out_dir, &output_name);

    if !output_needs_regen(
        manifest.as_ref(),
        &current_inputs,
        &output_name,
        &output_path,
        args.force,
    ) {
        log::info!("{output_name}: up-to-date, skipping");
        return Ok(());
    }

    let all_listings = listings::load_listings_or_empty(&args.data_dir.join(INPUT_LISTINGS));
    let in_city: Vec<PropertyListing> = listings::listings_for_city(&all_listings, city)
        .into_iter()
        .cloned()
        .collect();
    if in_city.is_empty() {
        log::warn!("No listings found for {city}; writing an empty sky");
    }

    let sky = star_field(&in_city, width, height);
    write_artifact(args, &output_name, &sky)?;

    let manifest = manifest.get_or_insert_with(|| Manifest {
        version: MANIFEST_VERSION,
        inputs: BTreeMap::new(),
        outputs: BTreeMap::new(),
    });
    record_output(manifest, &output_name);
    manifest.inputs = current_inputs;
    manifest.version = MANIFEST_VERSION;
    save_manifest(&args.out_dir, manifest)
}

/// Builds the census allocation artifact from the raw profile.
///
/// Splits each province's 2021 GDP across its census divisions in
/// proportion to 2021 population and writes the allocation CSV back
/// into the data directory, where the heatmap builder picks it up.
/// When the profile yields nothing, division uids are taken from the
/// boundary file instead and provinces split equally.
///
/// # Errors
///
/// Returns [`GenerateError::Normalization`] if no provincial GDP is
/// available, or an IO error if the artifact cannot be written.
pub fn run_allocate_census(args: &GenerateArgs) -> Result<(), GenerateError> {
    let gdp = gdp::load_province_gdp_or_empty(&args.data_dir.join(INPUT_GDP));
    if gdp.is_empty() {
        return Err(GenerateError::Normalization {
            message: format!(
                "No provincial GDP table under {}; nothing to allocate",
                args.data_dir.display()
            ),
        });
    }

    let mut divisions =
        census::load_census_profile_or_empty(&args.data_dir.join(INPUT_CENSUS_PROFILE));
    if divisions.is_empty() {
        log::warn!("Census profile yielded no divisions, deriving them from boundaries");
        let boundaries = boundaries_or_empty(
            load_division_boundaries(&args.data_dir.join(INPUT_DIVISION_BOUNDARIES)),
            "division boundaries",
        );
        divisions = divisions_from_boundaries(&boundaries);
    }

    let allocated = allocate_divisions(&divisions, &gdp);
    if allocated.is_empty() {
        return Err(GenerateError::Normalization {
            message: "No census divisions matched a province with 2021 GDP".to_string(),
        });
    }

    let path = args.data_dir.join(INPUT_CENSUS_DIVISIONS);
    fs::write(&path, census_artifact_csv(&allocated))?;
    log::info!(
        "Allocated GDP across {} census divisions into {}",
        allocated.len(),
        path.display()
    );

    Ok(())
}

/// Splits provincial 2021 GDP across divisions by population weight.
///
/// Output order is by province, then by each province's allocation
/// order. Divisions whose province has no 2021 GDP value drop out,
/// matching the per-row skip policy everywhere else.
#[must_use]
pub fn allocate_divisions(divisions: &[CensusDivision], gdp: &GdpTable) -> Vec<CensusDivision> {
    let mut grouped: BTreeMap<&'static str, Vec<CensusDivision>> = BTreeMap::new();
    for division in divisions {
        grouped
            .entry(division.province_id())
            .or_default()
            .push(division.clone());
    }

    grouped
        .into_iter()
        .filter_map(|(province_id, members)| {
            let total = gdp.get(province_id).and_then(|years| years.get(&2021))?;
            Some(allocate_by_population(&members, *total))
        })
        .flatten()
        .collect()
}

/// Renders allocation rows in the artifact column order, with GDP at
/// three decimals. A division without an allocation leaves the GDP
/// field empty, which reads back as `None`.
#[must_use]
pub fn census_artifact_csv(divisions: &[CensusDivision]) -> String {
    let mut out = String::from(CENSUS_ARTIFACT_HEADER);
    out.push('\n');

    for division in divisions {
        let gdp = division
            .gdp_2021_millions
            .map_or_else(String::new, |value| format!("{value:.3}"));
        let line = format!(
            "{},{},{},{},{gdp}",
            division.cd_uid, division.province_code, division.province_name, division.population_2021
        );
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Builds contribution bands for every division, one province at a
/// time.
///
/// Allocated GDP from the census artifact is used when present. When
/// no division carries an allocation, provincial 2021 totals are
/// spread over bounding-box areas instead, so the heatmap still
/// renders from boundaries alone.
#[must_use]
pub fn division_bands(
    divisions: &[CensusDivision],
    boundaries: &[DivisionBoundary],
    gdp: &GdpTable,
) -> Vec<DivisionBand> {
    let mut allocated: BTreeMap<&str, Vec<(&str, f64)>> = BTreeMap::new();
    for division in divisions {
        if let Some(value) = division.gdp_2021_millions {
            allocated
                .entry(division.province_id())
                .or_default()
                .push((division.cd_uid.as_str(), value));
        }
    }

    if !allocated.is_empty() {
        return allocated
            .values()
            .flat_map(|pairs| contribution_bands(pairs))
            .collect();
    }

    log::info!("No allocated census divisions, estimating from boundary areas");
    let mut areas: BTreeMap<&str, Vec<(&str, f64)>> = BTreeMap::new();
    for boundary in boundaries {
        areas
            .entry(sgc::province_id(&boundary.province_code))
            .or_default()
            .push((boundary.cd_uid.as_str(), bbox_area(boundary.bbox)));
    }

    areas
        .into_iter()
        .filter_map(|(province_id, division_areas)| {
            let total = gdp.get(province_id).and_then(|years| years.get(&2021))?;
            let allocations = allocate_by_area(&division_areas, *total);
            let pairs: Vec<(&str, f64)> = allocations
                .iter()
                .map(|allocation| (allocation.cd_uid.as_str(), allocation.gdp_millions))
                .collect();
            Some(contribution_bands(&pairs))
        })
        .flatten()
        .collect()
}

/// Computes the md5 digest of a file in 256 KiB chunks.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn compute_md5(path: &Path) -> Result<String, GenerateError> {
    let mut file = fs::File::open(path)?;
    let mut context = md5::Context::new();
    let mut buffer = vec![0u8; 256 * 1024];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        context.consume(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", context.finalize()))
}

/// Resolves the conventional dataset locations under the data
/// directory.
fn dataset_paths(data_dir: &Path) -> DatasetPaths {
    DatasetPaths {
        gdp: data_dir.join(INPUT_GDP),
        regional_gdp: data_dir.join(INPUT_REGIONAL_GDP),
        income: data_dir.join(INPUT_INCOME),
        census_divisions: data_dir.join(INPUT_CENSUS_DIVISIONS),
        cities: data_dir.join(INPUT_CITIES),
        listings: data_dir.join(INPUT_LISTINGS),
    }
}

/// Checksums every input file that exists. Missing files stay out of
/// the map, so their later appearance invalidates the manifest.
fn fingerprint_inputs(data_dir: &Path) -> BTreeMap<String, String> {
    let mut inputs = BTreeMap::new();

    for name in INPUT_FILES {
        let path = data_dir.join(name);
        if !path.exists() {
            continue;
        }

        match compute_md5(&path) {
            Ok(digest) => {
                inputs.insert((*name).to_string(), digest);
            }
            Err(e) => log::warn!("Failed to checksum {}: {e}", path.display()),
        }
    }

    inputs
}

/// Builds placeholder divisions from boundary uids with equal weight.
fn divisions_from_boundaries(boundaries: &[DivisionBoundary]) -> Vec<CensusDivision> {
    boundaries
        .iter()
        .map(|boundary| {
            let id = sgc::province_id(&boundary.province_code);

            CensusDivision {
                cd_uid: boundary.cd_uid.clone(),
                province_code: boundary.province_code.clone(),
                province_name: province_info(id).map_or(id, |info| info.name).to_string(),
                population_2021: 1.0,
                gdp_2021_millions: None,
            }
        })
        .collect()
}

/// Collapses a boundary load failure into an empty list with a
/// warning.
fn boundaries_or_empty<T>(result: Result<Vec<T>, GeographyError>, label: &str) -> Vec<T> {
    match result {
        Ok(boundaries) => boundaries,
        Err(e) => {
            log::warn!("Failed to load {label}: {e}; continuing with empty data");
            Vec::new()
        }
    }
}

/// Serializes one artifact into the output directory, pretty or
/// compact per the args.
fn write_artifact<T: Serialize>(
    args: &GenerateArgs,
    output_name: &str,
    value: &T,
) -> Result<(), GenerateError> {
    let path = output_file_path(&args.out_dir, output_name);
    let contents = if args.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    fs::write(&path, contents)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Loads the generation manifest from `dir/manifest.json`.
///
/// Returns `None` if the file does not exist or cannot be parsed.
fn load_manifest(dir: &Path) -> Option<Manifest> {
    let path = dir.join("manifest.json");
    let Ok(contents) = fs::read_to_string(&path) else {
        log::info!("No existing manifest found");
        return None;
    };
    match serde_json::from_str(&contents) {
        Ok(m) => {
            log::info!("Loaded manifest from {}", path.display());
            Some(m)
        }
        Err(e) => {
            log::warn!("Failed to parse manifest {}: {e}", path.display());
            None
        }
    }
}

/// Writes the generation manifest to `dir/manifest.json`.
///
/// Uses an atomic write pattern (write to `.tmp`, then rename) to
/// avoid corrupt manifests from interrupted writes.
fn save_manifest(dir: &Path, manifest: &Manifest) -> Result<(), GenerateError> {
    let path = dir.join("manifest.json");
    let tmp_path = dir.join("manifest.json.tmp");
    let contents = serde_json::to_string_pretty(manifest)?;
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, &path)?;
    log::debug!("Saved manifest to {}", path.display());
    Ok(())
}

/// Records a successful output generation in the manifest.
fn record_output(manifest: &mut Manifest, output_name: &str) {
    manifest
        .outputs
        .insert(output_name.to_string(), chrono::Utc::now().to_rfc3339());
}

/// Returns the file path for a given output name.
fn output_file_path(dir: &Path, output_name: &str) -> PathBuf {
    match output_name {
        OUTPUT_PROVINCES => dir.join("provinces.geojson"),
        OUTPUT_PROVINCE_METRICS => dir.join("province-metrics.json"),
        OUTPUT_REGIONS => dir.join("regions.geojson"),
        OUTPUT_CENSUS_DIVISIONS => dir.join("census-divisions.geojson"),
        OUTPUT_CITIES => dir.join("cities.json"),
        _ => dir.join(format!("{output_name}.json")),
    }
}

/// Lowercase file-name slug for a city: spaces become hyphens.
fn city_slug(city: &str) -> String {
    city.trim().to_lowercase().replace(' ', "-")
}

/// Determines whether a specific output needs regeneration.
///
/// Returns `true` if any of: `force` is set, no manifest exists,
/// manifest version mismatch, input checksums changed, output not
/// recorded in manifest, or output file missing from disk.
fn output_needs_regen(
    manifest: Option<&Manifest>,
    current_inputs: &BTreeMap<String, String>,
    output_name: &str,
    output_path: &Path,
    force: bool,
) -> bool {
    if force {
        return true;
    }

    let Some(m) = manifest else {
        return true;
    };

    if m.version != MANIFEST_VERSION {
        return true;
    }

    if m.inputs != *current_inputs {
        return true;
    }

    if !m.outputs.contains_key(output_name) {
        return true;
    }

    if !output_path.exists() {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn division(cd_uid: &str, population: f64, gdp: Option<f64>) -> CensusDivision {
        let code = &cd_uid[..2];
        let id = sgc::province_id(code);

        CensusDivision {
            cd_uid: cd_uid.to_string(),
            province_code: code.to_string(),
            province_name: province_info(id).map_or(id, |info| info.name).to_string(),
            population_2021: population,
            gdp_2021_millions: gdp,
        }
    }

    fn gdp_table(entries: &[(&'static str, f64)]) -> GdpTable {
        entries
            .iter()
            .map(|&(id, value)| {
                let years: BTreeMap<u16, f64> = [(2021, value)].into_iter().collect();
                (id, years)
            })
            .collect()
    }

    fn manifest_with(inputs: &[(&str, &str)], outputs: &[&str]) -> Manifest {
        Manifest {
            version: MANIFEST_VERSION,
            inputs: inputs
                .iter()
                .map(|&(name, digest)| (name.to_string(), digest.to_string()))
                .collect(),
            outputs: outputs
                .iter()
                .map(|&name| (name.to_string(), "2024-01-01T00:00:00+00:00".to_string()))
                .collect(),
        }
    }

    #[test]
    fn allocation_conserves_each_provincial_total() {
        let divisions = [
            division("3520", 3_000_000.0, None),
            division("3521", 1_000_000.0, None),
            division("4811", 1_500_000.0, None),
        ];
        let gdp = gdp_table(&[("on", 800_000.0), ("ab", 300_000.0)]);

        let allocated = allocate_divisions(&divisions, &gdp);

        let ontario: f64 = allocated
            .iter()
            .filter(|division| division.province_code == "35")
            .filter_map(|division| division.gdp_2021_millions)
            .sum();
        assert!((ontario - 800_000.0).abs() < 1e-6);

        let toronto = allocated
            .iter()
            .find(|division| division.cd_uid == "3520")
            .unwrap();
        assert!((toronto.gdp_2021_millions.unwrap() - 600_000.0).abs() < 1e-6);
    }

    #[test]
    fn provinces_without_gdp_drop_their_divisions() {
        let divisions = [
            division("3520", 100.0, None),
            division("6204", 1_000.0, None),
        ];
        let gdp = gdp_table(&[("on", 500.0)]);

        let allocated = allocate_divisions(&divisions, &gdp);

        assert_eq!(allocated.len(), 1);
        assert_eq!(allocated[0].cd_uid, "3520");
    }

    #[test]
    fn artifact_rows_round_gdp_to_three_decimals() {
        let rows = [
            division("3520", 2_794_356.0, Some(399_731.123_456)),
            division("2466", 2_004_265.0, None),
        ];

        let csv = census_artifact_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], CENSUS_ARTIFACT_HEADER);
        assert_eq!(lines[1], "3520,35,Ontario,2794356,399731.123");
        assert_eq!(lines[2], "2466,24,Quebec,2004265,");
    }

    #[test]
    fn the_artifact_reads_back_through_the_census_parser() {
        let divisions = [
            division("3520", 3_000.0, None),
            division("3521", 1_000.0, None),
        ];
        let gdp = gdp_table(&[("on", 100.0)]);

        let csv = census_artifact_csv(&allocate_divisions(&divisions, &gdp));
        let parsed = census::parse_census_divisions(&csv).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].gdp_2021_millions, Some(75.0));
        assert_eq!(parsed[1].gdp_2021_millions, Some(25.0));
    }

    #[test]
    fn allocated_divisions_band_by_contribution() {
        let divisions = [
            division("3520", 0.0, Some(750.0)),
            division("3521", 0.0, Some(250.0)),
            division("4811", 0.0, Some(40.0)),
        ];
        let gdp = gdp_table(&[]);

        let bands = division_bands(&divisions, &[], &gdp);

        assert_eq!(bands.len(), 3);
        let toronto = bands.iter().find(|band| band.cd_uid == "3520").unwrap();
        assert_eq!(toronto.band, 0);
        let second = bands.iter().find(|band| band.cd_uid == "3521").unwrap();
        assert_eq!(second.band, 6);
        let alberta = bands.iter().find(|band| band.cd_uid == "4811").unwrap();
        assert_eq!(alberta.band, 0);
    }

    #[test]
    fn output_paths_follow_artifact_names() {
        let dir = Path::new("out");

        assert_eq!(
            output_file_path(dir, OUTPUT_PROVINCES),
            dir.join("provinces.geojson")
        );
        assert_eq!(
            output_file_path(dir, OUTPUT_PROVINCE_METRICS),
            dir.join("province-metrics.json")
        );
        assert_eq!(
            output_file_path(dir, "night-sky-calgary"),
            dir.join("night-sky-calgary.json")
        );
    }

    #[test]
    fn city_slugs_are_lowercase_and_hyphenated() {
        assert_eq!(city_slug("Calgary"), "calgary");
        assert_eq!(city_slug(" Quebec City "), "quebec-city");
    }

    #[test]
    fn force_and_missing_manifests_trigger_regeneration() {
        let inputs: BTreeMap<String, String> = BTreeMap::new();
        let existing = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");

        assert!(output_needs_regen(None, &inputs, "provinces", &existing, false));

        let manifest = manifest_with(&[], &["provinces"]);
        assert!(output_needs_regen(
            Some(&manifest),
            &inputs,
            "provinces",
            &existing,
            true
        ));
        assert!(!output_needs_regen(
            Some(&manifest),
            &inputs,
            "provinces",
            &existing,
            false
        ));
    }

    #[test]
    fn changed_checksums_invalidate_every_output() {
        let manifest = manifest_with(&[("province-level-gdp.csv", "aaaa")], &["provinces"]);
        let existing = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");

        let same: BTreeMap<String, String> =
            [("province-level-gdp.csv".to_string(), "aaaa".to_string())]
                .into_iter()
                .collect();
        assert!(!output_needs_regen(
            Some(&manifest),
            &same,
            "provinces",
            &existing,
            false
        ));

        let changed: BTreeMap<String, String> =
            [("province-level-gdp.csv".to_string(), "bbbb".to_string())]
                .into_iter()
                .collect();
        assert!(output_needs_regen(
            Some(&manifest),
            &changed,
            "provinces",
            &existing,
            false
        ));
    }

    #[test]
    fn unrecorded_or_missing_outputs_regenerate() {
        let manifest = manifest_with(&[], &["provinces"]);
        let inputs: BTreeMap<String, String> = BTreeMap::new();
        let existing = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");

        assert!(output_needs_regen(
            Some(&manifest),
            &inputs,
            "regions",
            &existing,
            false
        ));
        assert!(output_needs_regen(
            Some(&manifest),
            &inputs,
            "provinces",
            Path::new("out/provinces.geojson"),
            false
        ));
    }
}
