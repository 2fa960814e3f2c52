#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Boundary polygon loading for provinces and census divisions.
//!
//! Parses `GeoJSON` boundary files into [`geo`] multipolygons with
//! derived centroids and bounding boxes. Features that cannot be
//! attributed to a known province are skipped with a warning so a
//! partially broken boundary file still yields a usable map.

use std::{fs, path::Path};

use econ_map_geography_models::sgc;
use geo::{BoundingRect, Centroid, Contains, MultiPolygon};
use geojson::{FeatureCollection, GeoJson};
use thiserror::Error;

/// Errors that can occur while loading boundary files.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// Boundary file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Property keys tried, in order, when resolving a feature's province
/// name. Public boundary files disagree on the key spelling.
const PROVINCE_NAME_PROPS: &[&str] = &["name", "NAME", "PRNAME", "PRENAME"];

/// Property keys tried, in order, for a census division's unique id.
const DIVISION_UID_PROPS: &[&str] = &["CDUID", "cduid", "cd_code"];

/// Property keys tried, in order, for a census division's parent
/// province code when the uid prefix is unusable.
const DIVISION_PROVINCE_PROPS: &[&str] = &["PRUID", "pruid", "prov_code"];

/// A province polygon with its derived geometry facts.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceBoundary {
    /// Lowercase two-letter province id.
    pub id: &'static str,
    /// Province name as spelled in the boundary file.
    pub name: String,
    pub polygon: MultiPolygon<f64>,
    /// Geometric centroid as `[longitude, latitude]`.
    pub centroid: [f64; 2],
    /// Bounding box as `[min_lng, min_lat, max_lng, max_lat]`.
    pub bbox: [f64; 4],
}

/// A census division polygon keyed by its uid.
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionBoundary {
    /// Four-digit census division unique id.
    pub cd_uid: String,
    /// Parent province SGC code.
    pub province_code: String,
    pub polygon: MultiPolygon<f64>,
    /// Bounding box as `[min_lng, min_lat, max_lng, max_lat]`.
    pub bbox: [f64; 4],
}

/// Loads province boundaries from a `GeoJSON` file.
///
/// # Errors
///
/// Returns [`GeographyError`] if the file cannot be read or is not a
/// `GeoJSON` feature collection.
pub fn load_province_boundaries(path: &Path) -> Result<Vec<ProvinceBoundary>, GeographyError> {
    let text = fs::read_to_string(path)?;
    let boundaries = parse_province_boundaries(&text)?;

    log::info!(
        "Loaded {} province boundaries from {}",
        boundaries.len(),
        path.display()
    );

    Ok(boundaries)
}

/// Parses province boundaries from `GeoJSON` text.
///
/// Features whose name does not resolve to a known province, or whose
/// geometry is not polygonal, are skipped with a warning.
///
/// # Errors
///
/// Returns [`GeographyError`] if the text is not a `GeoJSON` feature
/// collection.
pub fn parse_province_boundaries(text: &str) -> Result<Vec<ProvinceBoundary>, GeographyError> {
    let collection = parse_feature_collection(text)?;

    let mut boundaries = Vec::new();

    for feature in collection.features {
        let Some(name) = string_property(feature.properties.as_ref(), PROVINCE_NAME_PROPS) else {
            log::warn!("Skipping boundary feature without a province name property");
            continue;
        };

        let Some(id) = sgc::id_for_name(&name) else {
            log::warn!("Skipping boundary feature with unrecognized province name: {name}");
            continue;
        };

        let Some(polygon) = feature.geometry.as_ref().and_then(to_multipolygon) else {
            log::warn!("Skipping {id}: boundary geometry is not polygonal");
            continue;
        };

        let Some(bbox) = bounding_box(&polygon) else {
            log::warn!("Skipping {id}: boundary geometry is empty");
            continue;
        };

        let centroid = polygon
            .centroid()
            .map_or_else(|| bbox_center(bbox), |point| [point.x(), point.y()]);

        boundaries.push(ProvinceBoundary {
            id,
            name,
            polygon,
            centroid,
            bbox,
        });
    }

    Ok(boundaries)
}

/// Loads census division boundaries from a `GeoJSON` file.
///
/// # Errors
///
/// Returns [`GeographyError`] if the file cannot be read or is not a
/// `GeoJSON` feature collection.
pub fn load_division_boundaries(path: &Path) -> Result<Vec<DivisionBoundary>, GeographyError> {
    let text = fs::read_to_string(path)?;
    let boundaries = parse_division_boundaries(&text)?;

    log::info!(
        "Loaded {} census division boundaries from {}",
        boundaries.len(),
        path.display()
    );

    Ok(boundaries)
}

/// Parses census division boundaries from `GeoJSON` text.
///
/// The parent province code is taken from the first two digits of the
/// division uid when those digits are a known SGC code, falling back to
/// an explicit province property. Features with neither are skipped.
///
/// # Errors
///
/// Returns [`GeographyError`] if the text is not a `GeoJSON` feature
/// collection.
pub fn parse_division_boundaries(text: &str) -> Result<Vec<DivisionBoundary>, GeographyError> {
    let collection = parse_feature_collection(text)?;

    let mut boundaries = Vec::new();

    for feature in collection.features {
        let Some(cd_uid) = string_property(feature.properties.as_ref(), DIVISION_UID_PROPS) else {
            log::warn!("Skipping census division feature without a uid property");
            continue;
        };

        let Some(province_code) = division_province_code(&feature, &cd_uid) else {
            log::warn!("Skipping census division {cd_uid}: no valid province code");
            continue;
        };

        let Some(polygon) = feature.geometry.as_ref().and_then(to_multipolygon) else {
            log::warn!("Skipping census division {cd_uid}: geometry is not polygonal");
            continue;
        };

        let Some(bbox) = bounding_box(&polygon) else {
            log::warn!("Skipping census division {cd_uid}: geometry is empty");
            continue;
        };

        boundaries.push(DivisionBoundary {
            cd_uid,
            province_code,
            polygon,
            bbox,
        });
    }

    Ok(boundaries)
}

/// Whether a point lies inside a boundary polygon.
#[must_use]
pub fn contains_point(polygon: &MultiPolygon<f64>, lng: f64, lat: f64) -> bool {
    polygon.contains(&geo::Point::new(lng, lat))
}

/// Bounding-box area in squared degrees, corrected for longitude
/// compression at the box's mid latitude.
#[must_use]
pub fn bbox_area(bbox: [f64; 4]) -> f64 {
    let [min_lng, min_lat, max_lng, max_lat] = bbox;
    let mid_lat = ((min_lat + max_lat) / 2.0).to_radians();

    (max_lng - min_lng) * mid_lat.cos() * (max_lat - min_lat)
}

/// Center of a bounding box as `[longitude, latitude]`.
#[must_use]
pub fn bbox_center(bbox: [f64; 4]) -> [f64; 2] {
    let [min_lng, min_lat, max_lng, max_lat] = bbox;

    [(min_lng + max_lng) / 2.0, (min_lat + max_lat) / 2.0]
}

fn parse_feature_collection(text: &str) -> Result<FeatureCollection, GeographyError> {
    let geojson: GeoJson = text.parse()?;

    FeatureCollection::try_from(geojson).map_err(|e| GeographyError::Conversion {
        message: format!("Boundary file is not a feature collection: {e}"),
    })
}

/// Returns the first present candidate property as a string. Numeric
/// properties are stringified, matching files that store uids as
/// numbers.
fn string_property(
    properties: Option<&geojson::JsonObject>,
    keys: &[&str],
) -> Option<String> {
    let properties = properties?;

    keys.iter().find_map(|key| {
        properties.get(*key).and_then(|value| match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    })
}

fn division_province_code(feature: &geojson::Feature, cd_uid: &str) -> Option<String> {
    if let Some(prefix) = cd_uid.get(..2)
        && sgc::province_id(prefix) != "??"
    {
        return Some(prefix.to_string());
    }

    string_property(feature.properties.as_ref(), DIVISION_PROVINCE_PROPS)
        .filter(|code| sgc::province_id(code) != "??")
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`]. Handles both
/// `Polygon` and `MultiPolygon` geometry types.
fn to_multipolygon(geometry: &geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;

    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

fn bounding_box(polygon: &MultiPolygon<f64>) -> Option<[f64; 4]> {
    polygon
        .bounding_rect()
        .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_feature(properties: &str, min: f64, max: f64) -> String {
        format!(
            r#"{{
                "type": "Feature",
                "properties": {properties},
                "geometry": {{
                    "type": "Polygon",
                    "coordinates": [[
                        [{min}, {min}], [{max}, {min}], [{max}, {max}],
                        [{min}, {max}], [{min}, {min}]
                    ]]
                }}
            }}"#
        )
    }

    fn collection(features: &[String]) -> String {
        format!(
            r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
            features.join(",")
        )
    }

    #[test]
    fn province_features_resolve_by_name() {
        let text = collection(&[
            square_feature(r#"{"name": "Prince Edward Island"}"#, -64.0, -62.0),
            square_feature(r#"{"PRNAME": "Yukon Territory"}"#, -141.0, -123.0),
            square_feature(r#"{"name": "Atlantis"}"#, 0.0, 1.0),
        ]);

        let boundaries = parse_province_boundaries(&text).unwrap();

        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[0].id, "pe");
        assert_eq!(boundaries[1].id, "yt");
    }

    #[test]
    fn province_centroid_and_bbox() {
        let text = collection(&[square_feature(r#"{"name": "Manitoba"}"#, 10.0, 14.0)]);

        let boundaries = parse_province_boundaries(&text).unwrap();
        let boundary = &boundaries[0];

        assert_eq!(boundary.bbox, [10.0, 10.0, 14.0, 14.0]);
        assert!((boundary.centroid[0] - 12.0).abs() < 1e-9);
        assert!((boundary.centroid[1] - 12.0).abs() < 1e-9);
    }

    #[test]
    fn division_uid_prefix_wins() {
        let text = collection(&[square_feature(r#"{"CDUID": "3520"}"#, -80.0, -79.0)]);

        let boundaries = parse_division_boundaries(&text).unwrap();

        assert_eq!(boundaries[0].cd_uid, "3520");
        assert_eq!(boundaries[0].province_code, "35");
    }

    #[test]
    fn division_falls_back_to_province_property() {
        let text = collection(&[
            square_feature(r#"{"cd_code": "9901", "prov_code": "24"}"#, -72.0, -71.0),
            square_feature(r#"{"cd_code": "9902"}"#, -72.0, -71.0),
        ]);

        let boundaries = parse_division_boundaries(&text).unwrap();

        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].province_code, "24");
    }

    #[test]
    fn numeric_uid_properties_are_stringified() {
        let text = collection(&[square_feature(r#"{"CDUID": 1001}"#, -53.0, -52.0)]);

        let boundaries = parse_division_boundaries(&text).unwrap();

        assert_eq!(boundaries[0].cd_uid, "1001");
        assert_eq!(boundaries[0].province_code, "10");
    }

    #[test]
    fn point_containment() {
        let text = collection(&[square_feature(r#"{"name": "Alberta"}"#, -120.0, -110.0)]);

        let boundaries = parse_province_boundaries(&text).unwrap();
        let polygon = &boundaries[0].polygon;

        assert!(contains_point(polygon, -115.0, -115.0));
        assert!(!contains_point(polygon, -100.0, -115.0));
    }

    #[test]
    fn bbox_area_shrinks_with_latitude() {
        let equator = bbox_area([0.0, -1.0, 2.0, 1.0]);
        let north = bbox_area([0.0, 59.0, 2.0, 61.0]);

        assert!(north < equator);
        assert!((equator - 4.0).abs() < 1e-3);
    }

    #[test]
    fn non_collection_input_is_rejected() {
        let result = parse_province_boundaries(r#"{"type": "Point", "coordinates": [0, 0]}"#);

        assert!(result.is_err());
    }
}
