#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Map-layer assembly: joins boundaries, metrics, and colors into the
//! `GeoJSON` feature collections the map engine renders.
//!
//! The only mutable state in the presentation is [`ViewState`], a
//! two-axis toggle. Every builder is a pure function of the loaded
//! [`MapData`] and a view state, so toggling away and back reproduces an
//! identical collection.

use std::collections::BTreeMap;

use econ_map_choropleth::{Bucket, bands::DivisionBand, color_for};
use econ_map_economy_models::{City, IncomeTable, ProvinceEconomy};
use econ_map_geography::{DivisionBoundary, ProvinceBoundary};
use econ_map_geography_models::{Region, province_info};
use econ_map_metrics::{RegionEconomy, region_income_summary, weighted_average};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, feature::Id};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub use econ_map_choropleth::{DataType, Scope};

/// The two-axis presentation toggle: which metric is painted, and at
/// what granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub data_type: DataType,
    pub scope: Scope,
}

impl Default for ViewState {
    /// The map opens on the provincial GDP view.
    fn default() -> Self {
        Self {
            data_type: DataType::Gdp,
            scope: Scope::Province,
        }
    }
}

impl ViewState {
    #[must_use]
    pub const fn new(data_type: DataType, scope: Scope) -> Self {
        Self { data_type, scope }
    }

    /// The state with the metric switched and the granularity kept.
    #[must_use]
    pub const fn with_data_type(self, data_type: DataType) -> Self {
        Self {
            data_type,
            scope: self.scope,
        }
    }

    /// The state with the granularity switched and the metric kept.
    #[must_use]
    pub const fn with_scope(self, scope: Scope) -> Self {
        Self {
            data_type: self.data_type,
            scope,
        }
    }
}

/// Everything the map builders consume, loaded once at startup and
/// passed explicitly; no builder reads hidden module state.
#[derive(Debug, Clone, Default)]
pub struct MapData {
    pub boundaries: Vec<ProvinceBoundary>,
    pub economies: Vec<ProvinceEconomy>,
    pub regions: Vec<RegionEconomy>,
    pub incomes: IncomeTable,
}

/// Builds the active choropleth collection for a view state.
///
/// Province scope paints each polygon with its own metric; region scope
/// paints each member polygon with its region's aggregate. A province
/// with no joined record keeps its polygon and paints the floor bucket
/// for GDP or no-data gray for income, so a failed dataset load still
/// renders a complete map.
#[must_use]
pub fn choropleth_features(data: &MapData, view: ViewState) -> FeatureCollection {
    let features = data
        .boundaries
        .iter()
        .map(|boundary| match view.scope {
            Scope::Province => province_feature(data, boundary, view.data_type),
            Scope::Region => region_feature(data, boundary, view.data_type),
        })
        .collect();

    collection(features)
}

/// Builds the city marker collection.
#[must_use]
pub fn city_features(cities: &[City]) -> FeatureCollection {
    let features = cities
        .iter()
        .map(|city| {
            let properties = object(json!({
                "id": city.id,
                "name": city.name,
                "provinceId": city.province_id,
                "gdp": city.gdp,
                "population": city.population,
                "hasStreetView": city.has_street_view,
            }));

            build_feature(
                &city.id,
                geojson::Value::Point(vec![city.lng, city.lat]),
                properties,
            )
        })
        .collect();

    collection(features)
}

/// Builds the census-division heatmap collection.
///
/// Divisions missing from the band list paint no-data gray with a null
/// band, so an incomplete allocation still renders every polygon.
#[must_use]
pub fn division_features(
    boundaries: &[DivisionBoundary],
    bands: &[DivisionBand],
) -> FeatureCollection {
    let by_uid: BTreeMap<&str, &DivisionBand> = bands
        .iter()
        .map(|band| (band.cd_uid.as_str(), band))
        .collect();

    let features = boundaries
        .iter()
        .map(|boundary| {
            let properties = by_uid.get(boundary.cd_uid.as_str()).map_or_else(
                || {
                    object(json!({
                        "id": boundary.cd_uid,
                        "provinceCode": boundary.province_code,
                        "color": Bucket::NoData.color(),
                        "gdpMillions": null,
                        "sharePercent": 0.0,
                        "band": null,
                    }))
                },
                |band| {
                    object(json!({
                        "id": boundary.cd_uid,
                        "provinceCode": boundary.province_code,
                        "color": band.color,
                        "gdpMillions": band.gdp_millions,
                        "sharePercent": band.share_percent,
                        "band": band.band,
                    }))
                },
            );

            build_feature(
                &boundary.cd_uid,
                geojson::Value::from(&boundary.polygon),
                properties,
            )
        })
        .collect();

    collection(features)
}

fn province_feature(data: &MapData, boundary: &ProvinceBoundary, data_type: DataType) -> Feature {
    let economy = data
        .economies
        .iter()
        .find(|economy| economy.id == boundary.id);

    let (data_value, color) = match data_type {
        DataType::Gdp => {
            let value = economy.map_or(0.0, |economy| economy.gdp_2023);
            (value, color_for(Some(value), DataType::Gdp, Scope::Province))
        }
        DataType::Income => {
            let average = data
                .incomes
                .get(boundary.id)
                .and_then(|observations| weighted_average(observations));

            (
                average.unwrap_or(0.0),
                color_for(average, DataType::Income, Scope::Province),
            )
        }
    };

    let population = economy.map_or_else(
        || province_info(boundary.id).map_or(0, |info| info.population),
        |economy| economy.population,
    );

    let properties = object(json!({
        "id": boundary.id,
        "name": boundary.name,
        "color": color,
        "dataValue": data_value,
        "population": population,
    }));

    build_feature(
        boundary.id,
        geojson::Value::from(&boundary.polygon),
        properties,
    )
}

fn region_feature(data: &MapData, boundary: &ProvinceBoundary, data_type: DataType) -> Feature {
    let region = Region::for_province(boundary.id);
    let economy = region.and_then(|region| {
        data.regions
            .iter()
            .find(|candidate| candidate.region == region)
    });

    let (data_value, color) = match data_type {
        DataType::Gdp => {
            let value = economy.map_or(0.0, |economy| economy.gdp_2023);
            (value, color_for(Some(value), DataType::Gdp, Scope::Region))
        }
        DataType::Income => {
            let average = region
                .and_then(|region| region_income_summary(region, &data.incomes).average_income);

            (
                average.unwrap_or(0.0),
                color_for(average, DataType::Income, Scope::Region),
            )
        }
    };

    let name = economy.map_or_else(|| boundary.name.clone(), |economy| economy.name.clone());
    let population = economy.map_or(0, |economy| economy.population);

    let properties = object(json!({
        "id": boundary.id,
        "name": name,
        "color": color,
        "dataValue": data_value,
        "population": population,
    }));

    build_feature(
        boundary.id,
        geojson::Value::from(&boundary.polygon),
        properties,
    )
}

fn build_feature(id: &str, geometry: geojson::Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: Some(Id::String(id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Narrows a `json!` literal to a property map.
fn object(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}
