#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Economic record types shared across the workspace.
//!
//! Every raw source row is normalized into one of these typed records
//! at parse time. Downstream crates never see loosely shaped rows, so
//! a field that is absent here is absent everywhere.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Yearly GDP values keyed by province id, then by year.
pub type GdpTable = BTreeMap<&'static str, BTreeMap<u16, f64>>;

/// One weighted income observation from the household survey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeObservation {
    /// Household income in dollars.
    pub income: f64,
    /// Survey sampling weight.
    pub weight: f64,
}

/// Income observations keyed by province id.
pub type IncomeTable = BTreeMap<&'static str, Vec<IncomeObservation>>;

/// Direction of a province's most recent year-over-year GDP change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    Growing,
    Declining,
}

/// Canonical per-province economic record built from the provincial
/// GDP table.
///
/// GDP values are expressed in millions of chained 2017 dollars. A
/// year missing from the source table is recorded as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceEconomy {
    /// Lowercase two-letter province id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Label anchor as `[longitude, latitude]`.
    pub center: [f64; 2],
    /// 2023 population estimate.
    pub population: u64,
    pub gdp_2021: f64,
    pub gdp_2022: f64,
    pub gdp_2023: f64,
    pub gdp_2024: f64,
    /// 2022 to 2023 growth in percent, rounded to one decimal.
    #[serde(rename = "growth2022_2023")]
    pub growth_2022_2023: f64,
    /// 2023 to 2024 growth in percent, rounded to one decimal.
    #[serde(rename = "growth2023_2024")]
    pub growth_2023_2024: f64,
    /// 2023 GDP per person in dollars, rounded to two decimals.
    pub gdp_per_capita_2023: f64,
}

/// One year of a province's GDP trend series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GdpPoint {
    pub year: u16,
    /// GDP in millions of chained 2017 dollars.
    pub gdp: f64,
}

/// One bar of the national comparison ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// Province display name.
    pub province: String,
    /// 2023 GDP in millions of chained 2017 dollars.
    pub gdp: f64,
}

/// One bar of the national income comparison ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeComparisonEntry {
    /// Province display name.
    pub province: String,
    /// Weighted average income in dollars, `None` when the survey had
    /// no usable observations for the province.
    pub income: Option<f64>,
}

/// Derived metrics for one province, keyed by province id in the
/// metrics map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceMetrics {
    /// Display name.
    pub name: String,
    pub gdp_2023: f64,
    pub gdp_2022: f64,
    pub gdp_2021: f64,
    pub gdp_2024: f64,
    #[serde(rename = "growth2022_2023")]
    pub growth_2022_2023: f64,
    #[serde(rename = "growth2023_2024")]
    pub growth_2023_2024: f64,
    pub gdp_per_capita_2023: f64,
    /// `Growing` when the 2022 to 2023 growth rate is positive.
    pub trend: Trend,
    /// Four-point GDP series for 2021 through 2024.
    pub recent_trend: Vec<GdpPoint>,
    /// Every province's 2023 GDP, sorted descending.
    pub comparison_data: Vec<ComparisonEntry>,
}

/// Household income summary for one province or region.
///
/// Averages and medians are `None` when the source had no usable
/// observations for the area, and the map paints such areas in the
/// no-data color rather than pretending the income is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSummary {
    /// Weighted average household income in dollars.
    pub average_income: Option<f64>,
    /// Median household income in dollars.
    pub median_income: Option<f64>,
    /// Number of observations behind the summary.
    pub sample_size: usize,
    /// The observations themselves, for distribution plots.
    pub raw_income_data: Vec<f64>,
}

/// Property category parsed from listing labels.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PropertyType {
    House,
    Condo,
    Townhouse,
    Duplex,
    Other,
}

impl PropertyType {
    /// Classifies a free-form listing label.
    ///
    /// Labels are matched loosely because listing files disagree on
    /// spelling; anything unrecognized is `Other`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();

        if label.contains("condo") || label.contains("apartment") {
            Self::Condo
        } else if label.contains("town") {
            Self::Townhouse
        } else if label.contains("duplex") {
            Self::Duplex
        } else if label.contains("house") || label.contains("detached") || label.contains("bungalow")
        {
            Self::House
        } else {
            Self::Other
        }
    }
}

/// One real-estate listing, as plotted by the night-sky view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    /// City name as spelled in the listing file.
    pub city: String,
    /// Lowercase id of the containing province.
    pub province_id: String,
    /// Asking price in dollars.
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub property_type: PropertyType,
    pub lat: f64,
    pub lng: f64,
    /// Interior area in square feet, when the listing includes it.
    pub square_footage: Option<f64>,
}

/// A city with an estimated metropolitan GDP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// Lowercase city id, unique within its province.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Lowercase id of the containing province.
    pub province_id: String,
    pub lat: f64,
    pub lng: f64,
    /// Metropolitan GDP in millions of chained 2017 dollars.
    pub gdp: f64,
    pub population: u64,
    /// Whether street-level imagery is expected near the city center.
    pub has_street_view: bool,
}
