#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Color classification for the economic map layers.
//!
//! Everything here is a pure function of the metric values: threshold
//! buckets for the province/region choropleth, cumulative-contribution
//! bands for the census-division heatmap, and the GDP allocation used to
//! estimate division figures when the source CSV has none.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub mod allocate;
pub mod bands;

/// Which metric drives the map colors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DataType {
    /// Provincial GDP in millions of chained 2017 dollars.
    Gdp,
    /// Average employment income from the survey sample.
    Income,
}

/// Display granularity for the choropleth.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Scope {
    /// One polygon per province or territory.
    Province,
    /// Provinces merged into the five statistical regions.
    Region,
}

/// Color bucket for a classified metric value, from no-data (0) to the
/// brightest "Very High" tier (5).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Bucket {
    /// No figure available for the territory.
    NoData = 0,
    /// Below the lowest cut point.
    VeryLow = 1,
    /// Above the "Low" cut point.
    Low = 2,
    /// Above the "Moderate" cut point.
    Moderate = 3,
    /// Above the "High" cut point.
    High = 4,
    /// Above the top cut point.
    VeryHigh = 5,
}

impl Bucket {
    /// Returns the numeric tier of this bucket (0 = no data, 5 = highest).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Hex color token rendered on the map for this bucket.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::NoData => "#666666",
            Self::VeryLow => "#ff0080",
            Self::Low => "#f81ce5",
            Self::Moderate => "#7928ca",
            Self::High => "#0070f3",
            Self::VeryHigh => "#00d9ff",
        }
    }

    /// Human-readable status label shown in panels and legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoData => "No Data",
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::NoData,
            Self::VeryLow,
            Self::Low,
            Self::Moderate,
            Self::High,
            Self::VeryHigh,
        ]
    }
}

/// Provincial GDP cut points in millions of dollars.
const GDP_PROVINCE: &[(f64, Bucket)] = &[
    (300_000.0, Bucket::VeryHigh),
    (100_000.0, Bucket::High),
    (50_000.0, Bucket::Moderate),
    (10_000.0, Bucket::Low),
];

/// Regional GDP cut points, scaled up since regional sums are larger.
const GDP_REGION: &[(f64, Bucket)] = &[
    (600_000.0, Bucket::VeryHigh),
    (250_000.0, Bucket::High),
    (100_000.0, Bucket::Moderate),
    (25_000.0, Bucket::Low),
];

/// Provincial average-income cut points in dollars.
const INCOME_PROVINCE: &[(f64, Bucket)] = &[
    (60_000.0, Bucket::VeryHigh),
    (50_000.0, Bucket::High),
    (40_000.0, Bucket::Moderate),
    (30_000.0, Bucket::Low),
];

/// Regional average-income cut points.
const INCOME_REGION: &[(f64, Bucket)] = &[
    (65_000.0, Bucket::VeryHigh),
    (55_000.0, Bucket::High),
    (45_000.0, Bucket::Moderate),
    (35_000.0, Bucket::Low),
];

/// Returns the descending cut-point table for one metric/scope pair.
///
/// Each entry maps "value at or above this cut point" to a bucket; values
/// below every cut point fall through to [`Bucket::VeryLow`].
#[must_use]
pub const fn thresholds(data_type: DataType, scope: Scope) -> &'static [(f64, Bucket)] {
    match (data_type, scope) {
        (DataType::Gdp, Scope::Province) => GDP_PROVINCE,
        (DataType::Gdp, Scope::Region) => GDP_REGION,
        (DataType::Income, Scope::Province) => INCOME_PROVINCE,
        (DataType::Income, Scope::Region) => INCOME_REGION,
    }
}

/// Classifies a metric value into its color bucket.
///
/// `None` (and non-finite values) classify as [`Bucket::NoData`]; a zero
/// GDP or income is a real figure and classifies as [`Bucket::VeryLow`].
#[must_use]
pub fn classify(value: Option<f64>, data_type: DataType, scope: Scope) -> Bucket {
    let Some(value) = value else {
        return Bucket::NoData;
    };
    if !value.is_finite() {
        return Bucket::NoData;
    }
    for &(cutoff, bucket) in thresholds(data_type, scope) {
        if value >= cutoff {
            return bucket;
        }
    }
    Bucket::VeryLow
}

/// Convenience wrapper returning the hex color for a metric value.
#[must_use]
pub fn color_for(value: Option<f64>, data_type: DataType, scope: Scope) -> &'static str {
    classify(value, data_type, scope).color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provincial_gdp_buckets_match_the_legend() {
        assert_eq!(
            classify(Some(452_555.3), DataType::Gdp, Scope::Province),
            Bucket::VeryHigh
        );
        assert_eq!(
            color_for(Some(452_555.3), DataType::Gdp, Scope::Province),
            "#00d9ff"
        );
        assert_eq!(
            classify(Some(74_431.5), DataType::Gdp, Scope::Province),
            Bucket::Moderate
        );
        assert_eq!(
            classify(Some(1_135.4), DataType::Gdp, Scope::Province),
            Bucket::VeryLow
        );
    }

    #[test]
    fn exact_cut_points_land_in_the_upper_bucket() {
        for &(data_type, scope) in &[
            (DataType::Gdp, Scope::Province),
            (DataType::Gdp, Scope::Region),
            (DataType::Income, Scope::Province),
            (DataType::Income, Scope::Region),
        ] {
            for &(cutoff, bucket) in thresholds(data_type, scope) {
                assert_eq!(classify(Some(cutoff), data_type, scope), bucket);
            }
        }
    }

    #[test]
    fn missing_income_is_no_data_but_zero_is_very_low() {
        assert_eq!(
            classify(None, DataType::Income, Scope::Province),
            Bucket::NoData
        );
        assert_eq!(color_for(None, DataType::Income, Scope::Province), "#666666");
        assert_eq!(
            classify(Some(0.0), DataType::Income, Scope::Province),
            Bucket::VeryLow
        );
        assert_eq!(
            classify(Some(0.0), DataType::Gdp, Scope::Province),
            Bucket::VeryLow
        );
        assert_eq!(
            classify(Some(f64::NAN), DataType::Gdp, Scope::Province),
            Bucket::NoData
        );
    }

    #[test]
    fn classification_is_monotonic_in_the_metric_value() {
        let probes = [
            0.0, 500.0, 9_999.9, 10_000.0, 24_999.0, 25_000.0, 35_000.0, 49_999.0, 50_000.0,
            60_000.0, 99_999.0, 100_000.0, 250_000.0, 299_999.0, 300_000.0, 600_000.0, 1.0e7,
        ];
        for &(data_type, scope) in &[
            (DataType::Gdp, Scope::Province),
            (DataType::Gdp, Scope::Region),
            (DataType::Income, Scope::Province),
            (DataType::Income, Scope::Region),
        ] {
            for pair in probes.windows(2) {
                let lower = classify(Some(pair[0]), data_type, scope);
                let upper = classify(Some(pair[1]), data_type, scope);
                assert!(
                    upper >= lower,
                    "{data_type}/{scope}: {} -> {lower:?} but {} -> {upper:?}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn regional_cut_points_sit_above_the_provincial_ones() {
        for &data_type in &[DataType::Gdp, DataType::Income] {
            let province = thresholds(data_type, Scope::Province);
            let region = thresholds(data_type, Scope::Region);
            assert_eq!(province.len(), region.len());
            for (p, r) in province.iter().zip(region) {
                assert!(r.0 > p.0, "{data_type}: {} should exceed {}", r.0, p.0);
                assert_eq!(p.1, r.1);
            }
        }
    }

    #[test]
    fn bucket_tokens_and_tiers() {
        assert_eq!(Bucket::VeryHigh.to_string(), "VERY_HIGH");
        assert_eq!("NO_DATA".parse::<Bucket>(), Ok(Bucket::NoData));
        assert_eq!(Bucket::NoData.value(), 0);
        assert_eq!(Bucket::VeryHigh.value(), 5);
        assert_eq!(Bucket::all().len(), 6);
        assert_eq!(DataType::Gdp.to_string(), "gdp");
        assert_eq!("region".parse::<Scope>(), Ok(Scope::Region));
    }
}
