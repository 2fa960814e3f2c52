#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Derived economic metrics.
//!
//! Joins the static province table with parsed yearly values and
//! computes growth rates, per-capita figures, income summaries, and
//! regional aggregates. Everything here is a pure function of its
//! inputs; rebuilding from the same tables yields identical output.

pub mod format;

use std::collections::BTreeMap;

use econ_map_economy_models::{
    City, ComparisonEntry, GdpPoint, GdpTable, IncomeComparisonEntry, IncomeObservation,
    IncomeSummary, ProvinceEconomy, ProvinceMetrics, Trend,
};
use econ_map_geography_models::{PROVINCES, Region, province_info};
use serde::Serialize;

/// Years covered by the trend series, oldest first.
pub const TREND_YEARS: [u16; 4] = [2021, 2022, 2023, 2024];

/// Year-over-year growth in percent, defined as `0` when the earlier
/// year is not positive.
#[must_use]
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// GDP per person in dollars, from a GDP expressed in millions.
/// Defined as `0` when the population is zero.
#[must_use]
pub fn gdp_per_capita(gdp_millions: f64, population: u64) -> f64 {
    if population == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let population = population as f64;

    gdp_millions * 1_000_000.0 / population
}

/// Rounds to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds canonical province records by joining the parsed GDP table
/// with the static province table. Table entries without a matching
/// province are dropped.
#[must_use]
pub fn build_province_economies(gdp: &GdpTable) -> Vec<ProvinceEconomy> {
    let mut economies = Vec::new();

    for (id, years) in gdp {
        let Some(info) = province_info(id) else {
            continue;
        };

        let value_for = |year: u16| years.get(&year).copied().unwrap_or(0.0);

        let gdp_2021 = value_for(2021);
        let gdp_2022 = value_for(2022);
        let gdp_2023 = value_for(2023);
        let gdp_2024 = value_for(2024);

        economies.push(ProvinceEconomy {
            id: (*id).to_string(),
            name: info.name.to_string(),
            center: info.center,
            population: info.population,
            gdp_2021,
            gdp_2022,
            gdp_2023,
            gdp_2024,
            growth_2022_2023: round1(growth_rate(gdp_2023, gdp_2022)),
            growth_2023_2024: round1(growth_rate(gdp_2024, gdp_2023)),
            gdp_per_capita_2023: round2(gdp_per_capita(gdp_2023, info.population)),
        });
    }

    economies
}

/// Builds the per-province metrics map, including the shared national
/// comparison ranking sorted descending by 2023 GDP.
#[must_use]
pub fn build_province_metrics(economies: &[ProvinceEconomy]) -> BTreeMap<String, ProvinceMetrics> {
    let mut comparison: Vec<ComparisonEntry> = economies
        .iter()
        .map(|economy| ComparisonEntry {
            province: economy.name.clone(),
            gdp: economy.gdp_2023,
        })
        .collect();
    comparison.sort_by(|a, b| b.gdp.total_cmp(&a.gdp));

    economies
        .iter()
        .map(|economy| {
            // The rounded growth rate can flatten a tiny change to 0.0,
            // so the trend compares the raw yearly values instead.
            let trend = if economy.gdp_2022 > 0.0 && economy.gdp_2023 > economy.gdp_2022 {
                Trend::Growing
            } else {
                Trend::Declining
            };

            let recent_trend = vec![
                GdpPoint {
                    year: 2021,
                    gdp: economy.gdp_2021,
                },
                GdpPoint {
                    year: 2022,
                    gdp: economy.gdp_2022,
                },
                GdpPoint {
                    year: 2023,
                    gdp: economy.gdp_2023,
                },
                GdpPoint {
                    year: 2024,
                    gdp: economy.gdp_2024,
                },
            ];

            let metrics = ProvinceMetrics {
                name: economy.name.clone(),
                gdp_2023: economy.gdp_2023,
                gdp_2022: economy.gdp_2022,
                gdp_2021: economy.gdp_2021,
                gdp_2024: economy.gdp_2024,
                growth_2022_2023: economy.growth_2022_2023,
                growth_2023_2024: economy.growth_2023_2024,
                gdp_per_capita_2023: economy.gdp_per_capita_2023,
                trend,
                recent_trend,
                comparison_data: comparison.clone(),
            };

            (economy.id.clone(), metrics)
        })
        .collect()
}

/// Aggregated economic record for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionEconomy {
    pub region: Region,
    /// Display name.
    pub name: String,
    /// Sum of member province populations.
    pub population: u64,
    pub gdp_2021: f64,
    pub gdp_2022: f64,
    pub gdp_2023: f64,
    pub gdp_2024: f64,
    #[serde(rename = "growth2022_2023")]
    pub growth_2022_2023: f64,
    #[serde(rename = "growth2023_2024")]
    pub growth_2023_2024: f64,
    pub gdp_per_capita_2023: f64,
}

/// Aggregates province records into the five regional records by
/// summing member values. A region with no members reports zeros
/// throughout rather than dividing by an empty population.
#[must_use]
pub fn aggregate_regions(economies: &[ProvinceEconomy]) -> Vec<RegionEconomy> {
    Region::ALL
        .into_iter()
        .map(|region| {
            let members: Vec<&ProvinceEconomy> = economies
                .iter()
                .filter(|economy| region.provinces().contains(&economy.id.as_str()))
                .collect();

            let population: u64 = members.iter().map(|economy| economy.population).sum();
            let gdp_2021: f64 = members.iter().map(|economy| economy.gdp_2021).sum();
            let gdp_2022: f64 = members.iter().map(|economy| economy.gdp_2022).sum();
            let gdp_2023: f64 = members.iter().map(|economy| economy.gdp_2023).sum();
            let gdp_2024: f64 = members.iter().map(|economy| economy.gdp_2024).sum();

            RegionEconomy {
                region,
                name: region.to_string(),
                population,
                gdp_2021,
                gdp_2022,
                gdp_2023,
                gdp_2024,
                growth_2022_2023: round1(growth_rate(gdp_2023, gdp_2022)),
                growth_2023_2024: round1(growth_rate(gdp_2024, gdp_2023)),
                gdp_per_capita_2023: round2(gdp_per_capita(gdp_2023, population)),
            }
        })
        .collect()
}

/// Replaces summed 2023 regional GDP with explicitly published values.
///
/// Statistics Canada publishes regional totals that do not always equal
/// the sum of member provinces (differing deflators). Where an override
/// exists, the headline value and everything derived from it are
/// recomputed; regions absent from the table keep their summed values.
pub fn apply_regional_gdp(regions: &mut [RegionEconomy], published: &BTreeMap<Region, f64>) {
    for economy in regions {
        if let Some(&gdp_2023) = published.get(&economy.region) {
            economy.gdp_2023 = gdp_2023;
            economy.growth_2022_2023 = round1(growth_rate(gdp_2023, economy.gdp_2022));
            economy.growth_2023_2024 = round1(growth_rate(economy.gdp_2024, gdp_2023));
            economy.gdp_per_capita_2023 = round2(gdp_per_capita(gdp_2023, economy.population));
        }
    }
}

/// Weighted average of income observations, or `None` when the total
/// weight is not positive.
#[must_use]
pub fn weighted_average(observations: &[IncomeObservation]) -> Option<f64> {
    let total_weight: f64 = observations.iter().map(|obs| obs.weight).sum();

    if total_weight > 0.0 {
        let weighted_sum: f64 = observations.iter().map(|obs| obs.income * obs.weight).sum();
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}

/// Median by the sorted-array midpoint at index `n / 2`.
///
/// Even-length inputs intentionally take the upper of the two middle
/// elements instead of averaging them; the summaries downstream have
/// always been published with that convention.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(sorted[sorted.len() / 2])
}

/// Summarizes income observations for one province or region.
///
/// An empty input yields a summary with `None` average and median, so
/// areas without survey coverage paint as "no data" rather than zero.
#[must_use]
pub fn build_income_summary(observations: &[IncomeObservation]) -> IncomeSummary {
    let raw_income_data: Vec<f64> = observations.iter().map(|obs| obs.income).collect();

    IncomeSummary {
        average_income: weighted_average(observations),
        median_income: median(&raw_income_data),
        sample_size: observations.len(),
        raw_income_data,
    }
}

/// Pools member province observations and summarizes them for a
/// region.
#[must_use]
pub fn region_income_summary(
    region: Region,
    incomes: &BTreeMap<&'static str, Vec<IncomeObservation>>,
) -> IncomeSummary {
    let pooled: Vec<IncomeObservation> = region
        .provinces()
        .iter()
        .filter_map(|id| incomes.get(id))
        .flatten()
        .copied()
        .collect();

    build_income_summary(&pooled)
}

/// Every province's average income for the national comparison bars,
/// sorted descending with no-data provinces at the end.
#[must_use]
pub fn income_comparison(
    incomes: &BTreeMap<&'static str, Vec<IncomeObservation>>,
) -> Vec<IncomeComparisonEntry> {
    let mut entries: Vec<IncomeComparisonEntry> = PROVINCES
        .iter()
        .map(|info| IncomeComparisonEntry {
            province: info.name.to_string(),
            income: incomes.get(info.id).and_then(|obs| weighted_average(obs)),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.income
            .unwrap_or(f64::NEG_INFINITY)
            .total_cmp(&a.income.unwrap_or(f64::NEG_INFINITY))
    });

    entries
}

/// Share of a province's 2023 GDP contributed by one city, in
/// percent. Defined as `0` when the province total is not positive.
#[must_use]
pub fn city_gdp_share(city: &City, province: &ProvinceEconomy) -> f64 {
    if province.gdp_2023 > 0.0 {
        city.gdp / province.gdp_2023 * 100.0
    } else {
        0.0
    }
}
