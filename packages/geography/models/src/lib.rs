#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Identity types for Canada's provinces and territories, the regional
//! groupings used when the map is scoped to part of the country, and
//! the census divisions nested inside each province.

pub mod sgc;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Regional grouping of provinces.
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
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Region {
    /// Newfoundland and Labrador, Prince Edward Island, Nova Scotia,
    /// New Brunswick.
    Atlantic,
    /// Quebec and Ontario.
    Central,
    /// Manitoba, Saskatchewan, Alberta.
    Prairies,
    /// British Columbia.
    Pacific,
    /// Yukon, Northwest Territories, Nunavut.
    North,
}

impl Region {
    /// Every region, in display order.
    pub const ALL: [Self; 5] = [
        Self::Atlantic,
        Self::Central,
        Self::Prairies,
        Self::Pacific,
        Self::North,
    ];

    /// Province ids belonging to this region, in SGC order.
    #[must_use]
    pub const fn provinces(self) -> &'static [&'static str] {
        match self {
            Self::Atlantic => &["nl", "pe", "ns", "nb"],
            Self::Central => &["qc", "on"],
            Self::Prairies => &["mb", "sk", "ab"],
            Self::Pacific => &["bc"],
            Self::North => &["yt", "nt", "nu"],
        }
    }

    /// Returns the region containing a province id, case-insensitively.
    #[must_use]
    pub fn for_province(id: &str) -> Option<Self> {
        let id = id.to_lowercase();

        Self::ALL
            .into_iter()
            .find(|region| region.provinces().contains(&id.as_str()))
    }
}

/// Static facts about one province or territory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceInfo {
    /// Lowercase two-letter province id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Label anchor as `[longitude, latitude]`.
    pub center: [f64; 2],
    /// 2023 population estimate.
    pub population: u64,
    /// Regional grouping.
    pub region: Region,
}

/// Every province and territory, ordered by id.
pub const PROVINCES: &[ProvinceInfo] = &[
    ProvinceInfo {
        id: "ab",
        name: "Alberta",
        center: [-115.2723, 53.9333],
        population: 4_262_635,
        region: Region::Prairies,
    },
    ProvinceInfo {
        id: "bc",
        name: "British Columbia",
        center: [-122.3045, 53.7267],
        population: 5_000_879,
        region: Region::Pacific,
    },
    ProvinceInfo {
        id: "mb",
        name: "Manitoba",
        center: [-98.8139, 56.1304],
        population: 1_342_153,
        region: Region::Prairies,
    },
    ProvinceInfo {
        id: "nb",
        name: "New Brunswick",
        center: [-66.4619, 46.5653],
        population: 775_610,
        region: Region::Atlantic,
    },
    ProvinceInfo {
        id: "nl",
        name: "Newfoundland & Labrador",
        center: [-56.1304, 53.1355],
        population: 510_550,
        region: Region::Atlantic,
    },
    ProvinceInfo {
        id: "ns",
        name: "Nova Scotia",
        center: [-62.6181, 45.3631],
        population: 969_383,
        region: Region::Atlantic,
    },
    ProvinceInfo {
        id: "nt",
        name: "Northwest Territories",
        center: [-117.3560, 64.8255],
        population: 41_070,
        region: Region::North,
    },
    ProvinceInfo {
        id: "nu",
        name: "Nunavut",
        center: [-94.8369, 70.2998],
        population: 36_858,
        region: Region::North,
    },
    ProvinceInfo {
        id: "on",
        name: "Ontario",
        center: [-85.3232, 51.3826],
        population: 14_223_942,
        region: Region::Central,
    },
    ProvinceInfo {
        id: "pe",
        name: "Prince Edward Island",
        center: [-63.0, 46.5],
        population: 154_331,
        region: Region::Atlantic,
    },
    ProvinceInfo {
        id: "qc",
        name: "Quebec",
        center: [-73.5673, 52.9399],
        population: 8_501_833,
        region: Region::Central,
    },
    ProvinceInfo {
        id: "sk",
        name: "Saskatchewan",
        center: [-106.3468, 56.1304],
        population: 1_132_505,
        region: Region::Prairies,
    },
    ProvinceInfo {
        id: "yt",
        name: "Yukon",
        center: [-135.0, 64.2008],
        population: 40_232,
        region: Region::North,
    },
];

/// Looks up a province by id, case-insensitively.
#[must_use]
pub fn province_info(id: &str) -> Option<&'static ProvinceInfo> {
    let id = id.to_lowercase();

    PROVINCES.iter().find(|province| province.id == id)
}

/// One census division row from the GDP allocation artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusDivision {
    /// Four-digit census division unique id. The first two digits are
    /// the parent province's SGC code.
    pub cd_uid: String,
    /// Parent province SGC code.
    pub province_code: String,
    /// Parent province name as spelled in the census profile.
    pub province_name: String,
    /// 2021 census population.
    pub population_2021: f64,
    /// GDP allocated to this division, in millions of chained 2017
    /// dollars.
    pub gdp_2021_millions: Option<f64>,
}

impl CensusDivision {
    /// Lowercase id of the parent province, or `"??"` if the recorded
    /// SGC code is unknown.
    #[must_use]
    pub fn province_id(&self) -> &'static str {
        sgc::province_id(&self.province_code)
    }

    /// `true` when the division uid nests under its recorded province
    /// code.
    #[must_use]
    pub fn uid_matches_province(&self) -> bool {
        self.cd_uid
            .get(..2)
            .is_some_and(|prefix| prefix == self.province_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn province_count() {
        assert_eq!(PROVINCES.len(), 13);
    }

    #[test]
    fn regions_partition_provinces() {
        let mut covered = 0;

        for region in Region::ALL {
            for id in region.provinces() {
                assert_eq!(Region::for_province(id), Some(region));
                covered += 1;
            }
        }

        assert_eq!(covered, PROVINCES.len());
    }

    #[test]
    fn region_for_unknown_province() {
        assert_eq!(Region::for_province("zz"), None);
    }

    #[test]
    fn province_info_case_insensitive() {
        let info = province_info("AB").unwrap();

        assert_eq!(info.name, "Alberta");
        assert_eq!(info.region, Region::Prairies);
    }

    #[test]
    fn province_table_matches_sgc_ids() {
        for province in PROVINCES {
            assert!(sgc::sgc_code(province.id).is_some());
            assert_eq!(sgc::id_for_name(province.name), Some(province.id));
        }
    }

    #[test]
    fn census_division_uid_nesting() {
        let division = CensusDivision {
            cd_uid: "3520".to_string(),
            province_code: "35".to_string(),
            province_name: "Ontario".to_string(),
            population_2021: 2_794_356.0,
            gdp_2021_millions: Some(399_731.123),
        };

        assert!(division.uid_matches_province());
        assert_eq!(division.province_id(), "on");

        let stray = CensusDivision {
            province_code: "24".to_string(),
            ..division
        };

        assert!(!stray.uid_matches_province());
    }
}
