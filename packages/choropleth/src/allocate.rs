//! Distributes provincial GDP totals across census divisions.
//!
//! The artifact pipeline splits each province's 2021 GDP over its
//! divisions in proportion to 2021 population. At render time, divisions
//! that still lack a figure fall back to a bounding-box-area split with a
//! small deterministic jitter so equal-area divisions do not come out
//! visually identical.

use econ_map_geography_models::CensusDivision;

/// Lower bound of the deterministic jitter factor.
pub const JITTER_MIN: f64 = 0.85;

/// Upper bound of the deterministic jitter factor.
pub const JITTER_MAX: f64 = 1.15;

/// One division's share of an area-based GDP split.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaAllocation {
    /// Census-division unique identifier.
    pub cd_uid: String,
    /// Fraction of the provincial total assigned to this division.
    pub share: f64,
    /// `share` times the provincial total. These sum to the provincial
    /// total exactly (up to floating rounding).
    pub exact_millions: f64,
    /// The displayed estimate: `exact_millions` scaled by the jitter.
    pub gdp_millions: f64,
}

/// Splits a provincial GDP total across divisions by 2021 population.
///
/// Returns clones of the input divisions with `gdp_2021_millions` filled
/// in. Divisions reporting no population share equally when none report
/// any; a non-positive provincial total yields an empty vector.
#[must_use]
pub fn allocate_by_population(
    divisions: &[CensusDivision],
    provincial_gdp_millions: f64,
) -> Vec<CensusDivision> {
    if !provincial_gdp_millions.is_finite() || provincial_gdp_millions <= 0.0 {
        return Vec::new();
    }

    let weights: Vec<f64> = divisions
        .iter()
        .map(|cd| {
            if cd.population_2021.is_finite() {
                cd.population_2021.max(0.0)
            } else {
                0.0
            }
        })
        .collect();
    let total: f64 = weights.iter().sum();
    let (weights, total) = if total > 0.0 {
        (weights, total)
    } else {
        #[allow(clippy::cast_precision_loss)]
        let equal_total = divisions.len() as f64;
        (vec![1.0; divisions.len()], equal_total)
    };

    divisions
        .iter()
        .zip(weights)
        .map(|(cd, weight)| {
            let mut allocated = cd.clone();
            allocated.gdp_2021_millions = Some(provincial_gdp_millions * weight / total);
            allocated
        })
        .collect()
}

/// Splits a provincial GDP total across divisions by bounding-box area.
///
/// Input pairs are `(cd_uid, area)` where the area is already corrected
/// for latitude (see `econ_map_geography::bbox_area`). The jitter is
/// applied after the exact split, so `exact_millions` preserves the
/// provincial total while `gdp_millions` carries the displayed estimate.
#[must_use]
pub fn allocate_by_area(areas: &[(&str, f64)], provincial_gdp_millions: f64) -> Vec<AreaAllocation> {
    if !provincial_gdp_millions.is_finite() || provincial_gdp_millions <= 0.0 {
        return Vec::new();
    }

    let clamped: Vec<(&str, f64)> = areas
        .iter()
        .map(|&(uid, area)| {
            let area = if area.is_finite() { area.max(0.0) } else { 0.0 };
            (uid, area)
        })
        .collect();
    let total: f64 = clamped.iter().map(|(_, area)| area).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    clamped
        .into_iter()
        .map(|(uid, area)| {
            let share = area / total;
            let exact_millions = provincial_gdp_millions * share;
            AreaAllocation {
                cd_uid: uid.to_string(),
                share,
                exact_millions,
                gdp_millions: exact_millions * deterministic_jitter(uid),
            }
        })
        .collect()
}

/// Deterministic per-division jitter factor in `[JITTER_MIN, JITTER_MAX]`.
///
/// Derived from the md5 digest of the division uid, so the same division
/// always renders with the same estimate across sessions.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn deterministic_jitter(cd_uid: &str) -> f64 {
    let digest = md5::compute(cd_uid.as_bytes());
    let seed = u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ]);
    let unit = seed as f64 / u64::MAX as f64;
    JITTER_MIN + unit * (JITTER_MAX - JITTER_MIN)
}
