//! Cumulative-contribution bands for the census-division heatmap.
//!
//! Absolute thresholds wash out when every division in a province sits in
//! the same order of magnitude, so the heatmap ranks divisions by their
//! share of the provincial total instead: sort descending, accumulate the
//! share, and color by which 12.5%-wide slice of the total the division
//! starts in.

use serde::Serialize;

/// Width of one cumulative band, in percent of the provincial total.
pub const BAND_WIDTH_PERCENT: f64 = 12.5;

/// Number of cumulative bands.
pub const BAND_COUNT: usize = 8;

/// Fixed 8-step ramp from the brightest band (top contributors) down.
pub const BAND_COLORS: [&str; BAND_COUNT] = [
    "#00d9ff", "#00a4f9", "#0070f3", "#3c4cde", "#7928ca", "#b822d7", "#f81ce5", "#ff0080",
];

/// One census division's position within its province's GDP distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionBand {
    /// Census-division unique identifier.
    pub cd_uid: String,
    /// The division's GDP in millions.
    pub gdp_millions: f64,
    /// The division's share of the provincial total, in percent.
    pub share_percent: f64,
    /// Running share including this division, in percent. The last entry
    /// reaches 100 up to floating rounding.
    pub cumulative_percent: f64,
    /// Band index, 0 (top 12.5% of the total) through 7.
    pub band: u8,
    /// Hex color for the band.
    pub color: &'static str,
}

/// Assigns one province's divisions to cumulative-contribution bands.
///
/// Input pairs are `(cd_uid, gdp_millions)` for every division of a single
/// province. Output is sorted descending by GDP; each division's band is
/// the 12.5%-wide slice its cumulative share *starts* in, so the largest
/// contributor is always band 0 and bands never decrease down the list.
/// Returns an empty vector when the provincial total is not positive.
#[must_use]
pub fn contribution_bands(divisions: &[(&str, f64)]) -> Vec<DivisionBand> {
    let total: f64 = divisions
        .iter()
        .map(|(_, gdp)| gdp.max(0.0))
        .filter(|gdp| gdp.is_finite())
        .sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut ordered: Vec<(&str, f64)> = divisions
        .iter()
        .map(|&(uid, gdp)| (uid, if gdp.is_finite() { gdp.max(0.0) } else { 0.0 }))
        .collect();
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut cumulative = 0.0;
    ordered
        .into_iter()
        .map(|(uid, gdp)| {
            let share_percent = gdp / total * 100.0;
            let band = band_for(cumulative);
            cumulative += share_percent;
            DivisionBand {
                cd_uid: uid.to_string(),
                gdp_millions: gdp,
                share_percent,
                cumulative_percent: cumulative,
                band,
                color: BAND_COLORS[band as usize],
            }
        })
        .collect()
}

/// Maps a cumulative percentage to its band index.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn band_for(cumulative_percent: f64) -> u8 {
    let index = (cumulative_percent / BAND_WIDTH_PERCENT).floor() as usize;
    index.min(BAND_COUNT - 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_sum_to_one_hundred_percent() {
        let divisions = [
            ("4811", 3_000.0),
            ("4806", 12_000.0),
            ("4801", 500.0),
            ("4802", 700.0),
            ("4803", 1_800.0),
        ];
        let bands = contribution_bands(&divisions);
        assert_eq!(bands.len(), 5);
        let sum: f64 = bands.iter().map(|b| b.share_percent).sum();
        assert!((sum - 100.0).abs() < 1e-9, "shares summed to {sum}");
        let last = &bands[bands.len() - 1];
        assert!((last.cumulative_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn output_is_sorted_descending_with_non_decreasing_bands() {
        let divisions = [
            ("3520", 250_000.0),
            ("3506", 80_000.0),
            ("3519", 60_000.0),
            ("3521", 40_000.0),
            ("3525", 30_000.0),
            ("3530", 20_000.0),
            ("3557", 9_000.0),
            ("3560", 6_000.0),
            ("3501", 3_000.0),
        ];
        let bands = contribution_bands(&divisions);
        for pair in bands.windows(2) {
            assert!(pair[0].gdp_millions >= pair[1].gdp_millions);
            assert!(pair[0].band <= pair[1].band);
        }
        assert_eq!(bands[0].band, 0);
        assert_eq!(bands[0].color, "#00d9ff");
        assert_eq!(bands[0].cd_uid, "3520");
    }

    #[test]
    fn dominant_division_takes_the_top_band() {
        // One division holding the entire total starts at 0% cumulative.
        let bands = contribution_bands(&[("6001", 1_500.0)]);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].band, 0);
        assert!((bands[0].share_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn tail_divisions_reach_the_last_band() {
        // 16 equal divisions: each holds 6.25%, so the final two start
        // beyond 87.5% cumulative and land in band 7.
        let divisions: Vec<(String, f64)> = (0..16).map(|i| (format!("59{i:02}"), 100.0)).collect();
        let pairs: Vec<(&str, f64)> = divisions.iter().map(|(u, g)| (u.as_str(), *g)).collect();
        let bands = contribution_bands(&pairs);
        assert_eq!(bands[0].band, 0);
        assert_eq!(bands[15].band, 7);
        assert_eq!(bands[15].color, "#ff0080");
        let seen: Vec<u8> = bands.iter().map(|b| b.band).collect();
        for pair in seen.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn zero_total_yields_no_bands() {
        assert!(contribution_bands(&[]).is_empty());
        assert!(contribution_bands(&[("1001", 0.0), ("1002", 0.0)]).is_empty());
        assert!(contribution_bands(&[("1001", f64::NAN)]).is_empty());
    }

    #[test]
    fn negative_and_non_finite_inputs_are_clamped_to_zero() {
        let bands = contribution_bands(&[("2401", 900.0), ("2402", -50.0), ("2403", f64::NAN)]);
        assert_eq!(bands.len(), 3);
        assert!((bands[0].share_percent - 100.0).abs() < 1e-9);
        assert!((bands[1].share_percent).abs() < 1e-9);
        assert!(bands[1].gdp_millions.abs() < f64::EPSILON);
    }
}
