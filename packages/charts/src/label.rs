//! Compact label formats used on chart axes and bars. The data panels
//! use the longer forms from `econ_map_metrics::format`; charts trade
//! precision for space.

/// Billions/millions rule for GDP labels: `$74B` at or above a billion
/// (values are in millions), `$0` for zero, `$92M` otherwise.
#[must_use]
pub fn short_currency(value_millions: f64) -> String {
    if value_millions >= 1_000.0 {
        format!("${:.0}B", (value_millions / 1_000.0).round())
    } else if value_millions.abs() < f64::EPSILON {
        "$0".to_string()
    } else {
        format!("${:.0}M", value_millions.round())
    }
}

/// One-decimal billions label for city GDP bars, e.g. `$37.2B`.
#[must_use]
pub fn billions_label(value_millions: f64) -> String {
    format!("${:.1}B", value_millions / 1_000.0)
}

/// Whole-billions label for city chart axes, e.g. `$37B`.
#[must_use]
pub fn axis_billions(value_millions: f64) -> String {
    format!("${:.0}B", (value_millions / 1_000.0).round())
}

/// Income label in thousands with at most one decimal: `$52.3k`,
/// `$10k`, or the plain dollar figure below a thousand.
#[must_use]
pub fn income_label(value: f64) -> String {
    if value >= 1_000.0 {
        let thousands = (value / 1_000.0 * 10.0).round() / 10.0;
        if thousands.fract().abs() < f64::EPSILON {
            format!("${thousands:.0}k")
        } else {
            format!("${thousands:.1}k")
        }
    } else {
        format!("${:.0}", value.round())
    }
}

/// Whole-thousands label for per-capita figures, e.g. `$86k`.
#[must_use]
pub fn thousands_label(value: f64) -> String {
    format!("${:.0}k", (value / 1_000.0).round())
}
