//! Income distribution box plot: interpolated quartiles, 1.5×IQR
//! fences, whiskers clamped to the data, and outlier points beyond the
//! fences.

use econ_map_economy_models::IncomeSummary;
use econ_map_metrics::format::format_number;
use serde::Serialize;

use crate::{BOX_PLOT_FRAME, Frame, Tick, label::income_label, scale::LinearScale};

/// Box fill and stroke color.
pub const BOX_COLOR: &str = "#00d9ff";

/// Whisker and cap color.
pub const WHISKER_COLOR: &str = "#e5e7eb";

/// Outlier point color.
pub const OUTLIER_COLOR: &str = "#f81ce5";

/// Placeholder shown instead of the plot when the survey has no rows
/// for the selected territory.
pub const NO_INCOME_MESSAGE: &str = "No income data available for this territory";

/// Fraction of the inner width taken by the box.
const BOX_WIDTH_RATIO: f64 = 0.3;
const Y_TICK_COUNT: usize = 6;
const IQR_FENCE_FACTOR: f64 = 1.5;

/// Five-number summary plus the outliers outside the fences.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Lower whisker: the fence, clamped up to the smallest value.
    pub whisker_min: f64,
    /// Upper whisker: the fence, clamped down to the largest value.
    pub whisker_max: f64,
    /// Values outside the fences, ascending.
    pub outliers: Vec<f64>,
    pub sample_size: usize,
}

/// One outlier dot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierPoint {
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

/// A statistic caption drawn beside the box ("Median: $52.3k").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatLabel {
    pub text: String,
    pub y: f64,
}

/// Full box plot geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPlot {
    pub frame: Frame,
    pub summary: BoxSummary,
    pub box_x: f64,
    pub box_width: f64,
    pub q1_y: f64,
    pub median_y: f64,
    pub q3_y: f64,
    pub whisker_min_y: f64,
    pub whisker_max_y: f64,
    pub outlier_points: Vec<OutlierPoint>,
    pub y_ticks: Vec<Tick>,
    pub stat_labels: Vec<StatLabel>,
    /// "Sample Size: 1,234" caption under the box.
    pub sample_label: String,
    /// "{name} Income Distribution" title.
    pub title: String,
}

/// Quantile of an ascending-sorted slice by linear interpolation
/// between the two nearest ranks (the `d3.quantile` convention).
#[must_use]
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if p <= 0.0 || n < 2 {
        return sorted.first().copied();
    }
    if p >= 1.0 {
        return sorted.last().copied();
    }

    #[allow(clippy::cast_precision_loss)]
    let rank = (n - 1) as f64 * p;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = rank.floor() as usize;
    let below = sorted[lower];
    let above = sorted[lower + 1];
    #[allow(clippy::cast_precision_loss)]
    let fraction = rank - lower as f64;
    Some(below + (above - below) * fraction)
}

/// Computes the five-number summary with 1.5×IQR fences. `None` when
/// `values` is empty.
#[must_use]
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let lower_fence = q1 - IQR_FENCE_FACTOR * iqr;
    let upper_fence = q3 + IQR_FENCE_FACTOR * iqr;

    let outliers: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|value| *value < lower_fence || *value > upper_fence)
        .collect();

    // Non-empty once the quantiles succeeded.
    let data_min = sorted.first().copied()?;
    let data_max = sorted.last().copied()?;

    Some(BoxSummary {
        q1,
        median,
        q3,
        iqr,
        lower_fence,
        upper_fence,
        whisker_min: lower_fence.max(data_min),
        whisker_max: upper_fence.min(data_max),
        outliers,
        sample_size: sorted.len(),
    })
}

/// Builds the income box plot for one territory, or `None` when there
/// is no survey data (the caller renders [`NO_INCOME_MESSAGE`]).
#[must_use]
pub fn income_box_plot(name: &str, income: &IncomeSummary) -> Option<BoxPlot> {
    let summary = box_summary(&income.raw_income_data)?;

    let frame = BOX_PLOT_FRAME;
    let inner_width = frame.inner_width();
    let inner_height = frame.inner_height();

    let domain_low = summary
        .outliers
        .first()
        .copied()
        .map_or(summary.whisker_min, |low| low.min(summary.whisker_min));
    let domain_high = summary
        .outliers
        .last()
        .copied()
        .map_or(summary.whisker_max, |high| high.max(summary.whisker_max));
    let y = LinearScale::new([domain_low, domain_high], [inner_height, 0.0]);

    let box_width = inner_width * BOX_WIDTH_RATIO;
    let box_x = (inner_width - box_width) / 2.0;
    let center_x = box_x + box_width / 2.0;

    let outlier_points = summary
        .outliers
        .iter()
        .map(|&value| OutlierPoint {
            value,
            x: center_x,
            y: y.position(value),
        })
        .collect();

    let stat_labels = [
        ("Min", summary.whisker_min),
        ("Q1", summary.q1),
        ("Median", summary.median),
        ("Q3", summary.q3),
        ("Max", summary.whisker_max),
    ]
    .into_iter()
    .map(|(caption, value)| StatLabel {
        text: format!("{caption}: {}", income_label(value)),
        y: y.position(value),
    })
    .collect();

    let y_ticks = y
        .ticks(Y_TICK_COUNT)
        .into_iter()
        .map(|value| Tick {
            value,
            position: y.position(value),
            label: income_label(value),
        })
        .collect();

    let sample_size = u64::try_from(income.sample_size).unwrap_or(u64::MAX);

    Some(BoxPlot {
        frame,
        box_x,
        box_width,
        q1_y: y.position(summary.q1),
        median_y: y.position(summary.median),
        q3_y: y.position(summary.q3),
        whisker_min_y: y.position(summary.whisker_min),
        whisker_max_y: y.position(summary.whisker_max),
        outlier_points,
        y_ticks,
        stat_labels,
        sample_label: format!("Sample Size: {}", format_number(sample_size)),
        title: format!("{name} Income Distribution"),
        summary,
    })
}
