//! GDP trend line geometry: one point per year at the band center, an
//! area fill down to the baseline, and nice y ticks.

use econ_map_economy_models::ProvinceMetrics;
use serde::Serialize;

use crate::{
    Frame, TREND_FRAME, Tick,
    label::short_currency,
    scale::{BandScale, LinearScale},
};

/// Trend line stroke color.
pub const LINE_COLOR: &str = "#10b981";

/// Trend point fill color.
pub const DOT_COLOR: &str = "#34d399";

/// Area fill under the line, drawn at [`AREA_OPACITY`].
pub const AREA_COLOR: &str = "#10b981";
pub const AREA_OPACITY: f64 = 0.1;

/// Radius of one trend point.
pub const DOT_RADIUS: f64 = 5.0;

const BAND_PADDING: f64 = 0.3;
const Y_TICK_COUNT: usize = 5;
const HEADROOM: f64 = 1.15;

/// One year of the trend, positioned inside the frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub year: u16,
    pub gdp: f64,
    pub x: f64,
    pub y: f64,
    /// Compact value label drawn above the point.
    pub label: String,
}

/// Full trend chart geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendChart {
    pub frame: Frame,
    pub points: Vec<TrendPoint>,
    /// y of the zero line; the area path closes down to it.
    pub baseline_y: f64,
    pub y_ticks: Vec<Tick>,
}

/// Builds the yearly GDP trend chart for one province.
#[must_use]
pub fn trend_chart(metrics: &ProvinceMetrics) -> TrendChart {
    let frame = TREND_FRAME;
    let inner_height = frame.inner_height();

    let x = BandScale::new(
        metrics.recent_trend.len(),
        [0.0, frame.inner_width()],
        BAND_PADDING,
    );
    let peak = metrics
        .recent_trend
        .iter()
        .map(|point| point.gdp)
        .fold(0.0, f64::max);
    let y = LinearScale::new([0.0, peak * HEADROOM], [inner_height, 0.0]);

    let points = metrics
        .recent_trend
        .iter()
        .enumerate()
        .map(|(index, point)| TrendPoint {
            year: point.year,
            gdp: point.gdp,
            x: x.center(index),
            y: y.position(point.gdp),
            label: short_currency(point.gdp),
        })
        .collect();

    let y_ticks = y
        .ticks(Y_TICK_COUNT)
        .into_iter()
        .map(|value| Tick {
            value,
            position: y.position(value),
            label: short_currency(value),
        })
        .collect();

    TrendChart {
        frame,
        points,
        baseline_y: inner_height,
        y_ticks,
    }
}
