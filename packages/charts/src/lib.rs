#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Stateless chart geometry for the data panels.
//!
//! Each builder maps a metrics value to ready-to-draw primitives
//! (positions, tick values, colors, label text) inside a fixed frame;
//! the browser renders the result without doing any further math.
//! Rebuilding from the same metrics always yields identical geometry.

use serde::Serialize;

pub mod boxplot;
pub mod city;
pub mod comparison;
pub mod label;
pub mod scale;
pub mod trend;

/// Axis text and secondary label color.
pub const TEXT_COLOR: &str = "#e5e7eb";

/// Grid line and axis domain color.
pub const GRID_COLOR: &str = "#374151";

/// Color of the selected entity across all charts.
pub const HIGHLIGHT_COLOR: &str = "#00d9ff";

/// Pixel margins around a chart's inner plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Fixed outer size and margins of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Frame {
    #[must_use]
    pub const fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    #[must_use]
    pub const fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

/// Frame of the provincial GDP trend chart.
pub const TREND_FRAME: Frame = Frame {
    width: 380.0,
    height: 280.0,
    margin: Margin {
        top: 30.0,
        right: 30.0,
        bottom: 50.0,
        left: 70.0,
    },
};

/// Frame of the province comparison bar charts.
pub const COMPARISON_FRAME: Frame = Frame {
    width: 380.0,
    height: 400.0,
    margin: Margin {
        top: 30.0,
        right: 20.0,
        bottom: 60.0,
        left: 70.0,
    },
};

/// Frame of the city comparison bars; the taller bottom margin leaves
/// room for rotated city names.
pub const CITY_COMPARISON_FRAME: Frame = Frame {
    width: 380.0,
    height: 400.0,
    margin: Margin {
        top: 30.0,
        right: 20.0,
        bottom: 80.0,
        left: 70.0,
    },
};

/// Frame of the income box plot.
pub const BOX_PLOT_FRAME: Frame = TREND_FRAME;

/// Frame of the city overview rows.
pub const OVERVIEW_FRAME: Frame = Frame {
    width: 380.0,
    height: 280.0,
    margin: Margin {
        top: 30.0,
        right: 30.0,
        bottom: 30.0,
        left: 30.0,
    },
};

/// Frame of the city share arc.
pub const SHARE_ARC_FRAME: Frame = Frame {
    width: 380.0,
    height: 280.0,
    margin: Margin {
        top: 40.0,
        right: 30.0,
        bottom: 30.0,
        left: 30.0,
    },
};

/// One axis tick: the data value, its pixel position along the axis,
/// and the formatted label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub position: f64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_expose_the_inner_plotting_area() {
        assert!((TREND_FRAME.inner_width() - 280.0).abs() < f64::EPSILON);
        assert!((TREND_FRAME.inner_height() - 200.0).abs() < f64::EPSILON);
        assert!((COMPARISON_FRAME.inner_height() - 310.0).abs() < f64::EPSILON);
        assert!((CITY_COMPARISON_FRAME.inner_height() - 290.0).abs() < f64::EPSILON);
    }
}
