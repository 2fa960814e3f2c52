//! City panel geometry: the share-of-province progress arc, the
//! overview stat rows, and the city GDP bars.

use econ_map_economy_models::{City, ProvinceEconomy};
use econ_map_metrics::{
    city_gdp_share,
    format::{format_number, format_percentage},
    gdp_per_capita,
};
use serde::Serialize;

use crate::{
    CITY_COMPARISON_FRAME, Frame, HIGHLIGHT_COLOR, OVERVIEW_FRAME, SHARE_ARC_FRAME, Tick,
    comparison::{Bar, BarChart},
    label::{axis_billions, billions_label, thousands_label},
    scale::{BandScale, LinearScale},
};

/// Radius of the share arc's center line.
pub const ARC_RADIUS: f64 = 80.0;

/// Stroke thickness of the share arc.
pub const ARC_THICKNESS: f64 = 20.0;

/// Fill of non-selected city bars.
pub const CITY_BAR_COLOR: &str = "#7928ca";

const CITY_BAND_PADDING: f64 = 0.2;
const Y_TICK_COUNT: usize = 6;
const HEADROOM: f64 = 1.15;
const OVERVIEW_FIRST_ROW_Y: f64 = 40.0;
const OVERVIEW_ROW_STEP: f64 = 50.0;

/// Circular progress showing a city's share of its province's GDP.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareArc {
    pub frame: Frame,
    pub share_percent: f64,
    /// Sweep of the progress arc in radians, clockwise from twelve.
    pub end_angle: f64,
    pub radius: f64,
    pub thickness: f64,
    /// "12.3%" center text.
    pub center_label: String,
    pub caption: &'static str,
    /// "{city}'s Economic Contribution" heading.
    pub title: String,
    /// Per-capita comparison drawn under the arc.
    pub footnote: String,
}

/// Builds the share arc for a city within its province.
#[must_use]
pub fn share_arc(city: &City, province: &ProvinceEconomy) -> ShareArc {
    let share = city_gdp_share(city, province);
    let city_per_capita = gdp_per_capita(city.gdp, city.population);
    let province_per_capita = gdp_per_capita(province.gdp_2023, province.population);
    let ratio = if province_per_capita > 0.0 {
        city_per_capita / province_per_capita * 100.0
    } else {
        0.0
    };

    ShareArc {
        frame: SHARE_ARC_FRAME,
        share_percent: share,
        end_angle: share / 100.0 * std::f64::consts::TAU,
        radius: ARC_RADIUS,
        thickness: ARC_THICKNESS,
        center_label: format_percentage(Some(share)),
        caption: "of Province GDP",
        title: format!("{}'s Economic Contribution", city.name),
        footnote: format!(
            "GDP per Capita: {} ({:.0}% of province avg)",
            thousands_label(city_per_capita),
            ratio.round()
        ),
    }
}

/// One label/value row of the city overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub label: &'static str,
    pub value: String,
    pub y: f64,
}

/// The city overview stat rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityOverview {
    pub frame: Frame,
    pub title: String,
    pub rows: Vec<OverviewRow>,
}

/// Builds the four overview rows for a city.
#[must_use]
pub fn city_overview(city: &City, province: &ProvinceEconomy) -> CityOverview {
    let share = city_gdp_share(city, province);
    let per_capita = gdp_per_capita(city.gdp, city.population);

    let rows = [
        ("City GDP", billions_label(city.gdp)),
        ("Province Share", format_percentage(Some(share))),
        ("GDP per Capita", thousands_label(per_capita)),
        ("Population", format_number(city.population)),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (label, value))| {
        #[allow(clippy::cast_precision_loss)]
        let y = OVERVIEW_ROW_STEP.mul_add(index as f64, OVERVIEW_FIRST_ROW_Y);
        OverviewRow { label, value, y }
    })
    .collect();

    CityOverview {
        frame: OVERVIEW_FRAME,
        title: format!("{} Economic Overview", city.name),
        rows,
    }
}

/// Builds the city GDP bars for one province, largest first. Every bar
/// carries a value label; only the selection is highlighted.
#[must_use]
pub fn city_comparison(cities: &[City], selected_name: &str) -> BarChart {
    let frame = CITY_COMPARISON_FRAME;
    let inner_height = frame.inner_height();

    let mut ordered: Vec<&City> = cities.iter().collect();
    ordered.sort_by(|a, b| b.gdp.total_cmp(&a.gdp));

    let x = BandScale::new(ordered.len(), [0.0, frame.inner_width()], CITY_BAND_PADDING);
    let peak = ordered.iter().map(|city| city.gdp).fold(0.0, f64::max);
    let y = LinearScale::new([0.0, peak * HEADROOM], [inner_height, 0.0]);

    let bars = ordered
        .iter()
        .enumerate()
        .map(|(index, city)| {
            let highlighted = city.name == selected_name;
            let top = y.position(city.gdp);
            Bar {
                name: city.name.clone(),
                axis_label: city.name.clone(),
                x: x.position(index),
                y: top,
                width: x.bandwidth(),
                height: inner_height - top,
                color: if highlighted {
                    HIGHLIGHT_COLOR
                } else {
                    CITY_BAR_COLOR
                },
                highlighted,
                value_label: Some(billions_label(city.gdp)),
            }
        })
        .collect();

    let y_ticks = y
        .ticks(Y_TICK_COUNT)
        .into_iter()
        .map(|value| Tick {
            value,
            position: y.position(value),
            label: axis_billions(value),
        })
        .collect();

    BarChart {
        frame,
        bars,
        y_ticks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calgary() -> City {
        City {
            id: "calgary".to_string(),
            name: "Calgary".to_string(),
            province_id: "ab".to_string(),
            lat: 51.0447,
            lng: -114.0719,
            gdp: 110_000.0,
            population: 1_306_784,
            has_street_view: true,
        }
    }

    fn edmonton() -> City {
        City {
            id: "edmonton".to_string(),
            name: "Edmonton".to_string(),
            province_id: "ab".to_string(),
            lat: 53.5461,
            lng: -113.4938,
            gdp: 91_000.0,
            population: 1_010_899,
            has_street_view: true,
        }
    }

    fn alberta() -> ProvinceEconomy {
        ProvinceEconomy {
            id: "ab".to_string(),
            name: "Alberta".to_string(),
            center: [53.9333, -116.5765],
            population: 4_262_635,
            gdp_2021: 306_692.0,
            gdp_2022: 331_755.0,
            gdp_2023: 344_812.5,
            gdp_2024: 0.0,
            growth_2022_2023: 3.9,
            growth_2023_2024: 0.0,
            gdp_per_capita_2023: 80_892.63,
        }
    }

    #[test]
    fn arc_sweep_tracks_the_gdp_share() {
        let arc = share_arc(&calgary(), &alberta());

        let share = 110_000.0 / 344_812.5 * 100.0;
        assert!((arc.share_percent - share).abs() < 1e-9);
        assert!((arc.end_angle - share / 100.0 * std::f64::consts::TAU).abs() < 1e-9);
        assert_eq!(arc.center_label, "31.9%");
        assert_eq!(arc.caption, "of Province GDP");
        assert_eq!(arc.title, "Calgary's Economic Contribution");
        assert!(arc.footnote.starts_with("GDP per Capita: $84k ("));
        assert!(arc.footnote.ends_with("% of province avg)"));
    }

    #[test]
    fn overview_rows_step_down_the_frame() {
        let overview = city_overview(&calgary(), &alberta());

        assert_eq!(overview.title, "Calgary Economic Overview");
        assert_eq!(overview.rows.len(), 4);
        assert_eq!(overview.rows[0].label, "City GDP");
        assert_eq!(overview.rows[0].value, "$110.0B");
        assert_eq!(overview.rows[3].label, "Population");
        assert_eq!(overview.rows[3].value, "1,306,784");
        assert!((overview.rows[0].y - 40.0).abs() < 1e-9);
        assert!((overview.rows[3].y - 190.0).abs() < 1e-9);
    }

    #[test]
    fn city_bars_rank_descending_and_highlight_the_selection() {
        let chart = city_comparison(&[edmonton(), calgary()], "Edmonton");

        assert_eq!(chart.bars[0].name, "Calgary");
        assert_eq!(chart.bars[0].color, CITY_BAR_COLOR);
        assert_eq!(chart.bars[1].name, "Edmonton");
        assert_eq!(chart.bars[1].color, HIGHLIGHT_COLOR);
        assert!(chart.bars[1].highlighted);

        // City bars are always labeled, one decimal of billions.
        assert_eq!(chart.bars[0].value_label.as_deref(), Some("$110.0B"));
        assert_eq!(chart.bars[1].value_label.as_deref(), Some("$91.0B"));
    }

    #[test]
    fn zero_province_total_collapses_the_share() {
        let mut province = alberta();
        province.gdp_2023 = 0.0;
        let arc = share_arc(&calgary(), &province);

        assert!(arc.share_percent.abs() < f64::EPSILON);
        assert!(arc.end_angle.abs() < f64::EPSILON);
        assert_eq!(arc.center_label, "0.0%");
    }
}
