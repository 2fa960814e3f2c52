//! National comparison bars: every province ranked, the selected one
//! highlighted, the rest colored by classifier bucket or by the sign of
//! their delta from the selection.

use econ_map_choropleth::{DataType, Scope, color_for};
use econ_map_economy_models::{IncomeComparisonEntry, ProvinceMetrics};
use econ_map_geography_models::sgc;
use serde::Serialize;

use crate::{
    COMPARISON_FRAME, Frame, HIGHLIGHT_COLOR, Tick,
    label::{income_label, short_currency},
    scale::{BandScale, LinearScale},
};

/// Bar color for provinces above the selected baseline in delta mode.
pub const GAIN_COLOR: &str = "#10b981";

/// Bar color for provinces below the selected baseline in delta mode.
pub const LOSS_COLOR: &str = "#ff0080";

/// Opacity of non-selected bars; the selection draws at full opacity.
pub const DIMMED_OPACITY: f64 = 0.7;

const BAND_PADDING: f64 = 0.15;
const Y_TICK_COUNT: usize = 6;
const HEADROOM: f64 = 1.15;

/// Bars only get a value label above this GDP (in millions), keeping
/// the short bars uncluttered. The selection is always labeled.
const GDP_LABEL_FLOOR: f64 = 50_000.0;

/// Income counterpart of [`GDP_LABEL_FLOOR`], in dollars.
const INCOME_LABEL_FLOOR: f64 = 30_000.0;

/// How non-selected bars are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPalette {
    /// Classifier bucket colors for the displayed metric.
    Bucket,
    /// [`GAIN_COLOR`] above the selected entity's value, [`LOSS_COLOR`]
    /// at or below it.
    SignedDelta,
}

/// One positioned bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    /// Entity name, the x-axis key.
    pub name: String,
    /// Short axis caption (2-letter province code, or the full city name).
    pub axis_label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: &'static str,
    pub highlighted: bool,
    /// Compact value text above the bar, when the bar earns one.
    pub value_label: Option<String>,
}

/// Full bar chart geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    pub frame: Frame,
    pub bars: Vec<Bar>,
    pub y_ticks: Vec<Tick>,
}

/// Builds the national GDP comparison for one selected province.
#[must_use]
pub fn gdp_comparison(metrics: &ProvinceMetrics, palette: BarPalette) -> BarChart {
    let frame = COMPARISON_FRAME;
    let inner_height = frame.inner_height();

    let entries = &metrics.comparison_data;
    let x = BandScale::new(entries.len(), [0.0, frame.inner_width()], BAND_PADDING);
    let peak = entries.iter().map(|entry| entry.gdp).fold(0.0, f64::max);
    let y = LinearScale::new([0.0, peak * HEADROOM], [inner_height, 0.0]);
    let baseline = metrics.gdp_2023;

    let bars = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let highlighted = entry.province == metrics.name;
            let color = if highlighted {
                HIGHLIGHT_COLOR
            } else {
                match palette {
                    BarPalette::Bucket => {
                        color_for(Some(entry.gdp), DataType::Gdp, Scope::Province)
                    }
                    BarPalette::SignedDelta => {
                        if entry.gdp > baseline {
                            GAIN_COLOR
                        } else {
                            LOSS_COLOR
                        }
                    }
                }
            };
            let top = y.position(entry.gdp);
            Bar {
                name: entry.province.clone(),
                axis_label: abbreviate(&entry.province),
                x: x.position(index),
                y: top,
                width: x.bandwidth(),
                height: inner_height - top,
                color,
                highlighted,
                value_label: (entry.gdp > GDP_LABEL_FLOOR || highlighted)
                    .then(|| short_currency(entry.gdp)),
            }
        })
        .collect();

    BarChart {
        frame,
        bars,
        y_ticks: currency_ticks(&y),
    }
}

/// Builds the national income comparison; provinces with no survey data
/// draw as zero-height no-data bars.
#[must_use]
pub fn income_comparison(selected_name: &str, entries: &[IncomeComparisonEntry]) -> BarChart {
    let frame = COMPARISON_FRAME;
    let inner_height = frame.inner_height();

    let x = BandScale::new(entries.len(), [0.0, frame.inner_width()], BAND_PADDING);
    let peak = entries
        .iter()
        .map(|entry| entry.income.unwrap_or(0.0))
        .fold(0.0, f64::max);
    let y = LinearScale::new([0.0, peak * HEADROOM], [inner_height, 0.0]);

    let bars = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let highlighted = entry.province == selected_name;
            let value = entry.income.unwrap_or(0.0);
            let color = if highlighted {
                HIGHLIGHT_COLOR
            } else {
                color_for(entry.income, DataType::Income, Scope::Province)
            };
            let labeled =
                entry.income.is_some_and(|income| income > INCOME_LABEL_FLOOR) || highlighted;
            let top = y.position(value);
            Bar {
                name: entry.province.clone(),
                axis_label: abbreviate(&entry.province),
                x: x.position(index),
                y: top,
                width: x.bandwidth(),
                height: inner_height - top,
                color,
                highlighted,
                value_label: labeled.then(|| {
                    entry
                        .income
                        .map_or_else(|| "N/A".to_string(), income_label)
                }),
            }
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

    BarChart {
        frame,
        bars,
        y_ticks,
    }
}

pub(crate) fn currency_ticks(y: &LinearScale) -> Vec<Tick> {
    y.ticks(Y_TICK_COUNT)
        .into_iter()
        .map(|value| Tick {
            value,
            position: y.position(value),
            label: short_currency(value),
        })
        .collect()
}

/// Two-letter axis code for a province name, falling back to the first
/// two characters for anything unrecognized.
#[must_use]
pub fn abbreviate(name: &str) -> String {
    sgc::id_for_name(name).map_or_else(
        || name.chars().take(2).collect::<String>().to_uppercase(),
        |id| sgc::axis_abbr(id).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use econ_map_economy_models::{ComparisonEntry, GdpPoint, Trend};

    use super::*;

    fn metrics() -> ProvinceMetrics {
        let mut comparison: Vec<(&str, f64)> = vec![
            ("Ontario", 871_586.4),
            ("Quebec", 452_555.3),
            ("Alberta", 344_812.5),
            ("British Columbia", 309_059.4),
            ("Saskatchewan", 77_891.6),
            ("Nova Scotia", 42_715.6),
            ("Yukon", 3_456.9),
        ];
        comparison.sort_by(|a, b| b.1.total_cmp(&a.1));

        ProvinceMetrics {
            name: "Saskatchewan".to_string(),
            gdp_2023: 77_891.6,
            gdp_2022: 75_102.3,
            gdp_2021: 70_344.0,
            gdp_2024: 0.0,
            growth_2022_2023: 3.7,
            growth_2023_2024: 0.0,
            gdp_per_capita_2023: 0.0,
            trend: Trend::Growing,
            recent_trend: vec![GdpPoint {
                year: 2023,
                gdp: 77_891.6,
            }],
            comparison_data: comparison
                .into_iter()
                .map(|(province, gdp)| ComparisonEntry {
                    province: province.to_string(),
                    gdp,
                })
                .collect(),
        }
    }

    #[test]
    fn selection_is_highlighted_and_always_labeled() {
        let chart = gdp_comparison(&metrics(), BarPalette::Bucket);
        let selected = chart.bars.iter().find(|bar| bar.highlighted).unwrap();

        assert_eq!(selected.name, "Saskatchewan");
        assert_eq!(selected.color, HIGHLIGHT_COLOR);
        assert_eq!(selected.axis_label, "SK");
        assert_eq!(selected.value_label.as_deref(), Some("$78B"));
    }

    #[test]
    fn bucket_palette_follows_the_gdp_classifier() {
        let chart = gdp_comparison(&metrics(), BarPalette::Bucket);
        let by_name = |name: &str| chart.bars.iter().find(|bar| bar.name == name).unwrap();

        assert_eq!(by_name("Ontario").color, "#00d9ff");
        assert_eq!(by_name("Alberta").color, "#00d9ff");
        assert_eq!(by_name("Nova Scotia").color, "#f81ce5");
        assert_eq!(by_name("Yukon").color, "#ff0080");
    }

    #[test]
    fn delta_palette_splits_on_the_selected_baseline() {
        let chart = gdp_comparison(&metrics(), BarPalette::SignedDelta);
        let by_name = |name: &str| chart.bars.iter().find(|bar| bar.name == name).unwrap();

        assert_eq!(by_name("Ontario").color, GAIN_COLOR);
        assert_eq!(by_name("Quebec").color, GAIN_COLOR);
        assert_eq!(by_name("Nova Scotia").color, LOSS_COLOR);
        assert_eq!(by_name("Saskatchewan").color, HIGHLIGHT_COLOR);
    }

    #[test]
    fn short_bars_go_unlabeled() {
        let chart = gdp_comparison(&metrics(), BarPalette::Bucket);
        let yukon = chart.bars.iter().find(|bar| bar.name == "Yukon").unwrap();
        assert_eq!(yukon.value_label, None);
        assert_eq!(yukon.axis_label, "YT");
    }

    #[test]
    fn bars_are_positioned_left_to_right_in_input_order() {
        let chart = gdp_comparison(&metrics(), BarPalette::Bucket);
        for pair in chart.bars.windows(2) {
            assert!(pair[1].x > pair[0].x);
            assert!((pair[0].width - pair[1].width).abs() < 1e-9);
        }
        assert_eq!(chart.bars[0].name, "Ontario");
    }

    #[test]
    fn income_bars_mark_missing_data() {
        let entries = vec![
            IncomeComparisonEntry {
                province: "Alberta".to_string(),
                income: Some(64_000.0),
            },
            IncomeComparisonEntry {
                province: "Ontario".to_string(),
                income: Some(28_500.0),
            },
            IncomeComparisonEntry {
                province: "Nunavut".to_string(),
                income: None,
            },
        ];
        let chart = income_comparison("Nunavut", &entries);

        let alberta = &chart.bars[0];
        assert_eq!(alberta.color, "#00d9ff");
        assert_eq!(alberta.value_label.as_deref(), Some("$64k"));

        // Below the label floor and not selected.
        assert_eq!(chart.bars[1].value_label, None);

        let nunavut = &chart.bars[2];
        assert!(nunavut.highlighted);
        assert!(nunavut.height.abs() < f64::EPSILON);
        assert_eq!(nunavut.value_label.as_deref(), Some("N/A"));
    }

    #[test]
    fn unknown_names_abbreviate_from_their_prefix() {
        assert_eq!(abbreviate("Newfoundland & Labrador"), "NL");
        assert_eq!(abbreviate("Atlantic"), "AT");
    }
}
