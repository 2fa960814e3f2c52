//! Display formatting for metric values.
//!
//! Mirrors what the panels show: GDP figures as whole millions with a
//! `M` suffix, incomes as whole dollars, percentages to one decimal,
//! populations with thousands separators. Missing values format as
//! their placeholder rather than erroring, matching the
//! degrade-to-blank policy everywhere else.

/// Formats a GDP value in millions as `"$74,432M"`. Zero and
/// non-finite values format as `"$0"` with no suffix.
#[must_use]
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "$0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = value.abs().round() as u64;

    format!("{sign}${}M", group_thousands(rounded))
}

/// Formats an average income as whole dollars, `"$52,340"`. Provinces
/// without survey data format as `"N/A"`.
#[must_use]
pub fn format_income(value: Option<f64>) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return "N/A".to_string();
    };

    let sign = if value < 0.0 { "-" } else { "" };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = value.abs().round() as u64;

    format!("{sign}${}", group_thousands(rounded))
}

/// Formats a percentage to one decimal, with `None` shown as `"0.0%"`.
#[must_use]
pub fn format_percentage(value: Option<f64>) -> String {
    value.map_or_else(|| "0.0%".to_string(), |value| format!("{value:.1}%"))
}

/// Formats a count with thousands separators.
#[must_use]
pub fn format_number(value: u64) -> String {
    group_thousands(value)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}
