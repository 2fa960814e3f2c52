//! Household income survey parsing.
//!
//! Survey rows carry an income value, a sampling weight, and the
//! originating province. Coverage is uneven; the territories often
//! contribute no rows at all, and the summaries downstream must treat
//! an absent province as "no data" rather than zero income.

use std::{fs, path::Path};

pub use econ_map_economy_models::{IncomeObservation, IncomeTable};
use econ_map_geography_models::sgc;
use serde::Deserialize;

use crate::{DatasetError, parse_numeric};

/// A raw survey row. Export spellings vary, so each column is matched
/// against several aliases.
#[derive(Debug, Deserialize)]
struct RawIncomeRow {
    #[serde(alias = "Income", alias = "total_income", default)]
    income: Option<String>,
    #[serde(alias = "Weight", alias = "sampling_weight", default)]
    weight: Option<String>,
    #[serde(alias = "Province", alias = "prov_code", default)]
    province: Option<String>,
}

impl RawIncomeRow {
    fn to_observation(&self) -> Option<(&'static str, IncomeObservation)> {
        let province = sgc::resolve(self.province.as_deref()?)?;

        let income = parse_numeric(self.income.as_deref()?)?;
        if income < 0.0 {
            return None;
        }

        // A missing weight column means an unweighted survey.
        let weight = self
            .weight
            .as_deref()
            .and_then(parse_numeric)
            .unwrap_or(1.0);
        if weight <= 0.0 {
            return None;
        }

        Some((province, IncomeObservation { income, weight }))
    }
}

/// Loads the income survey from a CSV file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or the CSV
/// envelope is malformed.
pub fn load_income(path: &Path) -> Result<IncomeTable, DatasetError> {
    let text = fs::read_to_string(path)?;
    let table = parse_income(&text)?;

    let observations: usize = table.values().map(Vec::len).sum();
    log::info!(
        "Loaded {observations} income observations across {} provinces from {}",
        table.len(),
        path.display()
    );

    Ok(table)
}

/// Like [`load_income`], degrading failure to an empty table.
#[must_use]
pub fn load_income_or_empty(path: &Path) -> IncomeTable {
    crate::or_empty(load_income(path), "income survey")
}

/// Parses income survey rows from CSV text. Rows with an unknown
/// province, a negative income, or a non-positive weight are skipped.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV header row cannot be read.
pub fn parse_income(text: &str) -> Result<IncomeTable, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut table = IncomeTable::new();

    for result in reader.deserialize::<RawIncomeRow>() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("skipping malformed income row: {e}");
                continue;
            }
        };

        if let Some((province, observation)) = row.to_observation() {
            table.entry(province).or_default().push(observation);
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_rows_group_by_province() {
        let table = parse_income(
            "province,income,weight\n\
             AB,85000,1.2\n\
             ab,\"62,500\",0.8\n\
             35,71000,1.0\n\
             Nova Scotia,54000,1.1\n",
        )
        .unwrap();

        assert_eq!(table["ab"].len(), 2);
        assert_eq!(table["ab"][1].income, 62_500.0);
        assert_eq!(table["on"].len(), 1);
        assert_eq!(table["ns"][0].weight, 1.1);
    }

    #[test]
    fn missing_weight_column_defaults_to_unweighted() {
        let table = parse_income("province,income\nbc,91000\n").unwrap();

        assert_eq!(table["bc"][0].weight, 1.0);
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let table = parse_income(
            "province,income,weight\n\
             zz,50000,1\n\
             bc,-5,1\n\
             bc,50000,0\n\
             bc,,1\n",
        )
        .unwrap();

        assert!(table.is_empty());
    }
}
