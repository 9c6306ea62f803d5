//! Category normalization and per-category grouping.
//!
//! The raw UN export uses long category labels such as
//! `carbon_dioxide_co2_emissions_without_land_use_...`; everything downstream
//! works with a short canonical key derived from the first three
//! underscore-delimited tokens (`carbon_dioxide_co2`).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{Observation, Series};
use crate::error::AppError;

/// Per-category observation tables, keyed by canonical category key.
pub type CategoryTable = BTreeMap<String, Vec<Observation>>;

/// Canonical key for a raw category label: its first three underscore tokens.
pub fn canonical_key(label: &str) -> String {
    label
        .split('_')
        .take(3)
        .collect::<Vec<_>>()
        .join("_")
}

/// Distinct category values in first-appearance order.
pub fn distinct_categories(observations: &[Observation]) -> Vec<String> {
    let mut seen = Vec::new();
    for obs in observations {
        if !seen.iter().any(|c| c == &obs.category) {
            seen.push(obs.category.clone());
        }
    }
    seen
}

/// Distinct country values in first-appearance order.
pub fn distinct_countries(observations: &[Observation]) -> Vec<String> {
    let mut seen = Vec::new();
    for obs in observations {
        if !seen.iter().any(|c| c == &obs.country) {
            seen.push(obs.country.clone());
        }
    }
    seen
}

/// Replace every raw category label with its positional target label.
///
/// Targets are matched to distinct raw labels by first-appearance order. A
/// count mismatch is an ambiguous mapping and fails rather than silently
/// truncating.
pub fn relabel(observations: &[Observation], target_labels: &[String]) -> Result<Vec<Observation>, AppError> {
    let distinct = distinct_categories(observations);
    if distinct.len() != target_labels.len() {
        return Err(AppError::schema(format!(
            "Category relabel mismatch: {} distinct categories but {} target labels.",
            distinct.len(),
            target_labels.len()
        )));
    }

    let mapping: BTreeMap<&str, &str> = distinct
        .iter()
        .map(String::as_str)
        .zip(target_labels.iter().map(String::as_str))
        .collect();

    Ok(observations
        .iter()
        .map(|obs| Observation {
            category: mapping[obs.category.as_str()].to_string(),
            ..obs.clone()
        })
        .collect())
}

/// Group observations by canonical category key, restricted to `selected_keys`.
///
/// A requested key with no matching raw category is a hard error so that
/// downstream ranking never mistakes "no data" for "zero value".
pub fn group_by_category(
    observations: &[Observation],
    selected_keys: &[String],
) -> Result<CategoryTable, AppError> {
    let mut full: CategoryTable = BTreeMap::new();
    for obs in observations {
        full.entry(canonical_key(&obs.category))
            .or_default()
            .push(obs.clone());
    }

    let mut table = CategoryTable::new();
    for key in selected_keys {
        let entry = full
            .get(key)
            .ok_or_else(|| AppError::not_found(format!("Category key not found: `{key}`")))?;
        table.insert(key.clone(), entry.clone());
    }
    Ok(table)
}

/// Select one country from a category table entry as a year-sorted annual series.
///
/// Timestamps are January 1st of each observation year; the step is 12 months.
/// Observations with a missing value carry no anchor information for
/// interpolation and are dropped here.
pub fn annual_series(observations: &[Observation], country: &str) -> Result<Series, AppError> {
    let mut rows: Vec<(i32, f64)> = observations
        .iter()
        .filter(|obs| obs.country == country)
        .filter_map(|obs| obs.value.map(|v| (obs.year, v)))
        .collect();

    if rows.is_empty() {
        return Err(AppError::not_found(format!(
            "No observations for country `{country}`."
        )));
    }

    rows.sort_by_key(|(year, _)| *year);

    let mut timestamps = Vec::with_capacity(rows.len());
    let mut values = Vec::with_capacity(rows.len());
    for (year, value) in rows {
        let date = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::schema(format!("Invalid year {year}.")))?;
        timestamps.push(date);
        values.push(value);
    }

    Ok(Series::new(timestamps, values, 12))
}
