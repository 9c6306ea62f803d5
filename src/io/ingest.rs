//! CSV ingest and validation.
//!
//! This module turns the raw emissions CSV into a clean, typed observation
//! list that is safe to reshape and rank.
//!
//! Design goals:
//! - **Strict schema** for the fixed column set (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (input order is preserved; callers sort)
//! - **Separation of concerns**: no reshaping or statistics logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::Observation;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: typed observations + row errors + counters.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

const REQUIRED_COLUMNS: [&str; 4] = ["country_or_area", "year", "value", "category"];

/// Load and validate the emissions CSV.
///
/// The schema is fixed by contract: `country_or_area, year, value, category`.
/// A missing column fails the whole run; a malformed row is recorded and
/// skipped. Missing `value` cells are kept as `None`.
pub fn load_observations(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::schema(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::schema(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::schema(format!(
                "Missing required column: `{name}`"
            )));
        }
    }

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(obs) => observations.push(obs),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = observations.len();
    if rows_used == 0 {
        return Err(AppError::not_found(
            "No valid rows remain after validation.",
        ));
    }

    Ok(IngestedData {
        observations,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿country_or_area"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Observation, String> {
    let country = get_required(record, header_map, "country_or_area")?.to_string();
    let category = get_required(record, header_map, "category")?.to_string();

    let year_str = get_required(record, header_map, "year")?;
    let year = year_str
        .parse::<i32>()
        .map_err(|_| format!("Invalid `year` value '{year_str}'."))?;

    let value = match get_optional(record, header_map, "value") {
        None => None,
        Some(s) => {
            let v = s
                .parse::<f64>()
                .map_err(|_| format!("Invalid `value` '{s}'."))?;
            if v.is_finite() {
                Some(v)
            } else {
                return Err(format!("Non-finite `value` '{s}'."));
            }
        }
    };

    Ok(Observation {
        country,
        year,
        value,
        category,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    fn header_map(fields: &[&str]) -> HashMap<String, usize> {
        build_header_map(&record(fields))
    }

    #[test]
    fn parse_row_basic() {
        let map = header_map(&["country_or_area", "year", "value", "category"]);
        let obs = parse_row(&record(&["Austria", "2001", "42.5", "co2"]), &map).unwrap();
        assert_eq!(obs.country, "Austria");
        assert_eq!(obs.year, 2001);
        assert_eq!(obs.value, Some(42.5));
        assert_eq!(obs.category, "co2");
    }

    #[test]
    fn parse_row_keeps_missing_value() {
        let map = header_map(&["country_or_area", "year", "value", "category"]);
        let obs = parse_row(&record(&["Austria", "2001", "", "co2"]), &map).unwrap();
        assert_eq!(obs.value, None);
    }

    #[test]
    fn parse_row_rejects_bad_year() {
        let map = header_map(&["country_or_area", "year", "value", "category"]);
        let err = parse_row(&record(&["Austria", "20x1", "1.0", "co2"]), &map).unwrap_err();
        assert!(err.contains("year"));
    }

    #[test]
    fn header_normalization_strips_bom() {
        let map = header_map(&["\u{feff}Country_Or_Area", "year", "value", "category"]);
        assert!(map.contains_key("country_or_area"));
    }
}
