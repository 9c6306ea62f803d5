//! Export ranking statistics to CSV.
//!
//! One file per statistic group, each a grid keyed by category (columns) and
//! rank position (rows). Year-kind cells carry `country:year:value` tuples,
//! total/ratio cells carry `label:score`. The files are meant to be easy to
//! consume in spreadsheets or downstream scripts.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Observation;
use crate::error::AppError;
use crate::stats::{Ratings, ScoreEntry};

const RANK_ROWS: usize = 3;

/// Write every non-empty statistic group under `out_dir`.
///
/// Files: `max_min.csv` (combined max-year/min-year), `maximum_total.csv`,
/// `min_total.csv`, `improved.csv`. File handles are dropped (and thus
/// closed) on every path, including write failures.
pub fn write_ratings_csvs(out_dir: &Path, ratings: &Ratings) -> Result<(), AppError> {
    if !ratings.max_year.is_empty() || !ratings.min_year.is_empty() {
        write_year_grid(&out_dir.join("max_min.csv"), &ratings.max_year, &ratings.min_year)?;
    }
    if !ratings.max_total.is_empty() {
        write_score_grid(&out_dir.join("maximum_total.csv"), &ratings.max_total)?;
    }
    if !ratings.min_total.is_empty() {
        write_score_grid(&out_dir.join("min_total.csv"), &ratings.min_total)?;
    }
    if !ratings.most_improved.is_empty() {
        write_score_grid(&out_dir.join("improved.csv"), &ratings.most_improved)?;
    }
    Ok(())
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::schema(format!("Failed to create export CSV '{}': {e}", path.display())))
}

fn write_line(file: &mut File, path: &Path, line: &str) -> Result<(), AppError> {
    writeln!(file, "{line}")
        .map_err(|e| AppError::schema(format!("Failed to write export CSV '{}': {e}", path.display())))
}

/// Combined max-year/min-year grid: two columns per category.
fn write_year_grid(
    path: &Path,
    max_year: &BTreeMap<String, Vec<Observation>>,
    min_year: &BTreeMap<String, Vec<Observation>>,
) -> Result<(), AppError> {
    let mut file = create(path)?;

    let mut categories: Vec<&String> = Vec::new();
    for c in max_year.keys().chain(min_year.keys()) {
        if !categories.contains(&c) {
            categories.push(c);
        }
    }
    categories.sort();

    let mut header = vec!["rank".to_string()];
    for category in &categories {
        header.push(format!("max-year_{category}"));
        header.push(format!("min-year_{category}"));
    }
    write_line(&mut file, path, &header.join(","))?;

    for row in 0..RANK_ROWS {
        let mut cells = vec![(row + 1).to_string()];
        for category in &categories {
            cells.push(year_cell(max_year.get(*category), row));
            cells.push(year_cell(min_year.get(*category), row));
        }
        write_line(&mut file, path, &cells.join(","))?;
    }

    Ok(())
}

fn year_cell(entries: Option<&Vec<Observation>>, row: usize) -> String {
    match entries.and_then(|e| e.get(row)) {
        Some(obs) => format!(
            "{}:{}:{}",
            obs.country,
            obs.year,
            obs.value.map(|v| format!("{v:.1}")).unwrap_or_default()
        ),
        None => String::new(),
    }
}

/// One column per category, one row per rank position.
fn write_score_grid(path: &Path, grid: &BTreeMap<String, Vec<ScoreEntry>>) -> Result<(), AppError> {
    let mut file = create(path)?;

    let categories: Vec<&String> = grid.keys().collect();

    let mut header = vec!["rank".to_string()];
    header.extend(categories.iter().map(|c| c.to_string()));
    write_line(&mut file, path, &header.join(","))?;

    for row in 0..RANK_ROWS {
        let mut cells = vec![(row + 1).to_string()];
        for category in &categories {
            let cell = grid[*category]
                .get(row)
                .map(|e| format!("{}:{}", e.label, e.score))
                .unwrap_or_default();
            cells.push(cell);
        }
        write_line(&mut file, path, &cells.join(","))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn obs(country: &str, year: i32, value: f64) -> Observation {
        Observation {
            country: country.to_string(),
            year,
            value: Some(value),
            category: "co2".to_string(),
        }
    }

    #[test]
    fn score_grid_layout() {
        let dir = std::env::temp_dir().join("ghg_trends_export_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scores.csv");

        let mut grid = BTreeMap::new();
        grid.insert(
            "co2".to_string(),
            vec![
                ScoreEntry {
                    label: "max_total_co2_B".to_string(),
                    score: 10.0,
                },
                ScoreEntry {
                    label: "max_total_co2_A".to_string(),
                    score: 3.0,
                },
            ],
        );

        write_score_grid(&path, &grid).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "rank,co2");
        assert_eq!(lines[1], "1,max_total_co2_B:10");
        assert_eq!(lines[2], "2,max_total_co2_A:3");
        // Rank 3 stays empty rather than being padded.
        assert_eq!(lines[3], "3,");
    }

    #[test]
    fn year_grid_combines_max_and_min_columns() {
        let dir = std::env::temp_dir().join("ghg_trends_export_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("max_min.csv");

        let mut max_year = BTreeMap::new();
        max_year.insert("co2".to_string(), vec![obs("A", 2001, 20.0)]);
        let mut min_year = BTreeMap::new();
        min_year.insert("co2".to_string(), vec![obs("A", 2002, 5.0)]);

        write_year_grid(&path, &max_year, &min_year).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "rank,max-year_co2,min-year_co2");
        assert_eq!(lines[1], "1,A:2001:20.0,A:2002:5.0");
    }
}
