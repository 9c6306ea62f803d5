//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the reshaping/statistics code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{Observation, PipelineConfig, Series};
use crate::eval::SplitSet;
use crate::io::IngestedData;
use crate::stats::{Ratings, ScoreEntry};

/// Format the run header: dataset counters and configuration.
pub fn format_run_summary(ingest: &IngestedData, config: &PipelineConfig) -> String {
    let mut out = String::new();

    out.push_str("=== ghg - greenhouse-gas emission trends ===\n");
    out.push_str(&format!("Data: {}\n", config.data_path.display()));
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));
    out.push_str(&format!(
        "Categories: {}\n",
        config.categories.join(", ")
    ));

    if !ingest.row_errors.is_empty() {
        out.push_str("Row errors (first 5):\n");
        for err in ingest.row_errors.iter().take(5) {
            out.push_str(&format!("  line {}: {}\n", err.line, err.message));
        }
    }

    out
}

/// Format every computed ranking table.
pub fn format_ratings(ratings: &Ratings) -> String {
    let mut out = String::new();

    for (title, grid) in [
        ("Max value by year", &ratings.max_year),
        ("Min value by year", &ratings.min_year),
    ] {
        if grid.is_empty() {
            continue;
        }
        out.push_str(&format!("{title}:\n"));
        for (category, entries) in grid {
            out.push_str(&format!("  [{category}]\n"));
            out.push_str(&format_year_table(entries));
        }
        out.push('\n');
    }

    for (title, grid) in [
        ("Max total by country", &ratings.max_total),
        ("Min total by country", &ratings.min_total),
        ("Most improved", &ratings.most_improved),
    ] {
        if grid.is_empty() {
            continue;
        }
        out.push_str(&format!("{title}:\n"));
        for (category, entries) in grid {
            out.push_str(&format!("  [{category}]\n"));
            out.push_str(&format_score_table(entries));
        }
        out.push('\n');
    }

    out
}

fn format_year_table(entries: &[Observation]) -> String {
    let mut out = String::new();
    for (rank, obs) in entries.iter().enumerate() {
        out.push_str(&format!(
            "    {}. {:<32} {:>6} {:>12}\n",
            rank + 1,
            truncate(&obs.country, 32),
            obs.year,
            obs.value.map(|v| format!("{v:.1}")).unwrap_or_default()
        ));
    }
    out
}

fn format_score_table(entries: &[ScoreEntry]) -> String {
    let mut out = String::new();
    for (rank, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "    {}. {:<48} {:>12}\n",
            rank + 1,
            truncate(&entry.label, 48),
            entry.score
        ));
    }
    out
}

/// Format the split/evaluation summary printed before the plot.
pub fn format_split_summary(set: &SplitSet, model_name: &str, category: &str, country: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Forecast: {category} / {country} using {model_name}\n"
    ));
    out.push_str(&format_segment_line("train", &set.train));
    out.push_str(&format_segment_line("test", &set.test));
    out.push_str(&format_segment_line("backtest", &set.backtest));
    out.push_str(&format_segment_line("forecast", &set.forecast));

    out
}

fn format_segment_line(name: &str, series: &Series) -> String {
    match (series.timestamps.first(), series.timestamps.last()) {
        (Some(first), Some(last)) => format!(
            "- {name:<9} n={:<4} [{first} .. {last}]\n",
            series.len()
        ),
        _ => format!("- {name:<9} n=0\n"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn ratings_tables_render_ranked_rows() {
        let mut ratings = Ratings::default();
        ratings.max_year.insert(
            "co2".to_string(),
            vec![Observation {
                country: "Austria".to_string(),
                year: 2001,
                value: Some(20.0),
                category: "co2".to_string(),
            }],
        );
        let mut improved = BTreeMap::new();
        improved.insert(
            "co2".to_string(),
            vec![ScoreEntry {
                label: "most-improved_co2_Austria".to_string(),
                score: 2.0,
            }],
        );
        ratings.most_improved = improved;

        let text = format_ratings(&ratings);
        assert!(text.contains("Max value by year"));
        assert!(text.contains("Austria"));
        assert!(text.contains("most-improved_co2_Austria"));
        // Unrequested kinds produce no section.
        assert!(!text.contains("Min total"));
    }

    #[test]
    fn truncate_marks_long_labels() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd.");
    }
}
