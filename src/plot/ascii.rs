//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The renderer only consumes (timestamp, value, label) triples plus a title;
//! it owns all axis, legend, and layout concerns.

use chrono::{Datelike, NaiveDate};

use crate::domain::Series;

/// One named series with its plot glyph.
pub struct LabeledSeries<'a> {
    pub label: &'a str,
    pub glyph: char,
    pub series: &'a Series,
}

/// Render the labeled series into a fixed-size character grid.
///
/// Later entries overwrite earlier ones where points collide, so callers
/// should order series background-first (e.g. train before forecast).
pub fn render_ascii_plot(
    series_list: &[LabeledSeries<'_>],
    title: &str,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((x_min, x_max)) = x_range(series_list) else {
        return format!("{title}\n(no data to plot)\n");
    };
    let (y_min, y_max) = y_range(series_list).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for entry in series_list {
        for (ts, v) in entry
            .series
            .timestamps
            .iter()
            .zip(entry.series.values.iter())
        {
            if !v.is_finite() {
                continue;
            }
            let col = scale(month_index(*ts) as f64, x_min as f64, x_max as f64, width);
            let row = scale(*v, y_min, y_max, height);
            // Row 0 is the top of the grid.
            grid[height - 1 - row][col] = entry.glyph;
        }
    }

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!("y: [{y_min:.2}, {y_max:.2}]\n"));

    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "x: [{} .. {}]\n",
        date_from_month_index(x_min),
        date_from_month_index(x_max)
    ));

    let legend: Vec<String> = series_list
        .iter()
        .map(|e| format!("{} = {}", e.glyph, e.label))
        .collect();
    out.push_str(&legend.join("  |  "));
    out.push('\n');

    out
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn date_from_month_index(idx: i64) -> NaiveDate {
    let year = idx.div_euclid(12) as i32;
    let month = idx.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn x_range(series_list: &[LabeledSeries<'_>]) -> Option<(i64, i64)> {
    let mut min = i64::MAX;
    let mut max = i64::MIN;
    for entry in series_list {
        for ts in &entry.series.timestamps {
            let idx = month_index(*ts);
            min = min.min(idx);
            max = max.max(idx);
        }
    }
    if min > max { None } else { Some((min, max)) }
}

fn y_range(series_list: &[LabeledSeries<'_>]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for entry in series_list {
        for v in &entry.series.values {
            if v.is_finite() {
                min = min.min(*v);
                max = max.max(*v);
            }
        }
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * frac } else { 1.0 };
    (min - pad, max + pad)
}

fn scale(v: f64, min: f64, max: f64, cells: usize) -> usize {
    if max <= min {
        return 0;
    }
    let frac = ((v - min) / (max - min)).clamp(0.0, 1.0);
    ((frac * (cells - 1) as f64).round() as usize).min(cells - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;

    fn series(values: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let timestamps = (0..values.len())
            .map(|i| start + Months::new(4 * i as u32))
            .collect();
        Series::new(timestamps, values.to_vec(), 4)
    }

    #[test]
    fn render_is_deterministic_and_carries_legend() {
        let s = series(&[1.0, 2.0, 3.0, 4.0]);
        let labeled = [LabeledSeries {
            label: "train",
            glyph: 'o',
            series: &s,
        }];

        let a = render_ascii_plot(&labeled, "demo", 40, 10);
        let b = render_ascii_plot(&labeled, "demo", 40, 10);
        assert_eq!(a, b);
        assert!(a.starts_with("demo\n"));
        assert!(a.contains("o = train"));
        assert!(a.contains('o'));
    }

    #[test]
    fn empty_input_renders_placeholder() {
        let out = render_ascii_plot(&[], "empty", 40, 10);
        assert!(out.contains("no data"));
    }

    #[test]
    fn nan_values_are_skipped() {
        let s = series(&[1.0, f64::NAN, 3.0]);
        let labeled = [LabeledSeries {
            label: "train",
            glyph: 'o',
            series: &s,
        }];
        // Must not panic; NaN points are simply absent from the grid.
        let out = render_ascii_plot(&labeled, "nan", 40, 10);
        assert!(out.contains("o = train"));
    }
}
