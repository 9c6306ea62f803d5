//! Annual-to-sub-annual series expansion.
//!
//! An annual series is densified by inserting `interval - 1` synthetic points
//! per gap and assigning their values with a local degree-2 polynomial fit over
//! the nearest original anchors. Supported intervals are 2 (6-month step) and
//! 3 (4-month step); anything else is a contract violation.
//!
//! The interpolation is interpolating, not smoothing: every original anchor
//! keeps its exact value at output slot `i * interval`.

use chrono::Months;

use crate::domain::Series;
use crate::error::AppError;
use crate::math::{polyfit, polyval};

/// Expand `series` to `interval` samples per original year.
///
/// Returns a series of length `n*interval - (interval - 1)`: the trailing
/// `interval - 1` synthetic slots after the last anchor have no bracketing
/// anchor and are dropped.
///
/// With fewer than 3 anchors a degree-2 fit is not defined; the placed points
/// are returned with synthetic values still `NaN` and the caller must check
/// [`Series::has_unresolved`] and surface an explicit insufficient-data error.
pub fn expand(series: &Series, interval: u32) -> Result<Series, AppError> {
    if interval != 2 && interval != 3 {
        return Err(AppError::schema(format!(
            "Unsupported interpolation interval {interval} (expected 2 or 3)."
        )));
    }
    if series.is_empty() {
        return Err(AppError::not_found("Cannot expand an empty series."));
    }

    let interval = interval as usize;
    let step_months = 12 / interval as u32;

    // Sort anchors by timestamp; input order is not guaranteed.
    let mut anchors: Vec<(chrono::NaiveDate, f64)> = series
        .timestamps
        .iter()
        .copied()
        .zip(series.values.iter().copied())
        .collect();
    anchors.sort_by_key(|(ts, _)| *ts);

    let n = anchors.len();
    let mut timestamps = Vec::with_capacity(n * interval);
    let mut values = Vec::with_capacity(n * interval);

    for (ts, value) in &anchors {
        timestamps.push(*ts);
        values.push(*value);
        for k in 1..interval {
            timestamps.push(*ts + Months::new(step_months * k as u32));
            values.push(f64::NAN);
        }
    }

    if n >= 3 {
        fill_synthetic_slots(&mut values, n, interval)?;
    }

    // Drop the synthetic tail beyond the last anchor.
    let keep = n * interval - (interval - 1);
    timestamps.truncate(keep);
    values.truncate(keep);

    Ok(Series::new(timestamps, values, step_months))
}

/// Fill every `NaN` slot from a quadratic through the three anchors nearest
/// the gap it sits in.
fn fill_synthetic_slots(values: &mut [f64], n: usize, interval: usize) -> Result<(), AppError> {
    for gap in 0..n - 1 {
        // Anchor ordinals used for this gap's fit: the bracketing pair plus
        // the next anchor, falling back to the previous one at the tail.
        let window = if gap + 2 < n {
            [gap, gap + 1, gap + 2]
        } else {
            [gap - 1, gap, gap + 1]
        };

        let xs: Vec<f64> = window.iter().map(|&i| (i * interval) as f64).collect();
        let ys: Vec<f64> = window.iter().map(|&i| values[i * interval]).collect();

        let coeffs = polyfit(&xs, &ys, 2).ok_or_else(|| {
            AppError::numeric("Degree-2 interpolation fit failed (degenerate anchors).")
        })?;

        for k in 1..interval {
            let slot = gap * interval + k;
            let fitted = polyval(&coeffs, slot as f64);
            if !fitted.is_finite() {
                return Err(AppError::numeric(
                    "Non-finite interpolated value during series expansion.",
                ));
            }
            values[slot] = fitted;
        }
    }
    Ok(())
}
