//! Differenced AR(1) forecaster.
//!
//! The reference analysis fits an autoregressive-integrated model of order
//! (1,1,0) with no seasonal terms. The same dynamics are reproduced here:
//! first-difference the series, estimate the AR(1) coefficient on lagged
//! differences by least squares, then forecast by the recursion
//!
//! ```text
//! d_{t+1} = φ d_t
//! y_{t+1} = y_t + d_{t+1}
//! ```
//!
//! Estimation quality is not the point of this model; it exists to exercise
//! the `fit → backtest → forecast` contract end to end.

use chrono::{Months, NaiveDate};
use nalgebra::{DMatrix, DVector};

use crate::domain::Series;
use crate::error::AppError;
use crate::math::solve_least_squares;
use crate::models::Forecaster;

/// State captured by `fit` and consumed by the prediction operations.
#[derive(Debug, Clone)]
struct FittedState {
    phi: f64,
    last_value: f64,
    last_diff: f64,
    train_end: NaiveDate,
    step_months: u32,
}

/// ARI(1,1,0) without intercept.
#[derive(Debug, Clone, Default)]
pub struct Ari110 {
    state: Option<FittedState>,
}

impl Ari110 {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<&FittedState, AppError> {
        self.state
            .as_ref()
            .ok_or_else(|| AppError::numeric("Forecaster must be fitted before prediction."))
    }

    /// Recurse the fitted dynamics `steps` periods past the training end.
    fn recurse(state: &FittedState, steps: usize) -> (Vec<NaiveDate>, Vec<f64>) {
        let mut timestamps = Vec::with_capacity(steps);
        let mut values = Vec::with_capacity(steps);

        let mut y = state.last_value;
        let mut d = state.last_diff;
        for k in 1..=steps {
            d *= state.phi;
            y += d;
            timestamps.push(state.train_end + Months::new(state.step_months * k as u32));
            values.push(y);
        }
        (timestamps, values)
    }
}

impl Forecaster for Ari110 {
    fn fit(&mut self, series: &Series) -> Result<(), AppError> {
        if series.len() < 3 {
            return Err(AppError::not_found(format!(
                "Too few points to fit ARI(1,1,0): need at least 3, got {}.",
                series.len()
            )));
        }
        if series.has_unresolved() {
            return Err(AppError::numeric(
                "Training series contains unresolved missing values.",
            ));
        }

        let diffs: Vec<f64> = series.values.windows(2).map(|w| w[1] - w[0]).collect();

        // Regress d_t on d_{t-1} (no intercept, matching the (1,1,0) order).
        let x = DMatrix::from_fn(diffs.len() - 1, 1, |row, _| diffs[row]);
        let y = DVector::from_iterator(diffs.len() - 1, diffs[1..].iter().copied());
        let phi = match solve_least_squares(&x, &y) {
            Some(beta) => beta[0],
            // A flat training window has no difference signal; fall back to a
            // random-walk continuation instead of failing the run.
            None => 0.0,
        };
        if !phi.is_finite() {
            return Err(AppError::numeric("Non-finite AR coefficient estimate."));
        }

        let train_end = series
            .last_timestamp()
            .ok_or_else(|| AppError::not_found("Empty training series."))?;

        self.state = Some(FittedState {
            phi,
            last_value: *series.values.last().unwrap_or(&f64::NAN),
            last_diff: *diffs.last().unwrap_or(&0.0),
            train_end,
            step_months: series.step_months,
        });
        Ok(())
    }

    fn predict_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Series, AppError> {
        let state = self.state()?;

        let k_start = grid_steps(state.train_end, start, state.step_months)?;
        let k_end = grid_steps(state.train_end, end, state.step_months)?;
        if k_start < 1 || k_end < k_start {
            return Err(AppError::numeric(
                "Prediction range must start after the training range.",
            ));
        }

        let (timestamps, values) = Ari110::recurse(state, k_end as usize);
        let from = (k_start - 1) as usize;
        Ok(Series::new(
            timestamps[from..].to_vec(),
            values[from..].to_vec(),
            state.step_months,
        ))
    }

    fn forecast(&self, steps: usize) -> Result<Series, AppError> {
        let state = self.state()?;
        let (timestamps, values) = Ari110::recurse(state, steps);
        Ok(Series::new(timestamps, values, state.step_months))
    }

    fn name(&self) -> &str {
        "ARI(1,1,0)"
    }
}

/// Number of frequency steps from `origin` to `target`.
///
/// Fails if `target` does not sit on the origin's month grid.
fn grid_steps(origin: NaiveDate, target: NaiveDate, step_months: u32) -> Result<i64, AppError> {
    use chrono::Datelike;

    let months = (i64::from(target.year()) * 12 + i64::from(target.month0()))
        - (i64::from(origin.year()) * 12 + i64::from(origin.month0()));
    if months % i64::from(step_months) != 0 {
        return Err(AppError::numeric(format!(
            "Timestamp {target} is not on the {step_months}-month grid from {origin}."
        )));
    }
    Ok(months / i64::from(step_months))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64], step_months: u32) -> Series {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let timestamps = (0..values.len())
            .map(|i| start + Months::new(step_months * i as u32))
            .collect();
        Series::new(timestamps, values.to_vec(), step_months)
    }

    #[test]
    fn fit_recovers_ar_coefficient_on_exact_dynamics() {
        // d_t = 0.5 d_{t-1}, starting from d = 8.
        let mut values = vec![0.0];
        let mut d = 8.0;
        for _ in 0..6 {
            values.push(values.last().unwrap() + d);
            d *= 0.5;
        }
        let mut model = Ari110::new();
        model.fit(&series(&values, 4)).unwrap();

        let forecast = model.forecast(2).unwrap();
        // Next differences: 0.125, 0.0625 on top of the last value.
        let last = *values.last().unwrap();
        assert!((forecast.values[0] - (last + 0.125)).abs() < 1e-8);
        assert!((forecast.values[1] - (last + 0.1875)).abs() < 1e-8);
    }

    #[test]
    fn forecast_timestamps_start_one_step_after_training() {
        let mut model = Ari110::new();
        model.fit(&series(&[1.0, 2.0, 3.0, 4.0], 4)).unwrap();

        let forecast = model.forecast(3).unwrap();
        assert_eq!(
            forecast.timestamps[0],
            NaiveDate::from_ymd_opt(2001, 5, 1).unwrap()
        );
        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast.step_months, 4);
    }

    #[test]
    fn predict_range_matches_forecast_slice() {
        let mut model = Ari110::new();
        model.fit(&series(&[1.0, 2.0, 4.0, 7.0, 11.0], 6)).unwrap();

        let forecast = model.forecast(4).unwrap();
        let range = model
            .predict_range(forecast.timestamps[1], forecast.timestamps[3])
            .unwrap();

        assert_eq!(range.timestamps, forecast.timestamps[1..=3].to_vec());
        assert_eq!(range.values, forecast.values[1..=3].to_vec());
    }

    #[test]
    fn prediction_before_fit_fails() {
        let model = Ari110::new();
        let err = model.forecast(1).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn off_grid_prediction_range_fails() {
        let mut model = Ari110::new();
        model.fit(&series(&[1.0, 2.0, 3.0], 6)).unwrap();

        let off_grid = NaiveDate::from_ymd_opt(2001, 2, 1).unwrap();
        let err = model
            .predict_range(off_grid, NaiveDate::from_ymd_opt(2001, 7, 1).unwrap())
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn flat_series_falls_back_to_random_walk() {
        let mut model = Ari110::new();
        model.fit(&series(&[5.0, 5.0, 5.0, 5.0], 12)).unwrap();

        let forecast = model.forecast(2).unwrap();
        assert_eq!(forecast.values, vec![5.0, 5.0]);
    }
}
