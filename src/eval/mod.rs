//! Train/test splitting and forecast evaluation.
//!
//! The split is positional and order-preserving: shuffling a time series
//! before splitting leaks future information into the training set, so the
//! only supported split is "earliest fraction trains, remainder tests".
//!
//! `evaluate` drives any [`Forecaster`] through fit → backtest → forecast and
//! assembles the four labeled segments into one comparable structure.

use crate::domain::{SegmentKind, Series};
use crate::error::AppError;
use crate::models::Forecaster;

/// The four mutually time-ordered segments of one evaluated series.
#[derive(Debug, Clone)]
pub struct SplitSet {
    pub train: Series,
    pub test: Series,
    /// Predictions aligned to `test`'s timestamps.
    pub backtest: Series,
    /// Predictions strictly after `train`'s end.
    pub forecast: Series,
}

impl SplitSet {
    /// One combined `(timestamp, value, segment)` table, segment by segment,
    /// each preserving its own index.
    pub fn combined(&self) -> Vec<(chrono::NaiveDate, f64, SegmentKind)> {
        let mut out = Vec::new();
        for (series, kind) in [
            (&self.train, SegmentKind::Train),
            (&self.test, SegmentKind::Test),
            (&self.backtest, SegmentKind::Backtest),
            (&self.forecast, SegmentKind::Forecast),
        ] {
            for (ts, v) in series.timestamps.iter().zip(series.values.iter()) {
                out.push((*ts, *v, kind));
            }
        }
        out
    }
}

/// Split `series` at position `round(len * train_fraction)`.
///
/// Train and test partition the series exactly: no gap, no overlap, no
/// reordering. A fraction leaving either side empty is a contract violation.
pub fn split(series: &Series, train_fraction: f64) -> Result<(Series, Series), AppError> {
    if !(0.0..=1.0).contains(&train_fraction) {
        return Err(AppError::schema(format!(
            "Train fraction must be in [0, 1], got {train_fraction}."
        )));
    }

    let len = series.len();
    let cut = (len as f64 * train_fraction).round() as usize;
    if cut == 0 || cut >= len {
        return Err(AppError::schema(format!(
            "Degenerate split: fraction {train_fraction} leaves {} train and {} test points.",
            cut,
            len - cut.min(len)
        )));
    }

    Ok((series.slice(0, cut - 1), series.slice(cut, len - 1)))
}

/// Fit `forecaster` on `train` only, backtest it over `test`'s timestamp
/// range, and forecast `n_forecast_steps` periods past `train`'s end.
pub fn evaluate(
    forecaster: &mut dyn Forecaster,
    train: &Series,
    test: &Series,
    n_forecast_steps: usize,
) -> Result<SplitSet, AppError> {
    if test.is_empty() {
        return Err(AppError::schema("Test segment is empty."));
    }

    forecaster.fit(train)?;

    let backtest = forecaster.predict_range(test.timestamps[0], test.timestamps[test.len() - 1])?;
    if backtest.timestamps != test.timestamps {
        return Err(AppError::numeric(
            "Backtest timestamps do not align with the test segment.",
        ));
    }

    let forecast = forecaster.forecast(n_forecast_steps)?;

    Ok(SplitSet {
        train: train.clone(),
        test: test.clone(),
        backtest,
        forecast,
    })
}
