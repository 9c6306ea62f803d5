//! Forecasting capability and concrete models.
//!
//! The evaluation layer only depends on the three-operation [`Forecaster`]
//! capability, so it can be exercised against a deterministic stub in tests
//! while the pipeline runs the differenced-AR model.

use chrono::NaiveDate;

use crate::domain::Series;
use crate::error::AppError;

pub mod ar;

pub use ar::*;

/// Common interface for forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to a regularized training series.
    fn fit(&mut self, series: &Series) -> Result<(), AppError>;

    /// Predict values for every grid timestamp in `[start, end]`.
    ///
    /// Both bounds must lie on the fitted series' frequency grid, strictly
    /// after the training range.
    fn predict_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Series, AppError>;

    /// Forecast `steps` periods starting one frequency step after the end of
    /// the training series.
    fn forecast(&self, steps: usize) -> Result<Series, AppError>;

    /// Model name for reports.
    fn name(&self) -> &str;
}
