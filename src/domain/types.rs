//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during reshaping and evaluation
//! - exported to CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One row of the emissions table.
///
/// `value` is optional because real exports carry gaps; totals ignore missing
/// values rather than treating them as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    pub value: Option<f64>,
    pub category: String,
}

/// Which ranking statistic(s) to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RatingKind {
    MaxYear,
    MinYear,
    MaxTotal,
    MinTotal,
    MostImproved,
    All,
}

impl RatingKind {
    /// Label used in exported row keys (matches the export file layout).
    pub fn label(self) -> &'static str {
        match self {
            RatingKind::MaxYear => "max-year",
            RatingKind::MinYear => "min-year",
            RatingKind::MaxTotal => "max_total",
            RatingKind::MinTotal => "min_total",
            RatingKind::MostImproved => "most-improved",
            RatingKind::All => "all",
        }
    }

    /// Whether `self` requests the given concrete kind.
    pub fn wants(self, kind: RatingKind) -> bool {
        self == RatingKind::All || self == kind
    }
}

/// Segment label in a combined split/evaluation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Train,
    Test,
    Backtest,
    Forecast,
}

impl SegmentKind {
    pub fn display_name(self) -> &'static str {
        match self {
            SegmentKind::Train => "train",
            SegmentKind::Test => "test",
            SegmentKind::Backtest => "backtest",
            SegmentKind::Forecast => "forecast",
        }
    }
}

/// A regularized, time-ordered value series at a fixed month step.
///
/// Missing values are carried as `NaN` between placement and interpolation;
/// a finished series is expected to be fully finite (see `has_unresolved`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub timestamps: Vec<NaiveDate>,
    pub values: Vec<f64>,
    /// Months between consecutive samples (12 for raw annual data).
    pub step_months: u32,
}

impl Series {
    pub fn new(timestamps: Vec<NaiveDate>, values: Vec<f64>, step_months: u32) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self {
            timestamps,
            values,
            step_months,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// True if any value is still a missing-value marker (`NaN`).
    pub fn has_unresolved(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }

    pub fn last_timestamp(&self) -> Option<NaiveDate> {
        self.timestamps.last().copied()
    }

    /// Sub-series over `[start, end]` positions (inclusive), same step.
    pub fn slice(&self, start: usize, end: usize) -> Series {
        Series {
            timestamps: self.timestamps[start..=end].to_vec(),
            values: self.values[start..=end].to_vec(),
            step_months: self.step_months,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults mirroring the reference
/// report configuration).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_path: PathBuf,

    /// Canonical category keys the analysis is restricted to.
    pub categories: Vec<String>,

    /// Category/country pair fed into the interpolation + forecast branch.
    pub forecast_category: String,
    pub forecast_country: String,

    /// Synthetic samples per original annual gap (2 or 3).
    pub interpolation_interval: u32,
    pub rating_type: RatingKind,
    pub train_fraction: f64,
    pub forecast_steps: usize,

    pub out_dir: PathBuf,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub plot_out: Option<PathBuf>,
    /// Write an all-gases quick-look file per country.
    pub plot_countries: bool,
}
