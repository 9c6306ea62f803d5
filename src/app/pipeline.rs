//! Shared pipeline logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> relabel -> {rank + export | interpolate -> split -> evaluate}
//!
//! The CLI dispatch can then focus on presentation (printing and plotting).

use crate::data;
use crate::domain::{PipelineConfig, Series};
use crate::error::AppError;
use crate::eval::{self, SplitSet};
use crate::interp;
use crate::io::ingest::{load_observations, IngestedData};
use crate::models::{Ari110, Forecaster};
use crate::stats::{self, Ratings};

/// All computed outputs of a `ghg rank` run.
#[derive(Debug, Clone)]
pub struct RankRun {
    pub ingest: IngestedData,
    pub countries: Vec<String>,
    pub ratings: Ratings,
}

/// All computed outputs of a `ghg forecast` run.
#[derive(Debug, Clone)]
pub struct ForecastRun {
    pub ingest: IngestedData,
    pub split_set: SplitSet,
    pub model_name: String,
}

/// Execute the statistics branch: ingest, normalize, rank.
pub fn run_rank(config: &PipelineConfig) -> Result<RankRun, AppError> {
    let (ingest, observations) = ingest_and_normalize(config)?;

    // Validate the requested keys before ranking, so "no data" surfaces as a
    // missing-key error instead of an empty table.
    data::group_by_category(&observations, &config.categories)?;

    let countries = data::distinct_countries(&observations);
    let ratings = stats::rank(&observations, &config.categories, &countries, config.rating_type);

    Ok(RankRun {
        ingest,
        countries,
        ratings,
    })
}

/// Execute the forecast branch: ingest, normalize, interpolate, split, evaluate.
pub fn run_forecast(config: &PipelineConfig) -> Result<ForecastRun, AppError> {
    let (ingest, observations) = ingest_and_normalize(config)?;

    let selected = std::slice::from_ref(&config.forecast_category);
    let table = data::group_by_category(&observations, selected)?;
    let annual = data::annual_series(&table[&config.forecast_category], &config.forecast_country)?;

    // A degree-2 fit needs 3 anchors; fewer is an explicit insufficient-data
    // condition, not a downstream split failure.
    if annual.len() < 3 {
        return Err(AppError::not_found(format!(
            "Insufficient data to interpolate `{}` / `{}`: need at least 3 annual observations, got {}.",
            config.forecast_category,
            config.forecast_country,
            annual.len()
        )));
    }
    let expanded = interp::expand(&annual, config.interpolation_interval)?;

    let (train, test) = eval::split(&expanded, config.train_fraction)?;

    let mut model = Ari110::new();
    let model_name = model.name().to_string();
    let split_set = eval::evaluate(&mut model, &train, &test, config.forecast_steps)?;

    Ok(ForecastRun {
        ingest,
        split_set,
        model_name,
    })
}

/// Per-country quick-look: one annual series per analyzed category.
#[derive(Debug, Clone)]
pub struct GasOverview {
    pub country: String,
    /// (canonical category key, year-sorted annual series)
    pub series: Vec<(String, Series)>,
}

/// Build the all-gases quick-look for every country in the dataset.
///
/// Categories a country never reports are skipped rather than erroring;
/// countries with no data for any analyzed category are omitted entirely.
pub fn run_gas_overview(config: &PipelineConfig) -> Result<Vec<GasOverview>, AppError> {
    let (_ingest, observations) = ingest_and_normalize(config)?;
    let table = data::group_by_category(&observations, &config.categories)?;
    let countries = data::distinct_countries(&observations);

    let mut overviews = Vec::new();
    for country in countries {
        let mut series = Vec::new();
        for (category, entries) in &table {
            if let Ok(annual) = data::annual_series(entries, &country) {
                series.push((category.clone(), annual));
            }
        }
        if !series.is_empty() {
            overviews.push(GasOverview { country, series });
        }
    }
    Ok(overviews)
}

/// Load the CSV and replace raw category labels with canonical keys.
fn ingest_and_normalize(config: &PipelineConfig) -> Result<(IngestedData, Vec<crate::domain::Observation>), AppError> {
    let ingest = load_observations(&config.data_path)?;

    let targets: Vec<String> = data::distinct_categories(&ingest.observations)
        .iter()
        .map(|label| data::canonical_key(label))
        .collect();
    let observations = data::relabel(&ingest.observations, &targets)?;

    Ok((ingest, observations))
}
