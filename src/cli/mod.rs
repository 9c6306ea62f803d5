//! Command-line parsing for the emissions analysis pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the reshaping/statistics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::RatingKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ghg", version, about = "Greenhouse-gas emission trends: rankings + forecast evaluation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute ranking statistics, print tables, and export CSV grids.
    Rank(AnalysisArgs),
    /// Interpolate one category/country series and evaluate a forecast.
    Forecast(AnalysisArgs),
    /// Full one-shot analysis: rankings + forecast evaluation.
    Run(AnalysisArgs),
}

/// Common options for all subcommands.
///
/// Defaults mirror the reference report configuration.
#[derive(Debug, Parser, Clone)]
pub struct AnalysisArgs {
    /// Path to the emissions CSV (`country_or_area, year, value, category`).
    #[arg(short = 'd', long)]
    pub data: PathBuf,

    /// Canonical category keys to analyze (comma separated).
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [
            "carbon_dioxide_co2".to_string(),
            "methane_ch4_emissions".to_string(),
            "sulphur_hexafluoride_sf6".to_string(),
        ]
    )]
    pub categories: Vec<String>,

    /// Which ranking statistic(s) to compute.
    #[arg(long, value_enum, default_value_t = RatingKind::All)]
    pub rating_type: RatingKind,

    /// Category key fed into the forecast branch.
    #[arg(long, default_value = "sulphur_hexafluoride_sf6")]
    pub category: String,

    /// Country fed into the forecast branch.
    #[arg(long, default_value = "European Union")]
    pub country: String,

    /// Samples per original year after interpolation (2 or 3).
    #[arg(long, default_value_t = 3)]
    pub interval: u32,

    /// Fraction of the interpolated series used for training.
    #[arg(long, default_value_t = 0.85)]
    pub train_fraction: f64,

    /// Forecast horizon in frequency steps.
    #[arg(long, default_value_t = 30)]
    pub steps: usize,

    /// Directory for exported statistics CSVs.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Also write the rendered plot to a text file.
    #[arg(long = "plot-out")]
    pub plot_out: Option<PathBuf>,

    /// Render an all-gases quick-look per country into `--out-dir`
    /// (one text file per country; off by default).
    #[arg(long)]
    pub plot_countries: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_configuration() {
        let cli = Cli::parse_from(["ghg", "run", "--data", "emissions.csv"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };

        assert_eq!(args.interval, 3);
        assert_eq!(args.train_fraction, 0.85);
        assert_eq!(args.steps, 30);
        assert_eq!(args.category, "sulphur_hexafluoride_sf6");
        assert_eq!(args.country, "European Union");
        assert_eq!(args.categories.len(), 3);
        assert_eq!(args.rating_type, RatingKind::All);
    }

    #[test]
    fn rating_type_parses_kebab_case() {
        let cli = Cli::parse_from([
            "ghg",
            "rank",
            "--data",
            "emissions.csv",
            "--rating-type",
            "most-improved",
        ]);
        let Command::Rank(args) = cli.command else {
            panic!("expected rank subcommand");
        };
        assert_eq!(args.rating_type, RatingKind::MostImproved);
    }
}
