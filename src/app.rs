//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the statistics and/or forecast branches
//! - prints reports/plots
//! - writes CSV exports

use clap::Parser;

use crate::cli::{AnalysisArgs, Command};
use crate::domain::{PipelineConfig, SegmentKind};
use crate::error::AppError;
use crate::plot::LabeledSeries;

pub mod pipeline;

/// Entry point for the `ghg` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Rank(args) => handle_rank(&config_from_args(&args)),
        Command::Forecast(args) => handle_forecast(&config_from_args(&args)),
        Command::Run(args) => {
            let config = config_from_args(&args);
            handle_rank(&config)?;
            handle_forecast(&config)
        }
    }
}

fn handle_rank(config: &PipelineConfig) -> Result<(), AppError> {
    let run = pipeline::run_rank(config)?;

    println!("{}", crate::report::format_run_summary(&run.ingest, config));
    println!("{}", crate::report::format_ratings(&run.ratings));

    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::schema(format!(
            "Failed to create output directory '{}': {e}",
            config.out_dir.display()
        ))
    })?;
    crate::io::export::write_ratings_csvs(&config.out_dir, &run.ratings)?;

    if config.plot_countries {
        write_country_quicklooks(config)?;
    }

    Ok(())
}

/// Glyph palette for the per-country quick-look (cycled per category).
const GAS_GLYPHS: [char; 6] = ['o', 'x', '+', '*', '#', '@'];

/// Render one all-gases plot per country into the output directory.
fn write_country_quicklooks(config: &PipelineConfig) -> Result<(), AppError> {
    let overviews = pipeline::run_gas_overview(config)?;
    let total = overviews.len();

    for (step, overview) in overviews.iter().enumerate() {
        println!("Step: {} of {}", step + 1, total);

        let labeled: Vec<LabeledSeries<'_>> = overview
            .series
            .iter()
            .enumerate()
            .map(|(i, (category, series))| LabeledSeries {
                label: category.as_str(),
                glyph: GAS_GLYPHS[i % GAS_GLYPHS.len()],
                series,
            })
            .collect();

        let title = format!("all emissions of: {}", overview.country);
        let rendered =
            crate::plot::render_ascii_plot(&labeled, &title, config.plot_width, config.plot_height);

        let path = config
            .out_dir
            .join(format!("{}_all_gases.txt", sanitize_filename(&overview.country)));
        std::fs::write(&path, &rendered).map_err(|e| {
            AppError::schema(format!(
                "Failed to write quick-look plot '{}': {e}",
                path.display()
            ))
        })?;
    }

    Ok(())
}

/// Country names contain spaces and punctuation; keep filenames portable.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn handle_forecast(config: &PipelineConfig) -> Result<(), AppError> {
    let run = pipeline::run_forecast(config)?;
    let set = &run.split_set;

    println!(
        "{}",
        crate::report::format_split_summary(
            set,
            &run.model_name,
            &config.forecast_category,
            &config.forecast_country,
        )
    );

    if config.plot || config.plot_out.is_some() {
        let title = format!(
            "prediction of {} emissions for {}",
            config.forecast_category, config.forecast_country
        );
        let labeled = [
            segment(SegmentKind::Train, &set.train),
            segment(SegmentKind::Test, &set.test),
            segment(SegmentKind::Backtest, &set.backtest),
            segment(SegmentKind::Forecast, &set.forecast),
        ];
        let rendered =
            crate::plot::render_ascii_plot(&labeled, &title, config.plot_width, config.plot_height);

        if config.plot {
            println!("{rendered}");
        }
        if let Some(path) = &config.plot_out {
            std::fs::write(path, &rendered).map_err(|e| {
                AppError::schema(format!(
                    "Failed to write plot file '{}': {e}",
                    path.display()
                ))
            })?;
        }
    }

    Ok(())
}

fn segment<'a>(kind: SegmentKind, series: &'a crate::domain::Series) -> LabeledSeries<'a> {
    let glyph = match kind {
        SegmentKind::Train => 'o',
        SegmentKind::Test => 'x',
        SegmentKind::Backtest => 'b',
        SegmentKind::Forecast => 'f',
    };
    LabeledSeries {
        label: kind.display_name(),
        glyph,
        series,
    }
}

pub fn config_from_args(args: &AnalysisArgs) -> PipelineConfig {
    PipelineConfig {
        data_path: args.data.clone(),
        categories: args.categories.clone(),
        forecast_category: args.category.clone(),
        forecast_country: args.country.clone(),
        interpolation_interval: args.interval,
        rating_type: args.rating_type,
        train_fraction: args.train_fraction,
        forecast_steps: args.steps,
        out_dir: args.out_dir.clone(),
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        plot_out: args.plot_out.clone(),
        plot_countries: args.plot_countries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_filename_keeps_ascii_alphanumerics() {
        assert_eq!(sanitize_filename("European Union"), "European_Union");
        assert_eq!(sanitize_filename("Côte d'Ivoire"), "C_te_d_Ivoire");
        assert_eq!(sanitize_filename("Austria"), "Austria");
    }
}
