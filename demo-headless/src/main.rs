mod config;

use anyhow::{bail, Context, Result};
use carbon_stock_core::export::export_file_stem_today;
use carbon_stock_core::{
    estimate, format_number, Hectares, NumberLocale, Plot, PlotReport, PlotSurvey,
    SpeciesCatalog, SurveyTree, Workbook,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ReportConfig;

/// Carbon stock report for a forestry plot
#[derive(Parser, Debug)]
#[command(name = "carbon-report")]
#[command(about = "Estimate plot carbon stock and CO2 sequestration", long_about = None)]
struct Args {
    /// Plot survey file (.toml or .json); a demo plot is used when omitted
    survey: Option<PathBuf>,

    /// Species catalog TOML replacing the built-in Indonesian species list
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Report configuration TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the plot area in hectares
    #[arg(short, long)]
    area: Option<f64>,

    /// Number formatting locale (id, en)
    #[arg(short, long)]
    locale: Option<String>,

    /// Write the summary and tree detail sheets as CSV into this directory
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Print the full result as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// List the species catalog and exit
    #[arg(long)]
    list_species: bool,
}

/// A small mixed plot with one tree of every catalog species
fn demo_survey(catalog: &SpeciesCatalog) -> PlotSurvey {
    let trees = catalog
        .iter()
        .enumerate()
        .map(|(i, species)| SurveyTree {
            id: Some(format!("DEMO-{:02}", i + 1)),
            species: species.name.clone(),
            dbh_cm: 12.0 + 6.0 * i as f64,
        })
        .collect();

    PlotSurvey {
        plot: Plot::new("Demo Plot", Hectares::new(0.25)),
        trees,
    }
}

fn print_catalog(catalog: &SpeciesCatalog) {
    println!("{:<36} {:<24} {:>12}", "Species", "Scientific name", "ρ (g/cm³)");
    for species in catalog {
        println!(
            "{:<36} {:<24} {:>12.2}",
            species.name, species.scientific_name, *species.wood_density
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };

    let catalog = match args.catalog.as_ref().or(config.catalog.as_ref()) {
        Some(path) => SpeciesCatalog::load(path)
            .with_context(|| format!("failed to load species catalog {}", path.display()))?,
        None => SpeciesCatalog::indonesian_defaults(),
    };
    info!(species = catalog.len(), "Species catalog ready");

    if args.list_species {
        print_catalog(&catalog);
        return Ok(());
    }

    let locale_tag = args.locale.as_deref().unwrap_or(&config.locale);
    let Some(locale) = NumberLocale::from_tag(locale_tag) else {
        bail!("unsupported locale '{locale_tag}' (expected id or en)");
    };

    let mut survey = match &args.survey {
        Some(path) => PlotSurvey::load(path)
            .with_context(|| format!("failed to load survey {}", path.display()))?,
        None => {
            info!("No survey file given, using demo plot");
            demo_survey(&catalog)
        }
    };
    if let Some(area) = args.area {
        survey.plot.area = Hectares::new(area);
    }

    let trees = survey
        .resolve(&catalog)
        .context("survey does not match the species catalog")?;
    let result = estimate(&trees, survey.plot.area).context("carbon estimate failed")?;

    info!(
        trees = result.total_trees,
        carbon_t = %format_number(*result.total_carbon_stock, 4, NumberLocale::English),
        "Estimate complete"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let report = PlotReport::new(&survey.plot, &result)
            .with_locale(locale)
            .with_decimals(config.decimals);
        print!("{report}");
    }

    if let Some(dir) = args.export_dir.as_ref().or(config.export_dir.as_ref()) {
        let workbook = Workbook::from_results(&result, &survey.plot);
        let stem = export_file_stem_today(&survey.plot.name);
        let written = workbook
            .write_csv_dir(dir, &stem)
            .with_context(|| format!("failed to export to {}", dir.display()))?;
        for path in written {
            eprintln!("Exported {}", path.display());
        }
    }

    Ok(())
}
