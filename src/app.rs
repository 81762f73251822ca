//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads the impact datasets (once per session)
//! - runs the filter and chart transformations for the selected view
//! - prints reports, writes exports or hands over to the TUI

use clap::Parser;
use log::{LevelFilter, debug};

use crate::chart::{
    headline, household_chart, household_headline, household_metrics, impact_table, party_chart, pivot_deciles,
    y_bound,
};
use crate::cli::{Command, ExportArgs, HouseholdArgs, ViewArgs};
use crate::data::{DatasetCache, HouseholdClient};
use crate::domain::{DecileImpact, ManifestoImpact};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::filter::{filter_decile_data, filter_manifesto_data};
use crate::report::tables::{
    format_deciles, format_household_chart, format_impact_table, format_party_chart, format_view_header,
    metric_caption,
};

/// Entry point for the `manifestos` binary.
pub fn run() -> Result<(), AppError> {
    // `manifestos` and `manifestos --year 2026` behave like `manifestos tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // Log lines would tear the alternate screen, so the TUI stays quiet
    // unless RUST_LOG asks otherwise.
    let default_level = match cli.command {
        Command::Tui(_) => LevelFilter::Off,
        _ => LevelFilter::Warn,
    };
    init_logging(default_level);

    match cli.command {
        Command::Table(args) => handle_table(&args),
        Command::Deciles(args) => handle_deciles(&args),
        Command::Metric(args) => handle_metric(&args),
        Command::Household(args) => handle_household(&args),
        Command::Export(args) => handle_export(&args),
        Command::Tui(args) => handle_tui(&args),
    }
}

fn init_logging(default_level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A second init (tests, embedding) is harmless.
    let _ = builder.try_init();
}

/// Load both datasets for a view; failures surface as runtime errors.
fn load(args: &ViewArgs) -> Result<(Vec<ManifestoImpact>, Vec<DecileImpact>), AppError> {
    let config = args.view_config();
    let cache = DatasetCache::new(args.data_source());
    debug!("loading datasets from {}", cache.source());
    cache.load_all()?;

    let manifesto = filter_manifesto_data(cache.manifesto()?, config.year, config.include_indirect);
    let decile = filter_decile_data(cache.decile()?, config.year, config.include_indirect);
    if manifesto.is_empty() {
        log::warn!(
            "no manifesto rows for year {} (indirect impacts: {})",
            config.year,
            config.include_indirect
        );
    }
    Ok((manifesto, decile))
}

fn handle_table(args: &ViewArgs) -> Result<(), AppError> {
    let (manifesto, _) = load(args)?;
    println!("{}", format_view_header(&args.view_config()));
    print!("{}", format_impact_table(&impact_table(&manifesto)));
    Ok(())
}

fn handle_deciles(args: &ViewArgs) -> Result<(), AppError> {
    let (_, decile) = load(args)?;
    println!("{}", format_view_header(&args.view_config()));
    print!("{}", format_deciles(&pivot_deciles(&decile), y_bound(&decile)));
    Ok(())
}

fn handle_metric(args: &ViewArgs) -> Result<(), AppError> {
    let (manifesto, _) = load(args)?;
    let metric = args.metric;
    let chart = party_chart(&manifesto, metric);

    println!("{}", format_view_header(&args.view_config()));
    println!("{}", metric_caption(metric));
    print!("{}", format_party_chart(&chart, &headline(&chart, metric), metric.unit()));
    Ok(())
}

fn handle_household(args: &HouseholdArgs) -> Result<(), AppError> {
    let client = HouseholdClient::from_env();
    let config = args.view.view_config();
    let results = client.calculate(&args.situation(), config.year, config.include_indirect)?;
    if results.is_empty() {
        return Err(AppError::new(EXIT_RUNTIME, "The household service returned no results."));
    }

    let metrics = household_metrics(&results);
    let chart = household_chart(&results, &args.show);
    println!("{}", format_view_header(&config));
    print!(
        "{}",
        format_household_chart(&chart, &household_headline(&chart), &metrics, &args.show)
    );
    Ok(())
}

fn handle_export(args: &ExportArgs) -> Result<(), AppError> {
    let config = args.view.view_config();
    let cache = DatasetCache::new(args.view.data_source());
    cache.load_all()?;

    let snapshot = crate::io::build_snapshot(
        &config,
        cache.manifesto()?,
        cache.decile()?,
        &cache.source().to_string(),
    );
    crate::io::write_snapshot_json(&args.out, &snapshot)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn handle_tui(args: &ViewArgs) -> Result<(), AppError> {
    let cache = DatasetCache::new(args.data_source());
    crate::tui::run(args.view_config(), cache, HouseholdClient::from_env())
}

/// Rewrite argv so `manifestos` defaults to `manifestos tui`.
///
/// Rules:
/// - `manifestos`                      -> `manifestos tui`
/// - `manifestos --year 2026 ...`      -> `manifestos tui --year 2026 ...`
/// - `manifestos --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}
