//! Main entry point for the foosball rating engine
//!
//! Reads the match log, rates every match in order and writes the ratings
//! table plus the offensive and defensive leaderboards.

use anyhow::Result;
use clap::Parser;
use foosball_ratings::config::{validate_config, AppConfig};
use foosball_ratings::leaderboard::{CsvReportSink, ReportTable};
use foosball_ratings::matches::CsvMatchSource;
use foosball_ratings::service::RatingPipeline;
use foosball_ratings::KStrategy;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Foosball Ratings - overall, offensive and defensive TrueSkill ratings
#[derive(Parser)]
#[command(
    name = "foosball-ratings",
    version,
    about = "Rate 2v2 table football players from a chronological match log",
    long_about = "Foosball Ratings replays a CSV log of 2v2 matches through TrueSkill, \
                 keeping an overall, an offensive and a defensive rating per player, \
                 and writes a ratings table plus offensive and defensive leaderboards."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Match log override
    #[arg(short, long, value_name = "FILE", help = "CSV file with one match per row")]
    games: Option<PathBuf>,

    /// Output directory override
    #[arg(short, long, value_name = "DIR", help = "Directory for the report CSV files")]
    output: Option<PathBuf>,

    /// K-factor strategy override
    #[arg(
        short,
        long,
        value_name = "STRATEGY",
        help = "K-factor strategy (constant, by-margin, shutout-double-game)"
    )]
    strategy: Option<KStrategy>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with per-match logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without rating")]
    dry_run: bool,

    /// Echo reports to stdout
    #[arg(short, long, help = "Print the reports to stdout as well")]
    print: bool,

    /// Echo reports as JSON
    #[arg(long, help = "Print the leaderboards and run summary to stdout as JSON")]
    json: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(games) = &args.games {
        config.input.games_path = games.clone();
    }

    if let Some(output) = &args.output {
        config.output.directory = output.clone();
    }

    if let Some(strategy) = args.strategy {
        config.rating.strategy = strategy;
    }

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    validate_config(&config)?;
    Ok(config)
}

/// Display startup banner with run information
fn display_startup_banner(config: &AppConfig) {
    info!("Foosball Ratings v{}", foosball_ratings::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Games: {}", config.input.games_path.display());
    info!("   Reports: {}", config.output.directory.display());
    info!("   K-factor strategy: {}", config.rating.strategy);
    info!(
        "   Leaderboard threshold: {}",
        config.output.leaderboard_threshold
    );
}

fn print_table(title: &str, table: &ReportTable) {
    println!("=====================================");
    println!("{}", title);
    for row in table.all_rows() {
        println!("{}", row.join("\t"));
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    if args.dry_run {
        info!("Configuration validation successful");
        info!("Dry run completed - exiting without rating");
        return Ok(());
    }

    let source = Arc::new(CsvMatchSource::new(
        config.input.games_path.clone(),
        config.input.has_headers,
    ));
    let sink = Arc::new(CsvReportSink::new(config.output.directory.clone()));

    let pipeline = RatingPipeline::new(config, source, sink)?;
    let report = match pipeline.run() {
        Ok(report) => report,
        Err(e) => {
            error!("Rating run failed: {:#}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        let output = serde_json::json!({
            "leaderboards": report.leaderboards,
            "summary": {
                "matches_received": report.summary.matches_received,
                "matches_processed": report.summary.matches_processed,
                "significant_changes": report.summary.significant_changes.len(),
                "prediction_accuracy": report.summary.prediction_accuracy(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if args.print {
        print_table("Ratings", &report.leaderboards.ratings_table());
        print_table("Offensive leaderboard", &report.leaderboards.offensive_table());
        print_table("Defensive leaderboard", &report.leaderboards.defensive_table());
    }

    info!(
        "Done: {} players, {} matches rated",
        report.registry.len(),
        report.summary.matches_processed
    );
    Ok(())
}
