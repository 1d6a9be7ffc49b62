//! CLI entry point for the bike-share statistics tool.
//!
//! Provides subcommands for analysing one city selection, running the
//! interactive prompt loop, and listing the configured cities.

mod interactive;

use anyhow::{Context, Result};
use bikeshare_stats::analyzers::analyzer::analyze;
use bikeshare_stats::loader::{Loader, MissingValues, Selection};
use bikeshare_stats::output::{append_record, print_json, print_pretty, render_chunk, render_report};
use bikeshare_stats::registry::{CityRegistry, RegistryConfig};
use bikeshare_stats::stats::SummaryRow;
use bikeshare_stats::viewer::RecordPager;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Descriptive statistics over US bike-share trip data", long_about = None)]
struct Cli {
    /// JSON registry configuration replacing the built-in city table
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory that relative city files are resolved against
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one city, optionally filtered by month and weekday
    Analyze {
        /// City to analyze (e.g. "chicago", "new york city", "washington")
        #[arg(short, long)]
        city: String,

        /// Month name, or "all"
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Weekday name, or "all"
        #[arg(short, long, default_value = "all")]
        day: String,

        /// Fill missing values from the next record before analysing
        #[arg(long, default_value_t = false)]
        backfill: bool,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Optional: CSV file to append a summary row to
        #[arg(short, long)]
        output: Option<String>,

        /// Also print every filtered record, five per page
        #[arg(long, default_value_t = false)]
        raw: bool,
    },
    /// Prompt for selections and print reports until told to stop
    Interactive {
        /// Fill missing values from the next record before analysing
        #[arg(long, default_value_t = false)]
        backfill: bool,
    },
    /// List the configured cities and the columns they provide
    Cities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info")?);

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug")?);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let registry = build_registry(cli.config, cli.data_dir)?;

    match cli.command {
        Commands::Analyze {
            city,
            month,
            day,
            backfill,
            json,
            output,
            raw,
        } => {
            let selection = Selection::parse(&registry, &city, &month, &day)?;
            let loader = Loader::new(&registry).with_missing_values(missing_values(backfill));

            let dataset = match loader.load_selection(&selection) {
                Ok(dataset) => dataset,
                Err(e) => {
                    if let Some(path) = &output {
                        let row = SummaryRow::from_error("load_error", &e.to_string())
                            .with_selection(&selection.city, &month, &day);
                        if let Err(write_err) = append_record(path, &row) {
                            warn!(error = %write_err, "Failed to record load error");
                        }
                    }
                    return Err(e).context(format!("failed to load trips for '{city}'"));
                }
            };

            let report = analyze(&selection, &dataset, registry.months());
            print_pretty(&report);

            if json {
                println!("{}", print_json(&report)?);
            } else {
                print!("{}", render_report(&report));
            }

            if let Some(path) = output {
                append_record(&path, &SummaryRow::from_report(&report))?;
            }

            if raw {
                let mut pager = RecordPager::new(&dataset);
                loop {
                    let offset = pager.position();
                    let Some(chunk) = pager.next_chunk() else {
                        break;
                    };
                    print!("{}", render_chunk(chunk, offset));
                }
            }
        }
        Commands::Interactive { backfill } => {
            let loader = Loader::new(&registry).with_missing_values(missing_values(backfill));
            let stdin = std::io::stdin();
            interactive::run(&registry, &loader, stdin.lock(), std::io::stdout())?;
        }
        Commands::Cities => {
            let config = registry.config();
            info!(
                cities = config.cities.len(),
                data_dir = %config.data_dir.display(),
                "Configured cities"
            );
            for city in &config.cities {
                let columns: Vec<_> = city.columns.iter().map(|c| c.header()).collect();
                println!("{:<16} {:<24} {}", city.id, city.source, columns.join(", "));
            }
        }
    }

    Ok(())
}

fn env_filter(var: &str, default: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_env(var).add_directive(default.parse()?))
}

fn missing_values(backfill: bool) -> MissingValues {
    if backfill {
        MissingValues::Backfill
    } else {
        MissingValues::Keep
    }
}

/// Builds the registry from, in order of precedence: command-line flags,
/// `BIKESHARE_CONFIG` / `BIKESHARE_DATA_DIR`, and the built-in defaults.
fn build_registry(config: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<CityRegistry> {
    let config_path = config.or_else(|| std::env::var_os("BIKESHARE_CONFIG").map(PathBuf::from));

    let mut config = match config_path {
        Some(path) => RegistryConfig::load(&path)
            .with_context(|| format!("loading registry config {}", path.display()))?,
        None => RegistryConfig::default(),
    };

    if let Some(dir) =
        data_dir.or_else(|| std::env::var_os("BIKESHARE_DATA_DIR").map(PathBuf::from))
    {
        config = config.with_data_dir(dir);
    }

    Ok(CityRegistry::new(config))
}
