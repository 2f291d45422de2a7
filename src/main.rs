use chrono::Utc;
use clap::Parser;
use sitemap_kml::config::SiteMapConfig;
use sitemap_kml::ingest::sheet::AutoSource;
use sitemap_kml::logging::{self, LogLevel};
use sitemap_kml::model::SiteMapError;
use sitemap_kml::output::DirectorySink;
use sitemap_kml::pipeline::{self, RunSummary};
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate a KML site map and network link from a published sheet CSV.
#[derive(Debug, Parser)]
#[command(name = "sitemap-kml", version, about)]
struct Cli {
    /// TOML config file (styles, optional fields, column names).
    #[arg(long, env = "SITEMAP_CONFIG")]
    config: Option<PathBuf>,

    /// CSV source: published sheet URL or local file. Overrides SHEET_CSV_URL.
    #[arg(long)]
    csv: Option<String>,

    /// Public URL of the generated dataset. Overrides DATASET_URL.
    #[arg(long)]
    dataset_url: Option<String>,

    /// Client refresh interval in seconds. Overrides REFRESH_SECONDS.
    #[arg(long)]
    refresh_seconds: Option<u64>,

    /// Directory the two KML files are written to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    summary_json: bool,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    /// Append log lines to this file as well.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Include timestamps in console log lines.
    #[arg(long)]
    log_timestamps: bool,
}

fn load_config(cli: &Cli) -> Result<SiteMapConfig, SiteMapError> {
    let mut config = match &cli.config {
        Some(path) => SiteMapConfig::load(path)?,
        None => SiteMapConfig::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;

    if let Some(csv) = &cli.csv {
        config.csv_url = Some(csv.clone());
    }
    if let Some(url) = &cli.dataset_url {
        config.dataset_url = Some(url.clone());
    }
    if let Some(seconds) = cli.refresh_seconds {
        config.refresh_seconds = seconds;
    }

    config.validate()?;
    Ok(config)
}

fn execute(cli: &Cli) -> Result<(SiteMapConfig, RunSummary), SiteMapError> {
    let config = load_config(cli)?;
    tracing::debug!(
        class_field = %config.class_field,
        styles = config.styles.len(),
        "configuration loaded"
    );

    let source = AutoSource::new()?;
    let mut sink = DirectorySink::new(&cli.output_dir);
    let summary = pipeline::run(&config, &source, &mut sink, Utc::now())?;
    Ok((config, summary))
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = logging::init_logger(cli.log_level, cli.log_file.as_deref(), cli.log_timestamps) {
        eprintln!("ERROR: {}", e);
        return ExitCode::FAILURE;
    }

    match execute(&cli) {
        Ok((config, summary)) => {
            if cli.summary_json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("ERROR: failed to encode summary: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                pipeline::print_summary(&summary);
                println!("{}", pipeline::completion_message(&config, &summary));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}
