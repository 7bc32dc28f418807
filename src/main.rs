mod config;
mod constellation;
mod coverage;
mod elements;
mod heatmap;
mod visibility;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::Config;
use crate::constellation::Constellation;
use crate::coverage::{CoverageMode, CoverageRequest, CoverageService};
use crate::elements::{CelestrakSource, ElementAcquirer, ElementCache, Freshness, SatelliteRecord};
use crate::visibility::{orbit_track, Observer, Sgp4Propagator};

#[derive(Parser)]
#[command(name = "sat-coverage")]
#[command(about = "Satellite availability and ground coverage for an observer")]
struct Cli {
    /// YAML configuration file; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate constellations against an observer and print the result as JSON
    Coverage {
        /// Constellation(s) to evaluate
        #[arg(short = 'C', long = "constellation", required = true, value_delimiter = ',')]
        constellations: Vec<Constellation>,
        /// Observer as "lat,lon" in degrees
        #[arg(short, long, allow_hyphen_values = true)]
        observer: String,
        /// Observer altitude in meters
        #[arg(long, default_value_t = 0.0)]
        altitude_m: f64,
        #[arg(long, default_value_t = 300)]
        max_sats: usize,
        #[arg(long, value_enum, default_value_t = CoverageMode::Station)]
        mode: CoverageMode,
        /// Replace the constellation's minimum elevation (degrees)
        #[arg(long)]
        min_elevation: Option<f64>,
        /// Include heatmap sample points
        #[arg(long)]
        heatmap: bool,
        #[arg(long)]
        point_spacing_km: Option<f64>,
        /// Evaluation instant (RFC3339); now when omitted
        #[arg(long, value_parser = parse_rfc3339)]
        at: Option<DateTime<Utc>>,
    },
    /// Acquire element sets for a constellation and print them
    Acquire {
        #[arg(short = 'C', long)]
        constellation: Constellation,
        #[arg(long, default_value_t = 300)]
        max_sats: usize,
    },
    /// Print a satellite's ground track around an instant
    Track {
        #[arg(short = 'C', long)]
        constellation: Constellation,
        #[arg(short, long)]
        norad: u32,
        /// Total window, centered on the instant
        #[arg(long, default_value = "90m", value_parser = humantime::parse_duration)]
        span: std::time::Duration,
        #[arg(long, default_value_t = 180)]
        points: u32,
        #[arg(long, value_parser = parse_rfc3339)]
        at: Option<DateTime<Utc>>,
    },
}

#[derive(Serialize)]
struct AcquireOutput {
    constellation: Constellation,
    freshness: Freshness,
    records: Vec<SatelliteRecord>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(Config::from_file).transpose() {
        Ok(c) => c.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let acquirer = match build_acquirer(&config) {
        Ok(a) => Arc::new(a),
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Coverage {
            constellations,
            observer,
            altitude_m,
            max_sats,
            mode,
            min_elevation,
            heatmap,
            point_spacing_km,
            at,
        } => {
            let Some(observer) = Observer::from_coordinates(&observer, Some(altitude_m)) else {
                eprintln!("Invalid observer coordinates: {}", observer);
                return ExitCode::FAILURE;
            };
            let request = CoverageRequest {
                constellations,
                observer,
                max_sats,
                mode,
                min_elevation_override: min_elevation,
                heatmap,
                point_spacing_km,
            };
            coverage(&config, acquirer, &request, at.unwrap_or_else(Utc::now)).await
        }
        Commands::Acquire {
            constellation,
            max_sats,
        } => acquire(&acquirer, constellation, max_sats).await,
        Commands::Track {
            constellation,
            norad,
            span,
            points,
            at,
        } => {
            track(
                &acquirer,
                constellation,
                norad,
                span,
                points,
                at.unwrap_or_else(Utc::now),
            )
            .await
        }
    }
}

fn build_acquirer(config: &Config) -> Result<ElementAcquirer, String> {
    let cache = ElementCache::open(config.cache.folder.clone())
        .map_err(|e| format!("Error opening element cache: {}", e))?;
    let source = CelestrakSource::new(config.upstream.base_url.clone(), config.upstream.timeout)
        .map_err(|e| format!("Error building HTTP client: {}", e))?;

    Ok(ElementAcquirer::new(
        Arc::new(cache),
        Arc::new(source),
        config.cache.refresh_interval,
        config.upstream.timeout,
    ))
}

async fn coverage(
    config: &Config,
    acquirer: Arc<ElementAcquirer>,
    request: &CoverageRequest,
    at: DateTime<Utc>,
) -> ExitCode {
    let service = CoverageService::new(
        acquirer,
        Arc::new(Sgp4Propagator),
        config.evaluation.max_concurrency,
        config.heatmap.point_spacing_km,
    );

    match service.compute(request, at).await {
        Ok(response) => print_json(&response),
        Err(e) => {
            eprintln!("Coverage failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn acquire(acquirer: &ElementAcquirer, constellation: Constellation, max_sats: usize) -> ExitCode {
    match acquirer.acquire(constellation, max_sats).await {
        Ok(acquisition) => print_json(&AcquireOutput {
            constellation,
            freshness: acquisition.freshness,
            records: acquisition.records,
        }),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn track(
    acquirer: &ElementAcquirer,
    constellation: Constellation,
    norad: u32,
    span: std::time::Duration,
    points: u32,
    at: DateTime<Utc>,
) -> ExitCode {
    let acquisition = match acquirer.acquire(constellation, usize::MAX).await {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(record) = acquisition.records.iter().find(|r| r.norad_id == norad) else {
        eprintln!("NORAD {} not found in {}", norad, constellation);
        return ExitCode::FAILURE;
    };

    let span = match chrono::Duration::from_std(span) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid span: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_json(&orbit_track(record, at, span, points, &Sgp4Propagator))
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}
