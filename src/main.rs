use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use geocheck::cases::{default_cases, load_cases};
use geocheck::config::FileConfig;
use geocheck::source::GeofenceLocation;
use geocheck::{GeofenceEvaluator, LocationCheck};

/// Check whether a location falls inside, or close enough to, a geofence
///
/// Examples:
///   # Strict containment check
///   geocheck --geofence storage/geofence.json --lat 50.840473 --lon -0.146755
///
///   # Allow 30m of GPS uncertainty
///   geocheck --geofence storage/geofence.json --lat 50.840473 --lon -0.146755 --accuracy 30
///
///   # Run the built-in test cases
///   geocheck --geofence storage/geofence.json --cases
///
///   # Run cases from a file against a fence served over HTTP
///   geocheck --geofence https://example.com/geofence.json --cases my-cases.json
#[derive(Parser, Debug)]
#[command(name = "geocheck")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches geocheck.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Geofence document, a file path or http(s) URL
    #[arg(short = 'g', long)]
    geofence: Option<String>,

    /// Latitude in degrees (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude in degrees (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Accuracy radius in metres
    #[arg(short = 'a', long, allow_hyphen_values = true)]
    accuracy: Option<f64>,

    /// Evaluate a batch of cases: the built-in set, or a JSON file of them
    #[arg(long, num_args = 0..=1, conflicts_with_all = ["lat", "lon"])]
    cases: Option<Option<PathBuf>>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = match args.config {
        Some(ref path) => FileConfig::load_from(path)?,
        None => FileConfig::load().unwrap_or_default(),
    };

    let verbose = args.verbose || file_config.verbose;
    init_logging(&file_config.log_level, verbose)?;

    let geofence = args
        .geofence
        .clone()
        .or_else(|| file_config.geofence.clone());
    let Some(geofence) = geofence else {
        bail!("Must provide --geofence or set `geofence` in the config file");
    };
    let accuracy = args.accuracy.unwrap_or(file_config.accuracy);
    let remote = file_config.remote.clone().unwrap_or_default();

    let location = GeofenceLocation::parse(&geofence);
    let vertices = location.load(&remote).context("Failed to load geofence")?;
    let fence = GeofenceEvaluator::new(vertices).context("Failed to build geofence")?;

    if let Some(rect) = fence.bounding_rect() {
        tracing::info!(
            vertices = fence.len(),
            min_lon = rect.min().x,
            min_lat = rect.min().y,
            max_lon = rect.max().x,
            max_lat = rect.max().y,
            "geofence ready"
        );
    }

    if let Some(cases_path) = args.cases {
        let cases = match cases_path {
            Some(path) => load_cases(&path)?,
            None => default_cases(),
        };
        return run_cases(&fence, &cases);
    }

    let (Some(lat), Some(lon)) = (args.lat, args.lon) else {
        bail!("Must provide --lat and --lon, or --cases");
    };

    let report = LocationCheck::new(lat, lon, accuracy)
        .run(&fence)
        .context("Location check failed")?;
    println!("{}", serde_json::to_string(&report)?);

    Ok(())
}

fn run_cases(fence: &GeofenceEvaluator, cases: &[LocationCheck]) -> Result<()> {
    let pb = create_progress(cases.len() as u64);
    let mut lines = Vec::with_capacity(cases.len());

    for case in cases {
        pb.set_message(format!("({:.6}, {:.6})", case.latitude, case.longitude));
        let line = match case.run(fence) {
            Ok(report) => serde_json::json!({
                "latitude": case.latitude,
                "longitude": case.longitude,
                "accuracy": case.accuracy,
                "result": report.result,
                "message": report.message,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "case rejected");
                serde_json::json!({
                    "latitude": case.latitude,
                    "longitude": case.longitude,
                    "accuracy": case.accuracy,
                    "error": e.to_string(),
                })
            }
        };
        lines.push(line);
        pb.inc(1);
    }

    pb.finish_and_clear();

    for line in lines {
        println!("{}", line);
    }

    Ok(())
}

fn init_logging(log_level: &str, verbose: bool) -> Result<()> {
    let fallback = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")
}

fn create_progress(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let template = "{spinner:.green} [{bar:30}] {pos}/{len} {msg}";
    if let Ok(style) = ProgressStyle::with_template(template) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}
