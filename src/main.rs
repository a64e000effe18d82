use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use sat_o_view::config::Config;
use sat_o_view::elements::TleLoader;
use sat_o_view::propagation::Satellite;
use sat_o_view::render::SnapshotRenderer;
use sat_o_view::scene::{TrajectoryCurve, DEFAULT_SAMPLE_STEP};
use sat_o_view::session::{Session, SessionOptions};
use sat_o_view::web::run_server;

#[derive(Parser)]
#[command(name = "sat-o-view")]
#[command(about = "Satellite orbit propagation and scene core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a TLE file or directory
    Validate { tle: PathBuf },
    /// Print one orbit of scene-space trajectory points for a satellite
    Sample {
        tle: PathBuf,
        name: String,
        /// Start instant (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Sample spacing, e.g. "30s"
        #[arg(long)]
        step: Option<humantime::Duration>,
    },
    /// Run a headless session and print the final frame as JSON
    Run {
        config: String,
        #[arg(long, default_value_t = 100)]
        ticks: u64,
        /// Real seconds per tick; defaults to the configured tick interval
        #[arg(long)]
        dt: Option<f64>,
    },
    /// Serve the scene over HTTP
    Serve { config: String },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { tle } => validate(tle),
        Commands::Sample { tle, name, at, step } => sample(tle, &name, at, step),
        Commands::Run { config, ticks, dt } => run(&config, ticks, dt),
        Commands::Serve { config } => serve(&config),
    }
}

fn validate(path: PathBuf) -> ExitCode {
    let loaded = match TleLoader::new(path).with_max_satellites(usize::MAX).load() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error loading elements: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{} valid records, {} rejected",
        loaded.records.len(),
        loaded.rejected.len()
    );
    for record in &loaded.records {
        println!("  {} ({})", record.name(), record.catalog_number());
    }
    for rejected in &loaded.rejected {
        println!("  rejected {} [{}]: {}", rejected.name, rejected.source, rejected.error);
    }

    if loaded.records.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn sample(
    path: PathBuf,
    name: &str,
    at: Option<DateTime<Utc>>,
    step: Option<humantime::Duration>,
) -> ExitCode {
    let loaded = match TleLoader::new(path).with_max_satellites(usize::MAX).load() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error loading elements: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(record) = loaded.records.into_iter().find(|r| r.name() == name) else {
        eprintln!("No valid record named '{}'", name);
        return ExitCode::FAILURE;
    };

    let satellite = match Satellite::from_record(record) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Cannot initialize {}: {}", name, e);
            return ExitCode::FAILURE;
        }
    };

    let step = step
        .and_then(|d| chrono::Duration::from_std(d.into()).ok())
        .unwrap_or(DEFAULT_SAMPLE_STEP);
    let start = at.unwrap_or_else(Utc::now);

    let output = serde_json::json!({
        "satellite": satellite.info(),
        "curve": TrajectoryCurve::sample(0, &satellite, start, step),
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &str, ticks: u64, dt: Option<f64>) -> ExitCode {
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = match build_session(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let dt = dt.unwrap_or_else(|| config.tick.interval.as_secs_f64());
    let mut renderer = SnapshotRenderer::new(Arc::new(RwLock::new(None)));
    for _ in 0..ticks {
        session.tick(dt, &mut renderer);
    }
    let frame = renderer.latest();
    session.shutdown(&mut renderer);

    match serde_json::to_string_pretty(&frame) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding frame: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn serve(config_path: &str) -> ExitCode {
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let session = match build_session(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run_server(config, session)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_session(config: &Config) -> Result<Session, String> {
    let loaded = TleLoader::new(config.elements.path.clone())
        .with_max_satellites(config.elements.max_satellites)
        .load()
        .map_err(|e| format!("Error loading elements: {}", e))?;

    if !loaded.rejected.is_empty() {
        log::warn!("{} element records were rejected", loaded.rejected.len());
    }

    let options = SessionOptions {
        start: config.clock.start.unwrap_or_else(Utc::now),
        rate: config.clock.rate,
        sample_step: config.trajectory.step(),
        interest: config.interest.clone(),
    };

    Session::new(loaded.records, options).map_err(|e| format!("Cannot start session: {}", e))
}
