//! Smart Farm Dashboard
//!
//! Soil carbon, fertilizer and region-based fertilizer recommendations
//! backed by hosted prediction services.
//!
//! # Usage
//!
//! ```bash
//! # Serve the dashboard API
//! smartfarm serve --addr 0.0.0.0:8080
//!
//! # One-off predictions
//! smartfarm soil-carbon --nitrogen 1.2 --phosphorus 40 --ph 6.5 --potassium 0.8
//! smartfarm fertilizer --nitrogen 0.3 --phosphorus 20 --ph 5.8 --potassium 0.4 --crop maize
//! smartfarm regional --county kiambu --crop maize --json
//!
//! # Validate a config file
//! smartfarm check-config ./smartfarm.toml
//! ```
//!
//! # Environment Variables
//!
//! - `SMARTFARM_CONFIG`: Path to the TOML config (default: `./smartfarm.toml`)
//! - `SMARTFARM_SERVER_ADDR`: Override `[server] addr`
//! - `SMARTFARM_CORS_ORIGINS`: Comma-separated origins allowed cross-origin
//! - `SMARTFARM_LOG_FORMAT`: `json` for structured logs
//! - `RUST_LOG`: Logging level (default: info)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use smartfarm::api::{create_app, DashboardState};
use smartfarm::client::{RecommendationClient, Recommender};
use smartfarm::config::validation::{validate_settings, validate_unknown_keys};
use smartfarm::config::DashboardConfig;
use smartfarm::forms::{CarbonForm, FertilizerForm, FormField, RegionalForm};
use smartfarm::report::Report;
use smartfarm::workflow::{Workflow, WorkflowState};

const LOG_FORMAT_ENV_VAR: &str = "SMARTFARM_LOG_FORMAT";

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "smartfarm")]
#[command(about = "Smart Farm Dashboard: soil and fertilizer recommendations")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file. Bypasses the normal search order.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print prediction results as JSON instead of a text report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Args, Debug)]
struct SoilArgs {
    /// Nitrogen, percent
    #[arg(long)]
    nitrogen: String,
    /// Phosphorus, ppm
    #[arg(long)]
    phosphorus: String,
    /// Soil pH
    #[arg(long)]
    ph: String,
    /// Potassium, meq%
    #[arg(long)]
    potassium: String,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Serve the dashboard HTTP API
    Serve {
        /// Override the bind address (default from config)
        #[arg(short, long, value_name = "HOST:PORT", env = "SMARTFARM_SERVER_ADDR")]
        addr: Option<String>,
    },

    /// Predict soil organic carbon
    SoilCarbon {
        #[command(flatten)]
        soil: SoilArgs,
    },

    /// Recommend mineral and organic fertilizer for a crop
    Fertilizer {
        #[command(flatten)]
        soil: SoilArgs,
        #[arg(long)]
        crop: String,
        /// Skip the organic fertilizer half
        #[arg(long)]
        single: bool,
    },

    /// Recommend fertilizer from county and crop
    Regional {
        #[arg(long)]
        county: String,
        #[arg(long)]
        crop: String,
    },

    /// Validate a config file and report warnings
    CheckConfig {
        /// File to check (default: --config, then the normal search order)
        path: Option<PathBuf>,
    },
}

// ============================================================================
// Setup
// ============================================================================

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV_VAR).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    // Logs go to stderr so --json output stays clean on stdout
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(explicit: Option<&Path>) -> Result<DashboardConfig> {
    match explicit {
        Some(path) => DashboardConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(DashboardConfig::load()),
    }
}

fn build_client(config: &DashboardConfig) -> Result<RecommendationClient> {
    RecommendationClient::from_config(config).context("Failed to create prediction client")
}

fn fill<F: smartfarm::forms::Form, R>(workflow: &mut Workflow<F, R>, fields: &[(FormField, &str)]) -> Result<()> {
    for &(field, value) in fields {
        workflow
            .handle_input_change(field, value)
            .with_context(|| format!("Cannot set {field}"))?;
    }
    Ok(())
}

fn soil_fields(soil: &SoilArgs) -> [(FormField, &str); 4] {
    [
        (FormField::Nitrogen, soil.nitrogen.as_str()),
        (FormField::Phosphorus, soil.phosphorus.as_str()),
        (FormField::SoilPh, soil.ph.as_str()),
        (FormField::Potassium, soil.potassium.as_str()),
    ]
}

/// Print a settled workflow, or fail with its message.
fn finish<R: Report + Serialize>(state: &WorkflowState<R>, json: bool) -> Result<()> {
    match state {
        WorkflowState::Succeeded(result) if json => {
            println!("{}", serde_json::to_string_pretty(result).context("Failed to encode result")?);
            Ok(())
        }
        WorkflowState::Succeeded(result) => {
            print!("{}", result.render());
            Ok(())
        }
        other => match other.error() {
            Some(msg) => bail!("{msg}"),
            None => bail!("Submission did not complete (state: {other})"),
        },
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn run_serve(config: DashboardConfig, addr: Option<String>) -> Result<()> {
    let server_addr = addr.unwrap_or_else(|| config.server.addr.clone());

    let client = build_client(&config)?;
    let recommender: Arc<dyn Recommender> = Arc::new(client);
    let state = DashboardState::new(recommender, config.dashboard.title.clone());
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind {server_addr}"))?;

    info!(title = %config.dashboard.title, "Starting dashboard");
    info!("Dashboard API available at: http://{}", server_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Received Ctrl+C, shutting down");
        })
        .await
        .context("HTTP server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn run_soil_carbon(config: &DashboardConfig, soil: &SoilArgs, json: bool) -> Result<()> {
    let client = build_client(config)?;
    let mut workflow: Workflow<CarbonForm, _> = Workflow::new();
    fill(&mut workflow, &soil_fields(soil))?;

    let state = workflow
        .submit(|sample| async move { client.predict_soil_carbon(&sample).await })
        .await;
    finish(state, json)
}

async fn run_fertilizer(
    config: &DashboardConfig,
    soil: &SoilArgs,
    crop: &str,
    single: bool,
    json: bool,
) -> Result<()> {
    let client = build_client(config)?;
    let mut fields = soil_fields(soil).to_vec();
    fields.push((FormField::Crop, crop));

    if single {
        let mut workflow: Workflow<FertilizerForm, _> = Workflow::new();
        fill(&mut workflow, &fields)?;
        let state = workflow
            .submit(|query| async move { client.predict_fertilizer(&query).await })
            .await;
        finish(state, json)
    } else {
        let mut workflow: Workflow<FertilizerForm, _> = Workflow::new();
        fill(&mut workflow, &fields)?;
        let state = workflow
            .submit(|query| async move { client.predict_fertilizer_combined(&query).await })
            .await;
        finish(state, json)
    }
}

async fn run_regional(config: &DashboardConfig, county: &str, crop: &str, json: bool) -> Result<()> {
    let client = build_client(config)?;
    let mut workflow: Workflow<RegionalForm, _> = Workflow::new();
    fill(&mut workflow, &[(FormField::County, county), (FormField::Crop, crop)])?;

    let state = workflow
        .submit(|query| async move { client.predict_regional(&query).await })
        .await;
    finish(state, json)
}

/// Report unknown keys and setting problems without aborting on the first.
fn run_check_config(path: Option<PathBuf>) -> Result<()> {
    let path = path.or_else(|| {
        std::env::var(smartfarm::config::CONFIG_ENV_VAR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from(smartfarm::config::LOCAL_CONFIG_FILE);
                local.exists().then_some(local)
            })
    });

    let Some(path) = path else {
        println!("No config file found; built-in defaults are valid.");
        return Ok(());
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut warnings = validate_unknown_keys(&contents);
    let config: DashboardConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let (errors, setting_warnings) = validate_settings(&config);
    warnings.extend(setting_warnings);

    println!("Checked {}", path.display());
    for w in &warnings {
        println!("  warning: {w}");
    }
    for e in &errors {
        println!("  error: {e}");
    }

    if !errors.is_empty() {
        bail!("{} error(s) in {}", errors.len(), path.display());
    }
    println!("OK ({} warning(s))", warnings.len());
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = CliArgs::parse();

    if let SubCommand::CheckConfig { path } = &args.command {
        return run_check_config(path.clone().or(args.config));
    }

    let config = load_config(args.config.as_deref())?;
    if config.endpoints.regional == smartfarm::config::defaults::REGIONAL_URL {
        warn!("Using the placeholder regional endpoint; set [endpoints] regional for your deployment");
    }

    match args.command {
        SubCommand::Serve { addr } => run_serve(config, addr).await,
        SubCommand::SoilCarbon { soil } => run_soil_carbon(&config, &soil, args.json).await,
        SubCommand::Fertilizer {
            soil,
            crop,
            single,
        } => run_fertilizer(&config, &soil, &crop, single, args.json).await,
        SubCommand::Regional { county, crop } => {
            run_regional(&config, &county, &crop, args.json).await
        }
        SubCommand::CheckConfig { .. } => Ok(()),
    }
}
