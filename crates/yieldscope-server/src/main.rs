//! Dashboard server binary for Yieldscope.
//!
//! This is the main entry point that wires together the dataset, the
//! world geometry, and the HTTP dashboard. It loads configuration,
//! ingests and cleans the crop CSV, logs a startup analysis of the
//! data, and serves the dashboards until the process is stopped.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `yieldscope.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load and clean the crop observation CSV
//! 4. Parse world country geometry for the maps
//! 5. Run the whole-dataset analysis for the startup report
//! 6. Build shared application state
//! 7. Serve HTTP until shutdown

mod error;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use yieldscope_core::AppConfig;
use yieldscope_data::{Dataset, load_csv};
use yieldscope_figures::WorldGeometry;
use yieldscope_stats::Analysis;
use yieldscope_web::{AppState, ServerConfig, start_server};

use crate::error::LaunchError;

/// Application entry point for the dashboard server.
///
/// Initializes all subsystems and serves HTTP. Returns an error code
/// on failure.
///
/// # Errors
///
/// Returns an error if any initialization step or the server itself fails.
#[tokio::main]
async fn main() -> Result<(), LaunchError> {
    // 1. Load configuration. Logging is not up yet, so this step stays
    //    silent; the outcome is logged right after init.
    let config_path = Path::new("yieldscope.yaml");
    let config_found = config_path.exists();
    let config = if config_found {
        AppConfig::from_file(config_path)?
    } else {
        let mut config = AppConfig::default();
        config.dataset.apply_env_overrides();
        config
    };

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("yieldscope-server starting");
    if !config_found {
        info!("Config file not found, using defaults");
    }
    info!(
        csv_path = %config.dataset.csv_path.display(),
        world_geojson_path = %config.dataset.world_geojson_path.display(),
        crops_of_interest = config.dataset.crops_of_interest.len(),
        period_ms = config.timeline.period_ms,
        "Configuration loaded"
    );

    // 3. Load and clean the crop dataset.
    let report = load_csv(&config.dataset.csv_path, &config.dataset.crops_of_interest)?;
    let dataset = Dataset::new(report)?;
    let profile = dataset.profile();
    info!(
        rows_read = profile.rows_read,
        rows_used = profile.rows_used,
        rows_skipped = profile.rows_skipped,
        rows_filtered = profile.rows_filtered,
        crops = profile.crop_count,
        regions = profile.region_count,
        year_min = profile.year_min,
        year_max = profile.year_max,
        "Dataset loaded"
    );

    // 4. Parse world geometry. A missing world file is not fatal: map
    //    endpoints degrade to their inline error page instead.
    let world = WorldGeometry::from_file(&config.dataset.world_geojson_path).map_or_else(
        |error| {
            warn!(error = %error, "World geometry unavailable, map endpoints degraded");
            WorldGeometry::empty()
        },
        |world| {
            info!(countries = world.len(), "World geometry loaded");
            world
        },
    );

    // 5. Whole-dataset analysis for the startup report.
    let analysis = Analysis::compute(&dataset);
    analysis.regression.as_ref().map_or_else(
        || {
            info!(
                outliers = analysis.outlier_count,
                "Startup analysis complete, too few complete rows for regression"
            );
        },
        |summary| {
            info!(
                outliers = analysis.outlier_count,
                r_squared = summary.r_squared,
                "Startup analysis complete"
            );
        },
    );

    // 6. Build shared application state.
    let state = Arc::new(AppState::new(dataset, world, config.timeline.period_ms)?);

    // 7. Serve until shutdown.
    let server_config = ServerConfig {
        host: config.server.host,
        port: config.server.port,
    };
    start_server(&server_config, state).await?;

    Ok(())
}
