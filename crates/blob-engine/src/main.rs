//! Blob Survival simulation binary.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `blob-config.yaml` (or `$BLOB_CONFIG`)
//! 3. Build the world, the blobs, and their shared controller engine
//! 4. Run the tick loop
//! 5. Print the run report as JSON on stdout

use std::path::PathBuf;

use blob_engine::runner::log_simulation_end;
use blob_engine::{EngineError, LogObserver, SimConfig, Simulation};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "blob-config.yaml";

/// Environment variable overriding [`CONFIG_FILE`].
const CONFIG_ENV: &str = "BLOB_CONFIG";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("blob-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        width = config.world.width,
        height = config.world.height,
        seed = config.world.seed,
        max_ticks = config.world.max_ticks,
        blobs = config.blob.count,
        rule_set = ?config.driver.rule_set,
        "Configuration loaded"
    );

    // 3. Build the simulation.
    let log_interval = config.world.log_interval;
    let mut simulation = Simulation::new(config)?;

    // 4. Run.
    let report = simulation.run(&mut LogObserver::new(log_interval))?;
    log_simulation_end(&report);

    // 5. Report.
    let json = serde_json::to_string_pretty(&report).map_err(EngineError::from)?;
    println!("{json}");

    Ok(())
}

/// Load the simulation configuration.
///
/// Reads `$BLOB_CONFIG` if set, else `blob-config.yaml` in the working
/// directory. A missing default file means defaults; a missing file named
/// by the environment variable is an error.
fn load_config() -> Result<SimConfig, EngineError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        let path = PathBuf::from(path);
        info!(path = %path.display(), env = CONFIG_ENV, "Loading config from environment");
        return Ok(SimConfig::from_file(&path)?);
    }

    let path = PathBuf::from(CONFIG_FILE);
    if path.exists() {
        Ok(SimConfig::from_file(&path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimConfig::default())
    }
}
