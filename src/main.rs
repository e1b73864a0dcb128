//! staffrelay - staff relay and AutoMod bot.
//!
//! Reads line-delimited JSON platform events from stdin and drives the
//! relay and AutoMod against an in-process platform.

use staffrelay::config::{Config, validate};
use staffrelay::gateway::Gateway;
use staffrelay::handlers::Router;
use staffrelay::persistence::JsonFileStore;
use staffrelay::platform::memory::MemoryPlatform;
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true);
    if std::env::var_os("STAFFRELAY_LOG_JSON").is_some() {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path).map_err(|e| {
            error!(path = %config_path, error = %e, "Failed to load config");
            e
        })?
    } else {
        warn!(path = %config_path, "Config file not found, using defaults");
        Config::default()
    };

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} problem(s)", errors.len());
    }

    info!(
        name = %config.bot.name,
        data = %config.bot.data_path,
        "Starting staffrelay"
    );

    let persistence = Arc::new(JsonFileStore::new(&config.bot.data_path));
    let platform = Arc::new(MemoryPlatform::new());
    let router = Router::init(&config, persistence, platform.clone(), platform.clone())
        .await
        .map_err(|e| {
            error!(path = %config.bot.data_path, error = %e, "Failed to load server document");
            e
        })?;

    let gateway = Gateway::new(Arc::new(router), platform);
    let stats = gateway.run(BufReader::new(tokio::io::stdin())).await?;
    info!(frames = stats.frames, "Shutdown complete");
    Ok(())
}
