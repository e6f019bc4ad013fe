//! Film catalog service.
//!
//! # Architecture Overview
//!
//! ```text
//!   request ──▶ catch-panic ─▶ request id ─▶ trace ─▶ timeout
//!                                                       │
//!                                                       ▼
//!                                            ┌──────────────────┐
//!                                            │ admission gate   │──▶ 429
//!                                            │ (token buckets)  │
//!                                            └────────┬─────────┘
//!                                                     ▼
//!   ┌────────────┐   ┌─────────────┐   ┌──────────┐   ┌────────────┐
//!   │ validator  │──▶│ sort clause │──▶│  store   │──▶│ pagination │──▶ 200
//!   └─────┬──────┘   └─────────────┘   │(deadline)│   └────────────┘
//!         ▼                            └────┬─────┘
//!        422                                ▼
//!                                       500/409/404
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use film_catalog::config::{loader, validate_config, ConfigError, ServiceConfig};
use film_catalog::lifecycle::{wait_for_signal, Shutdown};
use film_catalog::observability::{logging, metrics};
use film_catalog::store::{load_seed, MemoryStore, Seed};
use film_catalog::{AppState, HttpServer};

#[derive(Debug, Parser)]
#[command(name = "film-catalog", version, about = "Film catalog list service")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override limiter.rps
    #[arg(long)]
    limiter_rps: Option<f64>,

    /// Override limiter.burst
    #[arg(long)]
    limiter_burst: Option<u32>,

    /// Override limiter.enabled
    #[arg(long)]
    limiter_enabled: Option<bool>,
}

impl Args {
    fn load(&self) -> Result<ServiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => loader::read_config(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(rps) = self.limiter_rps {
            config.limiter.rps = rps;
        }
        if let Some(burst) = self.limiter_burst {
            config.limiter.burst = burst;
        }
        if let Some(enabled) = self.limiter_enabled {
            config.limiter.enabled = enabled;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.load()?;

    logging::init(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = %config.listener.environment,
        limiter_enabled = config.limiter.enabled,
        limiter_rps = config.limiter.rps,
        limiter_burst = config.limiter.burst,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let seed = match &config.store.seed_path {
        Some(path) => load_seed(Path::new(path))?,
        None => Seed::default(),
    };
    let movies = Arc::new(MemoryStore::new(seed.movies));
    let directors = Arc::new(MemoryStore::new(seed.directors));
    if movies.is_empty() && directors.is_empty() {
        tracing::warn!("Catalog is empty, list endpoints will return no rows");
    }
    tracing::info!(
        movies = movies.len(),
        directors = directors.len(),
        "Catalog loaded"
    );

    let state = AppState::new(&config, movies, directors);
    let server = HttpServer::new(&config, state);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        trigger.trigger();
    });

    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
