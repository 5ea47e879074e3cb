use anyhow::Result;
use clap::Args;
use market::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, YahooProvider};
use moka::future::Cache;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Runtime configuration, read from arguments with environment fallbacks.
#[derive(Args, Debug, Clone)]
pub struct AppConfig {
    /// Bind address for the web server
    ///
    /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
    #[arg(short, long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
    pub bind_address: String,

    /// Base URL of the Yahoo Finance compatible chart API
    #[arg(long, env = "PROVIDER_URL", default_value = DEFAULT_BASE_URL)]
    pub provider_url: String,

    /// User agent sent to the market data provider
    #[arg(long, env = "PROVIDER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub provider_user_agent: String,

    /// Lifetime of cached price tables in seconds
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached price tables
    #[arg(long, env = "CACHE_CAPACITY", default_value_t = 1000)]
    pub cache_capacity: u64,

    /// Directory with the built frontend, served at `/`
    #[arg(long, env = "STATIC_DIR", default_value = "workspace/frontend/dist")]
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// The static directory, if it exists on disk.
    pub fn existing_static_dir(&self) -> Option<PathBuf> {
        if self.static_dir.is_dir() {
            Some(self.static_dir.clone())
        } else {
            debug!("Static directory {:?} not found, frontend disabled", self.static_dir);
            None
        }
    }
}

/// Initialize application state from the configuration
pub fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    info!("Using market data provider at {}", config.provider_url);
    let provider = YahooProvider::new(config.provider_url.clone(), &config.provider_user_agent)?;

    debug!(
        "Price cache: capacity {}, ttl {}s",
        config.cache_capacity, config.cache_ttl_secs
    );
    let cache = Cache::builder()
        .max_capacity(config.cache_capacity)
        .time_to_live(Duration::from_secs(config.cache_ttl_secs))
        .build();

    Ok(AppState {
        provider: Arc::new(provider),
        cache,
    })
}
