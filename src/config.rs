//! Service configuration
//!
//! All settings come from `CONTRACTSIG_*` environment variables with
//! conservative defaults, so the service runs with no configuration at all
//! during local dashboard development.

use crate::error::{AppError, Result};
use serde::Serialize;
use std::time::Duration;

/// API server settings
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Catalog lookup settings
#[derive(Debug, Clone, Serialize)]
pub struct CatalogConfig {
    /// Provider id in the catalog registry
    pub provider: String,
    /// Simulated lookup latency in milliseconds
    pub lookup_latency_ms: u64,
}

/// Bid session lifecycle settings
#[derive(Debug, Clone, Serialize)]
pub struct SessionConfig {
    /// Sessions idle longer than this are evicted
    pub idle_timeout_secs: u64,
    /// How often the sweeper runs
    pub sweep_interval_secs: u64,
}

/// Rate limits per endpoint category (requests per second)
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitConfig {
    pub general_rate_limit: u32,
    pub lookup_rate_limit: u32,
    pub mutation_rate_limit: u32,
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub session: SessionConfig,
    pub rate_limits: RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8720,
            },
            catalog: CatalogConfig {
                provider: "fixture".to_string(),
                lookup_latency_ms: 600,
            },
            session: SessionConfig {
                idle_timeout_secs: 3600,
                sweep_interval_secs: 300,
            },
            rate_limits: RateLimitConfig {
                general_rate_limit: 100,
                lookup_rate_limit: 20,
                mutation_rate_limit: 50,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from `CONTRACTSIG_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("CONTRACTSIG_HOST") {
            config.server.host = host;
        }
        config.server.port = parse_or("CONTRACTSIG_PORT", &lookup, config.server.port)?;

        if let Some(provider) = lookup("CONTRACTSIG_CATALOG_PROVIDER") {
            config.catalog.provider = provider;
        }
        config.catalog.lookup_latency_ms = parse_or(
            "CONTRACTSIG_LOOKUP_LATENCY_MS",
            &lookup,
            config.catalog.lookup_latency_ms,
        )?;

        config.session.idle_timeout_secs = parse_or(
            "CONTRACTSIG_SESSION_IDLE_TIMEOUT_SECS",
            &lookup,
            config.session.idle_timeout_secs,
        )?;
        config.session.sweep_interval_secs = parse_or(
            "CONTRACTSIG_SESSION_SWEEP_INTERVAL_SECS",
            &lookup,
            config.session.sweep_interval_secs,
        )?;

        config.rate_limits.general_rate_limit = parse_or(
            "CONTRACTSIG_GENERAL_RATE_LIMIT",
            &lookup,
            config.rate_limits.general_rate_limit,
        )?;
        config.rate_limits.lookup_rate_limit = parse_or(
            "CONTRACTSIG_LOOKUP_RATE_LIMIT",
            &lookup,
            config.rate_limits.lookup_rate_limit,
        )?;
        config.rate_limits.mutation_rate_limit = parse_or(
            "CONTRACTSIG_MUTATION_RATE_LIMIT",
            &lookup,
            config.rate_limits.mutation_rate_limit,
        )?;

        Ok(config)
    }

    /// Simulated lookup latency as a `Duration`
    pub fn lookup_latency(&self) -> Duration {
        Duration::from_millis(self.catalog.lookup_latency_ms)
    }

    /// Session idle timeout as a `Duration`
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session.idle_timeout_secs)
    }

    /// Sweep interval as a `Duration`
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session.sweep_interval_secs)
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid value for {}: {}", key, raw))),
        None => Ok(default),
    }
}
