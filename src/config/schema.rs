//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the catalog service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, environment label).
    pub listener: ListenerConfig,

    /// Per-client admission control.
    pub limiter: LimiterConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// List endpoint bounds.
    pub query: QueryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Persistence settings.
    pub store: StoreConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4000").
    pub bind_address: String,

    /// Environment label reported by the healthcheck.
    pub environment: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4000".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Token-bucket admission control configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Enable admission control. When off every request is admitted.
    pub enabled: bool,

    /// Sustained requests per second per client.
    pub rps: f64,

    /// Maximum instantaneous tokens per client.
    pub burst: u32,

    /// How often idle buckets are swept, in seconds.
    pub eviction_interval_secs: u64,

    /// Buckets untouched for longer than this are evicted, in seconds.
    pub idle_ttl_secs: u64,

    /// Derive the client key from `X-Forwarded-For` / `X-Real-IP`.
    /// Only safe behind a proxy that overwrites these headers.
    pub trust_forwarded_for: bool,
}

impl LimiterConfig {
    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }

    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rps: 2.0,
            burst: 4,
            eviction_interval_secs: 60,
            idle_ttl_secs: 180,
            trust_forwarded_for: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,

    /// Deadline for a single persistence round trip in milliseconds.
    pub store_millis: u64,
}

impl TimeoutConfig {
    pub fn store(&self) -> Duration {
        Duration::from_millis(self.store_millis)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            store_millis: 3_000,
        }
    }
}

/// Bounds applied to list endpoint query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    /// `page_size` used when the client does not send one.
    pub default_page_size: u64,

    /// Largest accepted `page_size`.
    pub max_page_size: u64,

    /// Largest accepted `page`. Keeps offset arithmetic far from overflow.
    pub max_page: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            max_page: 10_000_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Optional JSON file with initial movies and directors.
    pub seed_path: Option<String>,
}
