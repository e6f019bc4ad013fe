//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → copied into each subsystem at startup
//! ```
//!
//! Configuration is read once; there is no hot reload.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    LimiterConfig, ListenerConfig, LogFormat, ObservabilityConfig, QueryConfig, ServiceConfig,
    StoreConfig, TimeoutConfig,
};
pub use validation::{validate_config, ConfigValidationError};
