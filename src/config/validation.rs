//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and the
//! relationships between fields. Every problem is reported, not just the
//! first one.

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ConfigValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration, returning every violation found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ConfigValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ConfigValidationError::new("listener.bind_address", "must not be empty"));
    }

    let limiter = &config.limiter;
    if !(limiter.rps.is_finite() && limiter.rps > 0.0) {
        errors.push(ConfigValidationError::new("limiter.rps", "must be a positive number"));
    }
    if limiter.burst < 1 {
        errors.push(ConfigValidationError::new("limiter.burst", "must be at least 1"));
    }
    if limiter.eviction_interval_secs == 0 {
        errors.push(ConfigValidationError::new(
            "limiter.eviction_interval_secs",
            "must be greater than zero",
        ));
    }
    if limiter.idle_ttl_secs == 0 {
        errors.push(ConfigValidationError::new("limiter.idle_ttl_secs", "must be greater than zero"));
    } else if limiter.rps > 0.0 && limiter.burst >= 1 {
        // An evicted client comes back with a full bucket, so the TTL must
        // cover at least one full refill or eviction would hand out tokens.
        let full_refill = f64::from(limiter.burst) / limiter.rps;
        if (limiter.idle_ttl_secs as f64) < full_refill {
            errors.push(ConfigValidationError::new(
                "limiter.idle_ttl_secs",
                format!("must be at least the full refill period ({full_refill:.1}s)"),
            ));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ConfigValidationError::new("timeouts.request_secs", "must be greater than zero"));
    }
    if config.timeouts.store_millis == 0 {
        errors.push(ConfigValidationError::new("timeouts.store_millis", "must be greater than zero"));
    }

    let query = &config.query;
    if query.max_page_size == 0 {
        errors.push(ConfigValidationError::new("query.max_page_size", "must be greater than zero"));
    }
    if query.default_page_size == 0 || query.default_page_size > query.max_page_size {
        errors.push(ConfigValidationError::new(
            "query.default_page_size",
            "must be between 1 and query.max_page_size",
        ));
    }
    if query.max_page == 0 {
        errors.push(ConfigValidationError::new("query.max_page", "must be greater than zero"));
    } else if query.max_page.checked_mul(query.max_page_size).is_none() {
        errors.push(ConfigValidationError::new(
            "query.max_page",
            "max_page * max_page_size overflows the row offset",
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ConfigValidationError::new(
            "observability.metrics_address",
            "must be a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = ServiceConfig::default();
        config.limiter.rps = 0.0;
        config.limiter.burst = 0;
        config.query.default_page_size = 500;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();

        assert!(fields.contains(&"limiter.rps"));
        assert!(fields.contains(&"limiter.burst"));
        assert!(fields.contains(&"query.default_page_size"));
    }

    #[test]
    fn test_ttl_shorter_than_refill_is_rejected() {
        let mut config = ServiceConfig::default();
        config.limiter.rps = 0.5;
        config.limiter.burst = 10;
        config.limiter.idle_ttl_secs = 5;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "limiter.idle_ttl_secs");
    }

    #[test]
    fn test_nan_rps_is_rejected() {
        let mut config = ServiceConfig::default();
        config.limiter.rps = f64::NAN;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "limiter.rps");
    }
}
