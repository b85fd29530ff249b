//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, multiplier > 0)
//! - Check that URLs and the contract address parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let chain = &config.blockchain;

    if let Err(e) = chain.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("invalid URL '{}': {}", chain.rpc_url, e),
        ));
    }
    for failover in &chain.failover_urls {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new(
                "blockchain.failover_urls",
                format!("invalid URL '{}'", failover),
            ));
        }
    }
    if chain.chain_id == 0 {
        errors.push(ValidationError::new("blockchain.chain_id", "must be non-zero"));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if chain.confirmation_blocks == 0 {
        errors.push(ValidationError::new("blockchain.confirmation_blocks", "must be >= 1"));
    }
    if chain.gas_price_multiplier.is_nan() || chain.gas_price_multiplier <= 0.0 {
        errors.push(ValidationError::new("blockchain.gas_price_multiplier", "must be > 0"));
    }

    match config.contract.address.parse::<Address>() {
        Ok(address) if address == Address::ZERO => {
            errors.push(ValidationError::new(
                "contract.address",
                "must not be the zero address",
            ));
        }
        Ok(_) => {}
        Err(e) => {
            errors.push(ValidationError::new(
                "contract.address",
                format!("invalid address '{}': {}", config.contract.address, e),
            ));
        }
    }

    if config.tracker.poll_interval_ms == 0 {
        errors.push(ValidationError::new("tracker.poll_interval_ms", "must be > 0"));
    }
    if config.tracker.confirmation_timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            "tracker.confirmation_timeout_secs",
            "must be > 0 when set",
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
