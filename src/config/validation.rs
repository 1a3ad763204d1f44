//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate node URIs (persistent WebSocket endpoints only)
//! - Validate value ranges (timeouts > 0, gas values > 0, percentiles)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// Upper bound most nodes accept for `eth_feeHistory` block counts.
pub const MAX_SAMPLE_BLOCKS: u64 = 1024;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending key, e.g. `parameters.provider`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_ws_url("parameters.provider", &config.parameters.provider, &mut errors);
    check_ws_url(
        "parameters.provider_testnet",
        &config.parameters.provider_testnet,
        &mut errors,
    );

    check_socket_addr("service.bind_address", &config.service.bind_address, &mut errors);
    if config.service.max_body_bytes == 0 {
        errors.push(ValidationError::new("service.max_body_bytes", "must be greater than 0"));
    }
    if let Some(tls) = &config.service.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::new("service.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::new("service.tls.key_path", "must not be empty"));
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.rpc_secs == 0 {
        errors.push(ValidationError::new("timeouts.rpc_secs", "must be greater than 0"));
    }

    let fees = &config.fees;
    for (field, value) in [
        ("fees.testnet_gas_limit", fees.testnet_gas_limit),
        ("fees.testnet_gas_price_gwei", fees.testnet_gas_price_gwei),
        ("fees.transfer_gas_limit", fees.transfer_gas_limit),
        ("fees.max_wait_secs", fees.max_wait_secs),
        ("fees.block_time_secs", fees.block_time_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than 0"));
        }
    }
    if fees.sample_blocks == 0 || fees.sample_blocks > MAX_SAMPLE_BLOCKS {
        errors.push(ValidationError::new(
            "fees.sample_blocks",
            format!("must be between 1 and {}", MAX_SAMPLE_BLOCKS),
        ));
    }
    if !(0.0..=100.0).contains(&fees.reward_percentile) {
        errors.push(ValidationError::new("fees.reward_percentile", "must be between 0 and 100"));
    }
    if !(fees.acceptance_probability > 0.0 && fees.acceptance_probability <= 1.0) {
        errors.push(ValidationError::new(
            "fees.acceptance_probability",
            "must be in (0, 1]",
        ));
    }
    if fees.max_gas_price_gwei == Some(0) {
        errors.push(ValidationError::new("fees.max_gas_price_gwei", "must be greater than 0"));
    }

    if config.observability.metrics_enabled {
        check_socket_addr(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_ws_url(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "ws" | "wss") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("scheme '{}' is not a WebSocket scheme (ws, wss)", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URI: {}", e))),
    }
}

fn check_socket_addr(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            field,
            format!("'{}' is not a socket address", value),
        ));
    }
}
