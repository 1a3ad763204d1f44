//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.
//! `general` and `parameters` carry no defaults: a document missing either
//! is rejected at startup.

use serde::{Deserialize, Serialize};

use crate::transfer::fees::NetworkMode;

/// Root configuration for the transfer service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Network selection.
    pub general: GeneralConfig,

    /// Node endpoints.
    pub parameters: ParametersConfig,

    /// Inbound listener settings.
    #[serde(default)]
    pub service: ListenerConfig,

    /// Deadlines for node round trips.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Fee policy settings for both network modes.
    #[serde(default)]
    pub fees: FeeConfig,

    /// Logging and metrics settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Build a configuration with defaults for everything but the required sections.
    pub fn new(testnet: bool, provider: &str, provider_testnet: &str) -> Self {
        Self {
            general: GeneralConfig { testnet },
            parameters: ParametersConfig {
                provider: provider.to_string(),
                provider_testnet: provider_testnet.to_string(),
                chain_id: None,
                chain_id_testnet: None,
            },
            service: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            fees: FeeConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    /// The network mode selected by `general.testnet`.
    pub fn network_mode(&self) -> NetworkMode {
        if self.general.testnet {
            NetworkMode::TestNetwork
        } else {
            NetworkMode::ProductionNetwork
        }
    }

    /// The node endpoint for the selected network mode.
    pub fn endpoint(&self) -> NodeEndpoint {
        match self.network_mode() {
            NetworkMode::TestNetwork => NodeEndpoint {
                url: self.parameters.provider_testnet.clone(),
                expected_chain_id: self.parameters.chain_id_testnet,
            },
            NetworkMode::ProductionNetwork => NodeEndpoint {
                url: self.parameters.provider.clone(),
                expected_chain_id: self.parameters.chain_id,
            },
        }
    }
}

/// `[general]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// `true` selects the test network and its fixed fee policy.
    pub testnet: bool,
}

/// `[parameters]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParametersConfig {
    /// WebSocket URI of the production network node.
    pub provider: String,

    /// WebSocket URI of the test network node.
    pub provider_testnet: String,

    /// Expected chain id of the production node, checked on connect.
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// Expected chain id of the test network node, checked on connect.
    #[serde(default)]
    pub chain_id_testnet: Option<u64>,
}

/// Resolved node endpoint for the active network mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEndpoint {
    pub url: String,
    pub expected_chain_id: Option<u64>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 16 * 1024,
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Timeout configuration for node operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Node connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Per round trip timeout (nonce, fee history, submission) in seconds.
    pub rpc_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            rpc_secs: 10,
        }
    }
}

/// Fee policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Gas limit used on the test network.
    pub testnet_gas_limit: u64,

    /// Fixed gas price used on the test network, in gwei.
    pub testnet_gas_price_gwei: u64,

    /// Gas limit of a plain value transfer on the production network.
    pub transfer_gas_limit: u64,

    /// Number of recent blocks sampled by the gas price oracle.
    pub sample_blocks: u64,

    /// Target inclusion window in seconds.
    pub max_wait_secs: u64,

    /// Expected block interval in seconds.
    pub block_time_secs: u64,

    /// Priority fee percentile requested per sampled block.
    pub reward_percentile: f64,

    /// Minimum probability of inclusion within the wait window.
    pub acceptance_probability: f64,

    /// Upper bound for an estimated gas price in gwei. Estimates above it fail the request.
    pub max_gas_price_gwei: Option<u64>,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            testnet_gas_limit: 200_000,
            testnet_gas_price_gwei: 50,
            transfer_gas_limit: 21_000,
            sample_blocks: 120,
            max_wait_secs: 300,
            block_time_secs: 12,
            reward_percentile: 50.0,
            acceptance_probability: 0.98,
            max_gas_price_gwei: None,
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

    /// Human readable or JSON lines.
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
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
