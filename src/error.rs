//! Service-level error taxonomy.
//!
//! Per-request failures ([`TransferError`]) are turned into a negative result
//! at the handler boundary. Startup failures ([`StartupError`]) end the process.

use thiserror::Error;

use crate::blockchain::ChainError;
use crate::config::ConfigError;
use crate::transfer::ValidationError;

/// Why a single transfer failed.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("chain operation failed: {0}")]
    Chain(#[from] ChainError),
}

impl TransferError {
    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            TransferError::Validation(_) => "invalid",
            TransferError::Chain(e) if e.is_connection() => "unreachable",
            TransferError::Chain(_) => "rejected",
        }
    }
}

/// Failures that prevent the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("node connection failed: {0}")]
    Connection(#[from] ChainError),

    #[error("failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),
}
