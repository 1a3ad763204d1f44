//! Chain-specific types and error definitions.

use std::fmt;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during node operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Node URI could not be parsed.
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// Connection to the node could not be established or was lost.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A node round trip exceeded its deadline.
    #[error("{operation} timed out after {secs} seconds")]
    Timeout { operation: &'static str, secs: u64 },

    /// The node rejected or failed a request.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Invalid private key format or signing failure.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Fee history contained nothing to estimate from.
    #[error("No fee data available from node")]
    NoFeeData,

    /// Estimated gas price exceeded the configured ceiling.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u128, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

impl ChainError {
    /// Whether the failure is a lost or unreachable node connection.
    pub fn is_connection(&self) -> bool {
        matches!(self, ChainError::Connection(_) | ChainError::Timeout { .. })
    }

    /// Classify a transport error from the provider.
    pub(crate) fn from_transport(err: alloy::transports::TransportError) -> Self {
        if let Some(payload) = err.as_error_resp() {
            return ChainError::Rpc(format!("{} (code {})", payload.message, payload.code));
        }
        if err.is_transport_error() {
            return ChainError::Connection(err.to_string());
        }
        ChainError::Rpc(err.to_string())
    }
}

/// Result type for node operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// A value transfer ready for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// Sender account nonce as reported by the node.
    pub nonce: u64,
    /// Recipient.
    pub to: Address,
    /// Amount in wei.
    pub value: U256,
    /// Maximum gas units.
    pub gas_limit: u64,
    /// Price per gas unit in wei.
    pub gas_price: u128,
}

/// An encoded, signed transaction and its identifier.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// EIP-2718 encoded payload for `eth_sendRawTransaction`.
    pub raw: Bytes,
    /// Keccak hash of the payload.
    pub hash: TxHash,
}

impl fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedTransaction")
            .field("hash", &self.hash)
            .field("raw_len", &self.raw.len())
            .finish()
    }
}
