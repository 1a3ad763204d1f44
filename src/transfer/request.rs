//! Inbound transfer requests and their validation.

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::blockchain::wallet::PrivateKey;
use crate::transfer::amount::{Amount, AmountError};

/// A request to move native currency from one address to another.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    /// Account whose nonce is queried and whose funds are spent.
    pub source_address: String,
    /// Recipient.
    pub target_address: String,
    /// Quantity in ether, as a decimal string or JSON number.
    #[serde(alias = "sum", deserialize_with = "string_or_number")]
    pub amount: String,
    /// Signing key for this one transfer.
    pub private_key: PrivateKey,
}

impl TransferRequest {
    pub fn new(
        source_address: impl Into<String>,
        target_address: impl Into<String>,
        amount: impl Into<String>,
        private_key: PrivateKey,
    ) -> Self {
        Self {
            source_address: source_address.into(),
            target_address: target_address.into(),
            amount: amount.into(),
            private_key,
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Malformed request fields or unsafe amount conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a valid address: {reason}")]
    InvalidAddress { field: &'static str, reason: String },

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("private_key is empty")]
    MissingPrivateKey,

    #[error("private_key signs for {signer}, not source_address {expected}")]
    KeyMismatch { expected: Address, signer: Address },
}

/// A request whose fields have been checked and parsed.
#[derive(Debug, Clone)]
pub struct TransferOrder {
    pub source: Address,
    pub target: Address,
    pub amount: Amount,
    pub private_key: PrivateKey,
}

impl TransferOrder {
    /// Check every field before any node round trip happens.
    pub fn from_request(request: TransferRequest) -> Result<Self, ValidationError> {
        let source = parse_address("source_address", &request.source_address)?;
        let target = parse_address("target_address", &request.target_address)?;
        let amount: Amount = request.amount.parse()?;
        amount.to_wei()?;
        if request.private_key.is_empty() {
            return Err(ValidationError::MissingPrivateKey);
        }
        // The lock and the nonce belong to `source`, so the key must sign for it.
        // A key that does not parse fails later, at signing.
        if let Ok(signer) = request.private_key.address() {
            if signer != source {
                return Err(ValidationError::KeyMismatch {
                    expected: source,
                    signer,
                });
            }
        }

        Ok(Self {
            source,
            target,
            amount,
            private_key: request.private_key,
        })
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::InvalidAddress {
            field,
            reason: "empty".into(),
        });
    }
    value.parse::<Address>().map_err(|e| ValidationError::InvalidAddress {
        field,
        reason: e.to_string(),
    })
}
