//! Private key handling and transaction signing.
//!
//! # Security
//! - Keys arrive with each request and are dropped when the request ends
//! - Keys are never logged or serialized
//! - Signing is local; no key material crosses the node connection

use std::fmt;

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxKind};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use serde::Deserialize;

use crate::blockchain::types::{ChainError, ChainId, ChainResult, SignedTransaction, UnsignedTransaction};

/// Caller-supplied secret key material.
///
/// Deserializable from the inbound request but never serializable, and its
/// `Debug` output is redacted.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Whether the field was left blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.trim()
    }

    /// Account this key signs for.
    pub fn address(&self) -> ChainResult<Address> {
        self.signer().map(|signer| signer.address())
    }

    fn signer(&self) -> ChainResult<PrivateKeySigner> {
        let key_hex = self.expose();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        key_hex
            .parse()
            // Parser messages can quote key characters; keep them out of the error.
            .map_err(|_| ChainError::Signing("Invalid private key format".into()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Single-use signer built from a request's private key.
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Chain ID for EIP-155 replay protection.
    chain_id: ChainId,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key.
    ///
    /// # Arguments
    /// * `key` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for transaction signing
    pub fn from_private_key(key: &PrivateKey, chain_id: ChainId) -> ChainResult<Self> {
        let signer = key.signer()?;
        Ok(Self { signer, chain_id })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a value transfer as an EIP-155 legacy transaction.
    pub async fn sign(&self, tx: &UnsignedTransaction) -> ChainResult<SignedTransaction> {
        let legacy = TxLegacy {
            chain_id: Some(self.chain_id.0),
            nonce: tx.nonce,
            gas_price: tx.gas_price,
            gas_limit: tx.gas_limit,
            to: TxKind::Call(tx.to),
            value: tx.value,
            input: Bytes::new(),
        };

        let signature = self
            .signer
            .sign_hash(&legacy.signature_hash())
            .await
            .map_err(|e| ChainError::Signing(format!("Signing failed: {}", e)))?;

        let envelope = TxEnvelope::from(legacy.into_signed(signature));
        let hash = *envelope.tx_hash();

        Ok(SignedTransaction {
            raw: Bytes::from(envelope.encoded_2718()),
            hash,
        })
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("chain_id", &self.chain_id.0)
            .finish()
    }
}
