//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     → client.rs (WebSocket connection, chain id check)
//! Per request:
//!     → client.rs (nonce, fee history with timeouts)
//!     → gas_oracle.rs (price from sampled fee history)
//!     → wallet.rs (request key → local signature)
//!     → client.rs (raw submission)
//! ```
//!
//! # Security Constraints
//! - Private keys arrive per request and are dropped with it
//! - Never log private keys or raw signed payloads
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod gas_oracle;
pub mod types;
pub mod wallet;

pub use client::{AlloyChainClient, ChainClient};
pub use types::{ChainError, ChainId, ChainResult, SignedTransaction, UnsignedTransaction};
pub use wallet::{PrivateKey, Wallet};
