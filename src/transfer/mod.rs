//! Transfer subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → request.rs (field validation, exact amount parsing via amount.rs)
//!     → handler.rs (per-address serialization, orchestration)
//!         → ChainClient::nonce
//!         → fees.rs (fixed on testnet, estimated on mainnet)
//!         → builder.rs (unsigned transaction)
//!         → ChainClient::sign_transaction → ChainClient::submit_transaction
//!     → bool result to the service front
//! ```
//!
//! # Design Decisions
//! - Network mode is resolved once into a `FeeStrategy` at startup
//! - Nonces are fetched fresh for every request, never cached
//! - No step is retried

pub mod amount;
pub mod builder;
pub mod fees;
pub mod handler;
pub mod request;

pub use amount::{Amount, AmountError};
pub use builder::build_transaction;
pub use fees::{FeeQuote, FeeStrategy, NetworkMode};
pub use handler::{TransferHandler, TransferReceipt};
pub use request::{TransferOrder, TransferRequest, ValidationError};
