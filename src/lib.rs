//! ETH transfer submission service.
//!
//! Accepts transfer requests over HTTP, builds a legacy transaction with a
//! fresh nonce and a network-dependent fee, signs it with the caller's key and
//! submits it to a node over a persistent WebSocket connection.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod transfer;

pub use config::ServiceConfig;
pub use error::{StartupError, TransferError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use transfer::{TransferHandler, TransferRequest};
