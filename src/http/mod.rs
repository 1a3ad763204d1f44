//! HTTP service front.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (request id, trace span, body limit)
//!     → handlers.rs (JSON decode → TransferHandler → {"success": bool})
//!     → Send to client
//! ```

pub mod handlers;
pub mod server;

pub use handlers::{HealthResponse, SendEthResponse};
pub use server::{AppState, HttpServer, X_REQUEST_ID};
