//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Transfer handler, node client, HTTP front:
//!     → logging.rs (structured events, request id from the trace span)
//!     → metrics.rs (transfer outcomes, RPC latency and failures)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (when enabled)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;
