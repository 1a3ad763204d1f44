//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap node calls with a deadline
//! - Cancel operations cleanly on timeout
//! - Record latency and failures per operation
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - No retry: a failed or timed-out call fails the request

use std::future::Future;
use std::time::{Duration, Instant};

use crate::blockchain::types::{ChainError, ChainResult};
use crate::observability::metrics;

/// Run a node operation under a deadline.
pub async fn with_timeout<T, F>(operation: &'static str, limit: Duration, fut: F) -> ChainResult<T>
where
    F: Future<Output = ChainResult<T>>,
{
    let started = Instant::now();
    let result = match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ChainError::Timeout {
            operation,
            secs: limit.as_secs(),
        }),
    };

    metrics::record_rpc(operation, started, result.is_ok());
    if let Err(e) = &result {
        tracing::warn!(operation, error = %e, "Node operation failed");
    }
    result
}
