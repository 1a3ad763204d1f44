//! Request handler: one inbound transfer, end to end.
//!
//! # Flow
//! ```text
//! TransferRequest
//!     → validate (addresses, amount, key presence)
//!     → lock source address
//!     → nonce → fee → build → sign → submit
//!     → unlock, report
//! ```
//!
//! Nonce fetch through submission is serialized per source address so two
//! requests from one account never sign with the same nonce. Requests from
//! different accounts run concurrently.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::blockchain::ChainClient;
use crate::error::TransferError;
use crate::observability::metrics;
use crate::transfer::builder::build_transaction;
use crate::transfer::fees::{FeeQuote, FeeStrategy};
use crate::transfer::request::{TransferOrder, TransferRequest};

/// What was submitted for a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub tx_hash: TxHash,
    pub nonce: u64,
    pub fees: FeeQuote,
}

/// Orchestrates the chain client, fee strategy and builder.
pub struct TransferHandler {
    client: Arc<dyn ChainClient>,
    fees: FeeStrategy,
    locks: DashMap<Address, Arc<Mutex<()>>>,
}

impl TransferHandler {
    pub fn new(client: Arc<dyn ChainClient>, fees: FeeStrategy) -> Self {
        Self {
            client,
            fees,
            locks: DashMap::new(),
        }
    }

    pub fn fee_strategy(&self) -> FeeStrategy {
        self.fees
    }

    /// Run one transfer and report whether the node accepted it.
    ///
    /// Every failure is logged here and collapsed to `false`.
    pub async fn handle(&self, request: TransferRequest) -> bool {
        match self.execute(request).await {
            Ok(receipt) => {
                metrics::record_transfer("submitted");
                tracing::info!(
                    tx_hash = %receipt.tx_hash,
                    nonce = receipt.nonce,
                    gas_limit = receipt.fees.gas_limit,
                    gas_price = receipt.fees.gas_price,
                    "Transfer submitted"
                );
                true
            }
            Err(e) => {
                metrics::record_transfer(e.outcome());
                tracing::warn!(error = %e, outcome = e.outcome(), "Transfer failed");
                false
            }
        }
    }

    /// Run one transfer. Submission is attempted at most once.
    pub async fn execute(&self, request: TransferRequest) -> Result<TransferReceipt, TransferError> {
        let order = TransferOrder::from_request(request)?;
        tracing::debug!(
            source = %order.source,
            target = %order.target,
            amount = %order.amount,
            "Transfer validated"
        );

        let lock = self.lock_for(order.source);
        let result = {
            let _guard = lock.lock().await;
            self.submit(&order).await
        };
        drop(lock);
        self.release(order.source);

        result
    }

    async fn submit(&self, order: &TransferOrder) -> Result<TransferReceipt, TransferError> {
        let nonce = self.client.nonce(order.source).await?;
        let fees = self.fees.resolve(self.client.as_ref()).await?;
        let tx = build_transaction(order, nonce, fees)?;
        let signed = self.client.sign_transaction(&tx, &order.private_key).await?;

        tracing::debug!(source = %order.source, nonce, tx_hash = %signed.hash, "Submitting transaction");
        let tx_hash = self.client.submit_transaction(&signed).await?;

        Ok(TransferReceipt { tx_hash, nonce, fees })
    }

    fn lock_for(&self, address: Address) -> Arc<Mutex<()>> {
        self.locks.entry(address).or_default().clone()
    }

    /// Drop the lock entry once no request holds or waits on it.
    fn release(&self, address: Address) {
        self.locks.remove_if(&address, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    fn tracked_addresses(&self) -> usize {
        self.locks.len()
    }
}

impl std::fmt::Debug for TransferHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferHandler")
            .field("fees", &self.fees)
            .field("locked_addresses", &self.locks.len())
            .finish()
    }
}
