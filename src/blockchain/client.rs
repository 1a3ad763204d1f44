//! Node client over a persistent WebSocket connection.
//!
//! # Responsibilities
//! - Connect to the configured node once at startup
//! - Query account nonces and fee history
//! - Sign transfers locally and submit the raw payload
//! - Bound every round trip with a timeout

use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder, WsConnect};
use async_trait::async_trait;

use crate::blockchain::gas_oracle::{estimate_gas_price, GasOracleParams};
use crate::blockchain::types::{ChainError, ChainId, ChainResult, SignedTransaction, UnsignedTransaction};
use crate::blockchain::wallet::{PrivateKey, Wallet};
use crate::config::{FeeConfig, NodeEndpoint, TimeoutConfig};
use crate::resilience::with_timeout;

/// The node operations a transfer needs.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current transaction count of `address`, including pending transactions.
    async fn nonce(&self, address: Address) -> ChainResult<u64>;

    /// Gas price expected to confirm within the configured wait window.
    async fn estimate_gas_price(&self) -> ChainResult<u128>;

    /// Sign `tx` with `key`. Local; no network round trip.
    async fn sign_transaction(
        &self,
        tx: &UnsignedTransaction,
        key: &PrivateKey,
    ) -> ChainResult<SignedTransaction>;

    /// Hand the signed payload to the node; returns once it is in the pending pool.
    async fn submit_transaction(&self, tx: &SignedTransaction) -> ChainResult<TxHash>;
}

/// [`ChainClient`] backed by an alloy WebSocket provider.
#[derive(Clone)]
pub struct AlloyChainClient {
    provider: DynProvider,
    chain_id: ChainId,
    url: String,
    rpc_timeout: Duration,
    oracle: GasOracleParams,
}

impl AlloyChainClient {
    /// Connect to the node and verify its chain id.
    ///
    /// # Arguments
    /// * `endpoint` - WebSocket URI and optional expected chain id
    /// * `timeouts` - connect and per-call deadlines
    /// * `fees` - gas oracle sampling parameters
    pub async fn connect(
        endpoint: &NodeEndpoint,
        timeouts: &TimeoutConfig,
        fees: &FeeConfig,
    ) -> ChainResult<Self> {
        let url: url::Url = endpoint
            .url
            .parse()
            .map_err(|e| ChainError::InvalidRpcUrl(format!("'{}': {}", endpoint.url, e)))?;

        tracing::info!(rpc_url = %url, "Connecting to node");

        let connect = ProviderBuilder::new().connect_ws(WsConnect::new(url.as_str()));
        let provider = match tokio::time::timeout(Duration::from_secs(timeouts.connect_secs), connect).await {
            Ok(Ok(provider)) => provider.erased(),
            Ok(Err(e)) => return Err(ChainError::Connection(e.to_string())),
            Err(_) => {
                return Err(ChainError::Timeout {
                    operation: "connect",
                    secs: timeouts.connect_secs,
                })
            }
        };

        let rpc_timeout = Duration::from_secs(timeouts.rpc_secs);
        let chain_id = with_timeout("chain_id", rpc_timeout, async {
            provider.get_chain_id().await.map_err(ChainError::from_transport)
        })
        .await?;

        if let Some(expected) = endpoint.expected_chain_id {
            if expected != chain_id {
                return Err(ChainError::ChainMismatch {
                    expected,
                    actual: chain_id,
                });
            }
        }

        tracing::info!(rpc_url = %url, chain_id, "Connected to node");

        Ok(Self {
            provider,
            chain_id: ChainId(chain_id),
            url: url.to_string(),
            rpc_timeout,
            oracle: GasOracleParams::from_config(fees),
        })
    }

    /// Chain id reported by the node at connect time.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn nonce(&self, address: Address) -> ChainResult<u64> {
        with_timeout("nonce", self.rpc_timeout, async {
            self.provider
                .get_transaction_count(address)
                .pending()
                .await
                .map_err(ChainError::from_transport)
        })
        .await
    }

    async fn estimate_gas_price(&self) -> ChainResult<u128> {
        let history = with_timeout("fee_history", self.rpc_timeout, async {
            self.provider
                .get_fee_history(
                    self.oracle.sample_blocks,
                    BlockNumberOrTag::Latest,
                    &[self.oracle.reward_percentile],
                )
                .await
                .map_err(ChainError::from_transport)
        })
        .await?;

        let rewards = history.reward.unwrap_or_default();
        let price = estimate_gas_price(&history.base_fee_per_gas, &rewards, &self.oracle)
            .ok_or(ChainError::NoFeeData)?;

        tracing::debug!(
            gas_price = price,
            sampled = rewards.len(),
            oldest_block = history.oldest_block,
            "Estimated gas price"
        );
        Ok(price)
    }

    async fn sign_transaction(
        &self,
        tx: &UnsignedTransaction,
        key: &PrivateKey,
    ) -> ChainResult<SignedTransaction> {
        Wallet::from_private_key(key, self.chain_id)?.sign(tx).await
    }

    async fn submit_transaction(&self, tx: &SignedTransaction) -> ChainResult<TxHash> {
        with_timeout("submit", self.rpc_timeout, async {
            let pending = self
                .provider
                .send_raw_transaction(&tx.raw)
                .await
                .map_err(ChainError::from_transport)?;
            Ok(*pending.tx_hash())
        })
        .await
    }
}

impl std::fmt::Debug for AlloyChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyChainClient")
            .field("rpc_url", &self.url)
            .field("chain_id", &self.chain_id.0)
            .field("timeout_secs", &self.rpc_timeout.as_secs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_connecting() {
        let endpoint = NodeEndpoint {
            url: "not a url".into(),
            expected_chain_id: None,
        };
        let err = AlloyChainClient::connect(&endpoint, &TimeoutConfig::default(), &FeeConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::InvalidRpcUrl(_)));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_connection_failure() {
        let endpoint = NodeEndpoint {
            url: "ws://127.0.0.1:1".into(),
            expected_chain_id: None,
        };
        let timeouts = TimeoutConfig {
            connect_secs: 2,
            rpc_secs: 2,
        };
        let err = AlloyChainClient::connect(&endpoint, &timeouts, &FeeConfig::default())
            .await
            .unwrap_err();
        assert!(err.is_connection());
    }
}
