//! Fee policy per network mode.
//!
//! The test network always uses a fixed gas limit and price. The production
//! network uses the plain-transfer gas limit and asks the node for a price.

use crate::blockchain::{ChainClient, ChainError, ChainResult};
use crate::config::FeeConfig;

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Which network the service submits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    TestNetwork,
    ProductionNetwork,
}

impl NetworkMode {
    pub fn label(&self) -> &'static str {
        match self {
            NetworkMode::TestNetwork => "testnet",
            NetworkMode::ProductionNetwork => "mainnet",
        }
    }
}

/// Gas limit and price chosen for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub gas_limit: u64,
    /// Wei per gas unit.
    pub gas_price: u128,
}

/// How a [`FeeQuote`] is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeStrategy {
    /// Constant quote, no node round trip.
    Fixed(FeeQuote),
    /// Constant gas limit with a price estimated from recent blocks.
    Estimated {
        gas_limit: u64,
        /// Ceiling in wei; estimates above it are refused.
        max_gas_price: Option<u128>,
    },
}

impl FeeStrategy {
    /// Select the strategy for `mode`.
    pub fn from_config(mode: NetworkMode, fees: &FeeConfig) -> Self {
        match mode {
            NetworkMode::TestNetwork => FeeStrategy::Fixed(FeeQuote {
                gas_limit: fees.testnet_gas_limit,
                gas_price: u128::from(fees.testnet_gas_price_gwei) * WEI_PER_GWEI,
            }),
            NetworkMode::ProductionNetwork => FeeStrategy::Estimated {
                gas_limit: fees.transfer_gas_limit,
                max_gas_price: fees
                    .max_gas_price_gwei
                    .map(|gwei| u128::from(gwei) * WEI_PER_GWEI),
            },
        }
    }

    /// Produce the quote for the next transaction.
    pub async fn resolve(&self, client: &dyn ChainClient) -> ChainResult<FeeQuote> {
        match *self {
            FeeStrategy::Fixed(quote) => Ok(quote),
            FeeStrategy::Estimated {
                gas_limit,
                max_gas_price,
            } => {
                let gas_price = client.estimate_gas_price().await?;
                if let Some(max) = max_gas_price {
                    if gas_price > max {
                        tracing::warn!(gas_price, max_gas_price = max, "Estimated gas price above ceiling");
                        return Err(ChainError::GasPriceTooHigh {
                            current_gwei: gas_price / WEI_PER_GWEI,
                            max_gwei: (max / WEI_PER_GWEI) as u64,
                        });
                    }
                }
                Ok(FeeQuote { gas_limit, gas_price })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use alloy::primitives::{Address, TxHash};
    use async_trait::async_trait;

    use crate::blockchain::{PrivateKey, SignedTransaction, UnsignedTransaction};

    struct PriceOnly {
        price: ChainResult<u128>,
        calls: AtomicUsize,
    }

    impl PriceOnly {
        fn new(price: ChainResult<u128>) -> Self {
            Self {
                price,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChainClient for PriceOnly {
        async fn nonce(&self, _address: Address) -> ChainResult<u64> {
            unreachable!()
        }

        async fn estimate_gas_price(&self) -> ChainResult<u128> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.price {
                Ok(price) => Ok(*price),
                Err(_) => Err(ChainError::NoFeeData),
            }
        }

        async fn sign_transaction(
            &self,
            _tx: &UnsignedTransaction,
            _key: &PrivateKey,
        ) -> ChainResult<SignedTransaction> {
            unreachable!()
        }

        async fn submit_transaction(&self, _tx: &SignedTransaction) -> ChainResult<TxHash> {
            unreachable!()
        }
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(NetworkMode::TestNetwork.label(), "testnet");
        assert_eq!(NetworkMode::ProductionNetwork.label(), "mainnet");
    }

    #[tokio::test]
    async fn test_testnet_quote_is_fixed() {
        let client = PriceOnly::new(Ok(1));
        let strategy = FeeStrategy::from_config(NetworkMode::TestNetwork, &FeeConfig::default());

        let quote = strategy.resolve(&client).await.unwrap();
        assert_eq!(quote.gas_limit, 200_000);
        assert_eq!(quote.gas_price, 50_000_000_000);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_production_quote_uses_estimate() {
        let client = PriceOnly::new(Ok(12_345_678_901));
        let strategy = FeeStrategy::from_config(NetworkMode::ProductionNetwork, &FeeConfig::default());

        let quote = strategy.resolve(&client).await.unwrap();
        assert_eq!(quote.gas_limit, 21_000);
        assert_eq!(quote.gas_price, 12_345_678_901);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_estimate_failure_propagates() {
        let client = PriceOnly::new(Err(ChainError::NoFeeData));
        let strategy = FeeStrategy::from_config(NetworkMode::ProductionNetwork, &FeeConfig::default());
        assert!(matches!(strategy.resolve(&client).await, Err(ChainError::NoFeeData)));
    }

    #[tokio::test]
    async fn test_ceiling_refuses_expensive_estimate() {
        let fees = FeeConfig {
            max_gas_price_gwei: Some(100),
            ..FeeConfig::default()
        };
        let strategy = FeeStrategy::from_config(NetworkMode::ProductionNetwork, &fees);

        let cheap = PriceOnly::new(Ok(100 * WEI_PER_GWEI));
        assert!(strategy.resolve(&cheap).await.is_ok());

        let expensive = PriceOnly::new(Ok(150 * WEI_PER_GWEI));
        assert!(matches!(
            strategy.resolve(&expensive).await,
            Err(ChainError::GasPriceTooHigh {
                current_gwei: 150,
                max_gwei: 100
            })
        ));
    }
}
