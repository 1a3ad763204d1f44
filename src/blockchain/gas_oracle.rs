//! Time-based gas price estimation.
//!
//! Samples recent blocks through `eth_feeHistory` and picks the cheapest
//! price that would have been included within the configured wait window
//! with high probability.
//!
//! ```text
//! candidate(block) = base_fee(block) + tip(block, percentile)
//! accept_rate(p)   = |{ block : candidate(block) <= p }| / sampled
//! P(include in W)  = 1 - (1 - accept_rate(p))^W     W = max_wait / block_time
//! estimate         = max(min { p : P(include in W) >= target }, next_base_fee)
//! ```

use crate::config::FeeConfig;

/// Parameters of the time-based strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct GasOracleParams {
    pub sample_blocks: u64,
    pub reward_percentile: f64,
    /// Number of blocks the transaction may wait for inclusion.
    pub wait_blocks: u64,
    pub acceptance_probability: f64,
}

impl GasOracleParams {
    pub fn from_config(fees: &FeeConfig) -> Self {
        let wait_blocks = (fees.max_wait_secs / fees.block_time_secs.max(1)).max(1);
        Self {
            sample_blocks: fees.sample_blocks,
            reward_percentile: fees.reward_percentile,
            wait_blocks,
            acceptance_probability: fees.acceptance_probability,
        }
    }
}

/// Estimate a gas price from sampled fee history.
///
/// `base_fees` follows `eth_feeHistory`: one entry per sampled block plus a
/// trailing entry for the pending block. `rewards` holds the requested tip
/// percentile per sampled block. Returns `None` if nothing was sampled.
pub fn estimate_gas_price(
    base_fees: &[u128],
    rewards: &[Vec<u128>],
    params: &GasOracleParams,
) -> Option<u128> {
    let sampled = base_fees.len().saturating_sub(1).min(rewards.len());
    let next_base_fee = base_fees.last().copied().unwrap_or_default();

    let mut candidates: Vec<u128> = (0..sampled)
        .map(|i| {
            let tip = rewards[i].first().copied().unwrap_or_default();
            base_fees[i].saturating_add(tip)
        })
        .collect();

    if candidates.is_empty() {
        return None;
    }
    candidates.sort_unstable();

    let total = candidates.len() as f64;
    let wait = i32::try_from(params.wait_blocks).unwrap_or(i32::MAX);

    // Candidates are sorted, so the (idx + 1) cheapest blocks accept candidates[idx].
    let chosen = candidates
        .iter()
        .enumerate()
        .find(|(idx, _)| {
            let accept_rate = (*idx as f64 + 1.0) / total;
            1.0 - (1.0 - accept_rate).powi(wait) >= params.acceptance_probability
        })
        .map(|(_, price)| *price)
        .unwrap_or_else(|| candidates[candidates.len() - 1]);

    Some(chosen.max(next_base_fee))
}
