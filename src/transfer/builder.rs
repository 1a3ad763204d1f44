//! Assemble unsigned transfer transactions.

use crate::blockchain::UnsignedTransaction;
use crate::transfer::fees::FeeQuote;
use crate::transfer::request::{TransferOrder, ValidationError};

/// Build the transaction for `order` at `nonce` with the given fees.
///
/// The amount is converted from ether to wei exactly; the call fails rather
/// than round.
pub fn build_transaction(
    order: &TransferOrder,
    nonce: u64,
    fees: FeeQuote,
) -> Result<UnsignedTransaction, ValidationError> {
    Ok(UnsignedTransaction {
        nonce,
        to: order.target,
        value: order.amount.to_wei()?,
        gas_limit: fees.gas_limit,
        gas_price: fees.gas_price,
    })
}
