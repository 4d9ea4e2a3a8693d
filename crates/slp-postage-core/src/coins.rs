//! Coin selection seam.
//!
//! Coin enumeration and selection belong to the host wallet. The resolver
//! only needs a set of spendable coins covering a target token value, and
//! the number and aggregate value of those coins.

use crate::Result;

/// Reference to a spendable SLP coin held by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinRef {
    /// Funding transaction id
    pub txid: Vec<u8>,
    /// Output index within the funding transaction
    pub vout: u32,
    /// Token value carried by the coin, in the token's smallest denomination
    pub token_value: u64,
}

/// Result of one coin-selection request.
#[derive(Debug, Clone)]
pub struct CoinSelection {
    /// Selected coins, in the order the wallet prefers to spend them
    pub coins: Vec<CoinRef>,
    /// Aggregate token value of the selected coins
    pub total_token_value: u64,
}

/// Source of spendable coins (the host wallet's coin chooser).
pub trait CoinSource {
    /// Select coins covering at least `min_token_value` of `token_id`.
    fn select_coins(&self, token_id: &str, min_token_value: u64) -> Result<CoinSelection>;

    /// Prepare a selected coin for spending. Wallet bookkeeping; opaque here.
    fn add_input_info(&self, coin: &CoinRef);
}
