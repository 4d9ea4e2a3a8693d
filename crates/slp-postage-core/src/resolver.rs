//! Stamp-count convergence and postage amount calculation.
//!
//! Determines the minimum number of stamps whose token-denominated payment,
//! combined with the size of the chosen coin set, leaves the transaction
//! fully fee-covered at the post office's per-stamp weight. Selecting more
//! coins grows the transaction, which can in turn require more stamps, so
//! the calculation iterates until the fee deficit is closed.

use crate::coins::{CoinRef, CoinSource};
use crate::message::TokenMessage;
use crate::rates::QuoteSource;
use crate::{Error, Result};
use tracing::debug;

/// Network dust limit per output, in satoshis.
pub const DUST_LIMIT: u64 = 546;

/// Relay fee rate, satoshis per byte.
pub const FEE_RATE: u64 = 1;

/// P2PKH output size in bytes.
pub const P2PKH_OUTPUT_SIZE: u64 = 34;

/// Approximate size of an ECDSA-signed P2PKH input, in bytes.
pub const ECDSA_INPUT_SIZE: u64 = 149;

/// Approximate size of a Schnorr-signed P2PKH input, in bytes.
pub const SCHNORR_INPUT_SIZE: u64 = 141;

/// Version, input count varint, output count varint, locktime.
pub const TX_OVERHEAD_SIZE: u64 = 4 + 1 + 1 + 4;

/// OP_RETURN output value field plus script length prefix.
const MESSAGE_ENVELOPE_SIZE: u64 = 8 + 1;

/// SEND message script size before any token output amount fields.
const MESSAGE_BASE_SIZE: u64 = 46;

/// Each token output amount field grows the SEND script by this much.
const MESSAGE_PER_AMOUNT_SIZE: u64 = 9;

/// Finalized plan for a postage-bearing transfer.
///
/// Produced once per resolve call and consumed immediately by the
/// transaction assembler; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedPostagePlan {
    /// Token output amounts, baseline (sender) amounts first, then the
    /// postage and/or change amounts the convergence added.
    pub amounts: Vec<u64>,
    /// Whether a postage output must be paid to the post office.
    pub needs_postage: bool,
    /// Total postage payable, in the token's smallest denomination.
    pub postage_amount: u64,
    /// Converged stamp count.
    pub stamp_count: u64,
    /// Coins selected to fund the transfer.
    pub coins: Vec<CoinRef>,
}

/// Offer terms and size parameters fixed for one resolve call.
struct OfferTerms {
    rate: u64,
    weight: u64,
    baseline_len: u64,
    /// SEND message output size when no postage or change amount is added.
    message_base_size: u64,
}

/// One candidate sizing at a fixed stamp count. Recomputed every iteration
/// and discarded on convergence.
struct Trial {
    coins: Vec<CoinRef>,
    postage_amount: u64,
    change_amount: u64,
    /// Extra dust outputs beyond the baseline: 0, 1, or 2.
    dust_delta: u64,
    /// Satoshis still uncovered at this stamp count; converged when <= 0.
    fee_deficit: i128,
}

/// Postage fee resolver.
///
/// Pure calculation over the wallet's coin source and the rate cache; no
/// network I/O on this path.
pub struct PostageFeeResolver<'a, C: CoinSource> {
    coin_source: &'a C,
}

impl<'a, C: CoinSource> PostageFeeResolver<'a, C> {
    /// Create a resolver over the wallet's coin source.
    pub fn new(coin_source: &'a C) -> Self {
        Self { coin_source }
    }

    /// Plan a first-hop postage transfer of `send_amount`.
    pub fn resolve<Q: QuoteSource>(
        &self,
        rates: &Q,
        token_id: &str,
        send_amount: u64,
    ) -> Result<FinalizedPostagePlan> {
        self.resolve_with_baseline(rates, token_id, send_amount, &[send_amount])
    }

    /// Re-derive the stamp count for a transfer whose token outputs were
    /// already shaped by a prior plan.
    ///
    /// The prior message's non-OP_RETURN amounts become the baseline and are
    /// preserved verbatim. When those amounts sum to more than `send_amount`
    /// the trailing entry was change the earlier plan already priced in, so
    /// it is dropped rather than counted twice.
    pub fn resolve_incremental<Q: QuoteSource>(
        &self,
        rates: &Q,
        token_id: &str,
        send_amount: u64,
        prior: &TokenMessage,
    ) -> Result<FinalizedPostagePlan> {
        let mut baseline: Vec<u64> = prior.send_amounts().to_vec();
        let prior_total = checked_sum(&baseline)?;
        if prior_total > send_amount {
            baseline.pop();
        }
        self.resolve_with_baseline(rates, token_id, send_amount, &baseline)
    }

    fn resolve_with_baseline<Q: QuoteSource>(
        &self,
        rates: &Q,
        token_id: &str,
        send_amount: u64,
        baseline: &[u64],
    ) -> Result<FinalizedPostagePlan> {
        let quote = rates
            .best_quote(token_id)
            .ok_or_else(|| Error::NoPostageOffer(token_id.to_string()))?;
        let rate = quote
            .rate_for(token_id)
            .ok_or_else(|| Error::NoPostageOffer(token_id.to_string()))?;

        // A zero-weight stamp covers no fee at all, so the deficit could
        // never close; such a quote is unusable.
        if quote.weight == 0 {
            return Err(Error::NoPostageOffer(token_id.to_string()));
        }

        let baseline_len = baseline.len() as u64;
        let terms = OfferTerms {
            rate,
            weight: quote.weight,
            baseline_len,
            message_base_size: MESSAGE_ENVELOPE_SIZE
                + MESSAGE_BASE_SIZE
                + MESSAGE_PER_AMOUNT_SIZE * baseline_len,
        };

        let mut stamp_count: u64 = 0;
        let trial = loop {
            let trial = self.trial(token_id, send_amount, stamp_count, &terms)?;
            if trial.fee_deficit <= 0 {
                break trial;
            }
            debug!(
                stamp_count,
                inputs = trial.coins.len(),
                fee_deficit = trial.fee_deficit as i64,
                "postage trial not yet fee-covered"
            );
            stamp_count = stamp_count
                .checked_add(1)
                .ok_or_else(|| Error::AmountOverflow("stamp count".to_string()))?;
        };

        let Trial {
            coins,
            postage_amount,
            change_amount,
            dust_delta,
            ..
        } = trial;

        let mut amounts = baseline.to_vec();
        let needs_postage = match (dust_delta, postage_amount > 0, change_amount > 0) {
            (0, false, false) => false,
            (1, true, false) => {
                amounts.push(postage_amount);
                true
            }
            (1, false, true) => {
                amounts.push(change_amount);
                false
            }
            (2, true, true) => {
                amounts.push(postage_amount);
                amounts.push(change_amount);
                true
            }
            (delta, postage, change) => {
                return Err(Error::UnhandledShape(format!(
                    "dust delta {delta} with postage={postage}, change={change}"
                )));
            }
        };

        debug!(
            token_id,
            stamp_count, postage_amount, needs_postage, "postage plan converged"
        );

        Ok(FinalizedPostagePlan {
            amounts,
            needs_postage,
            postage_amount,
            stamp_count,
            coins,
        })
    }

    /// Size one candidate transaction at a fixed stamp count.
    fn trial(
        &self,
        token_id: &str,
        send_amount: u64,
        stamp_count: u64,
        terms: &OfferTerms,
    ) -> Result<Trial> {
        let postage_amount = terms
            .rate
            .checked_mul(stamp_count)
            .ok_or_else(|| Error::AmountOverflow("postage amount".to_string()))?;
        let required = send_amount
            .checked_add(postage_amount)
            .ok_or_else(|| Error::AmountOverflow("send amount plus postage".to_string()))?;

        let selection = self.coin_source.select_coins(token_id, required)?;
        for coin in &selection.coins {
            self.coin_source.add_input_info(coin);
        }

        let change_amount = selection
            .total_token_value
            .checked_sub(required)
            .ok_or_else(|| {
                Error::InsufficientTokenFunds(format!(
                    "selected {} of token {} but {} is required",
                    selection.total_token_value, token_id, required
                ))
            })?;

        let dust_delta: u64 = match (postage_amount > 0, change_amount > 0) {
            (true, true) => 2,
            (false, false) => 0,
            _ => 1,
        };
        let dust_count = terms.baseline_len + dust_delta;
        let input_count = selection.coins.len() as u64;

        let message_size = terms.message_base_size + MESSAGE_PER_AMOUNT_SIZE * dust_delta;
        let tx_size = TX_OVERHEAD_SIZE
            + ECDSA_INPUT_SIZE * input_count
            + P2PKH_OUTPUT_SIZE * dust_count
            + message_size;

        // Dust the new outputs must carry versus dust the spent inputs
        // already contribute; positive means stamps must close the gap.
        let output_sats_diff =
            (DUST_LIMIT * dust_count) as i128 - (DUST_LIMIT * input_count) as i128;
        let fee_deficit = (tx_size * FEE_RATE) as i128 + output_sats_diff
            - (stamp_count as i128) * (terms.weight as i128);

        Ok(Trial {
            coins: selection.coins,
            postage_amount,
            change_amount,
            dust_delta,
            fee_deficit,
        })
    }
}

fn checked_sum(amounts: &[u64]) -> Result<u64> {
    amounts.iter().try_fold(0u64, |acc, &a| {
        acc.checked_add(a)
            .ok_or_else(|| Error::AmountOverflow("token amounts".to_string()))
    })
}
