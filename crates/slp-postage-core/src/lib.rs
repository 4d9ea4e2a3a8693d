//! SLP postage wallet core
//!
//! Lets a wallet pay the network fee of an SLP token transfer in the token's
//! own denomination: a remote "post office" covers the BCH fee in exchange
//! for a token-denominated postage payment. This crate implements the
//! stamp-count convergence calculation and the final output assembly;
//! rate acquisition lives in `slp-postage-client`, and signing, coin
//! enumeration, and SLP message encoding are consumed through trait seams.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assembler;
pub mod coins;
pub mod error;
pub mod message;
pub mod offer;
pub mod rates;
pub mod resolver;
pub mod signer;

pub use assembler::{TransactionAssembler, TxOutput, UnsignedTransaction};
pub use coins::{CoinRef, CoinSelection, CoinSource};
pub use error::{Error, Result};
pub use message::{TokenMessage, TokenMessageCodec};
pub use offer::{PostageQuote, PostageStamp};
pub use rates::QuoteSource;
pub use resolver::{
    FinalizedPostagePlan, PostageFeeResolver, DUST_LIMIT, ECDSA_INPUT_SIZE, FEE_RATE,
    P2PKH_OUTPUT_SIZE, SCHNORR_INPUT_SIZE, TX_OVERHEAD_SIZE,
};
pub use signer::PostageSigner;
