//! Post office offer documents.
//!
//! A post office publishes a single quote document: one host-level `weight`
//! (how much transaction fee one stamp covers, in satoshis) and a list of
//! per-token stamp rates. Quotes are immutable once fetched.

use serde::{Deserialize, Deserializer};

/// One token's postage price at a post office.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostageStamp {
    /// Token this stamp pays postage for
    #[serde(rename = "tokenId")]
    pub token_id: String,
    /// Postage units per stamp, in the token's smallest denomination
    #[serde(deserialize_with = "rate_from_number_or_string")]
    pub rate: u64,
}

/// One host's full postage offer document.
///
/// `weight` applies uniformly to every stamp in the quote: a host charges a
/// single fee-coverage weight across its many token rates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostageQuote {
    /// Fee coverage per stamp, in satoshis
    pub weight: u64,
    /// Per-token stamp rates
    pub stamps: Vec<PostageStamp>,
    /// Host that served this quote; attached after fetch, not on the wire
    #[serde(skip)]
    pub host: String,
}

impl PostageQuote {
    /// Stamp for the given token, if this quote offers one.
    pub fn stamp_for(&self, token_id: &str) -> Option<&PostageStamp> {
        self.stamps.iter().find(|s| s.token_id == token_id)
    }

    /// Stamp rate for the given token, if this quote offers one.
    pub fn rate_for(&self, token_id: &str) -> Option<u64> {
        self.stamp_for(token_id).map(|s| s.rate)
    }
}

/// Post offices serve `rate` either as a JSON number or as a numeric string.
fn rate_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RateRepr {
        Number(u64),
        Text(String),
    }

    match RateRepr::deserialize(deserializer)? {
        RateRepr::Number(n) => Ok(n),
        RateRepr::Text(s) => s.trim().parse::<u64>().map_err(serde::de::Error::custom),
    }
}
