//! Read-only seam to the postage rate cache.

use crate::offer::PostageQuote;

/// Read access to the best currently-known postage quotes.
///
/// Implemented by the rate cache in `slp-postage-client`. Implementations
/// must answer from already-fetched data and never block on network I/O;
/// the resolver calls this on the wallet's transfer-preparation path.
pub trait QuoteSource {
    /// Best non-banned quote offering postage for `token_id`, if any.
    fn best_quote(&self, token_id: &str) -> Option<PostageQuote>;
}
