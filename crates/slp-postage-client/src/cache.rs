//! Best-offer rate cache.
//!
//! Holds each host's most recently fetched quote document, a ban list, and
//! a derived per-token best-offer table. All mutation is funneled through
//! the poll loop (or guarded by the same lock when triggered elsewhere);
//! transfer preparation only ever reads, and never blocks on the network.

use parking_lot::RwLock;
use slp_postage_core::{Error as CoreError, PostageQuote, QuoteSource, Result as CoreResult};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Process-wide postage rate cache.
#[derive(Debug, Default)]
pub struct RateCache {
    inner: RwLock<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    /// Raw quote document per host, as last fetched
    postage_data: HashMap<String, PostageQuote>,
    /// Token id to best-priced quote; replaced wholesale on recomputation
    optimized: HashMap<String, PostageQuote>,
    /// Hosts excluded from best-offer selection
    ban_list: HashSet<String>,
}

impl RateCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `host`'s freshly fetched quote document.
    ///
    /// Normally driven by the poll loop; callers embedding their own fetch
    /// path may feed documents in directly.
    pub fn insert_quote(&self, host: &str, mut quote: PostageQuote) {
        quote.host = host.to_string();
        self.inner
            .write()
            .postage_data
            .insert(host.to_string(), quote);
    }

    /// Drop `host`'s document after it served an unusable response.
    ///
    /// Returns whether anything was evicted.
    pub fn evict_host(&self, host: &str) -> bool {
        self.inner.write().postage_data.remove(host).is_some()
    }

    /// Recompute the per-token best-offer table from all non-banned hosts.
    ///
    /// For each token the stamp with the numerically smallest rate wins;
    /// hosts quoting identical rates tie-break to the lexicographically
    /// smallest host, so recomputation is deterministic. The winning host's
    /// whole quote is stored, so its weight travels with the selected rate.
    /// The table is swapped in as one unit; readers see the previous or the
    /// new table, never a mix.
    pub fn optimize_rates(&self) {
        let mut inner = self.inner.write();

        let mut winners: HashMap<String, (u64, &str)> = HashMap::new();
        for (host, quote) in &inner.postage_data {
            if inner.ban_list.contains(host) {
                continue;
            }
            for stamp in &quote.stamps {
                let candidate = (stamp.rate, host.as_str());
                let replace = match winners.get(&stamp.token_id) {
                    Some(&current) => candidate < current,
                    None => true,
                };
                if replace {
                    winners.insert(stamp.token_id.clone(), candidate);
                }
            }
        }

        let optimized: HashMap<String, PostageQuote> = winners
            .into_iter()
            .map(|(token_id, (_, host))| (token_id, inner.postage_data[host].clone()))
            .collect();

        debug!(tokens = optimized.len(), "recomputed best postage offers");
        inner.optimized = optimized;
    }

    /// Exclude `host` from best-offer selection.
    ///
    /// Takes effect at the next recomputation; the host's raw document is
    /// kept and may win again after an unban.
    pub fn ban(&self, host: &str) {
        self.inner.write().ban_list.insert(host.to_string());
    }

    /// Allow a previously banned host to compete again at the next
    /// recomputation.
    pub fn unban(&self, host: &str) {
        self.inner.write().ban_list.remove(host);
    }

    /// Whether `host` is currently banned.
    pub fn is_banned(&self, host: &str) -> bool {
        self.inner.read().ban_list.contains(host)
    }

    /// Best quote currently known for `token_id`.
    pub fn best_quote(&self, token_id: &str) -> Option<PostageQuote> {
        self.inner.read().optimized.get(token_id).cloned()
    }

    /// Quote endpoint URL of the best post office for `token_id`.
    pub fn best_host_url(&self, token_id: &str) -> CoreResult<String> {
        self.best_quote(token_id)
            .map(|quote| format!("{}/postage", quote.host))
            .ok_or_else(|| CoreError::NoPostageOffer(token_id.to_string()))
    }

    /// Raw document last fetched from `host`, if any.
    pub fn quote_for_host(&self, host: &str) -> Option<PostageQuote> {
        self.inner.read().postage_data.get(host).cloned()
    }
}

impl QuoteSource for RateCache {
    fn best_quote(&self, token_id: &str) -> Option<PostageQuote> {
        RateCache::best_quote(self, token_id)
    }
}
