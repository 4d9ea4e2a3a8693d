//! Background post office poller.
//!
//! One long-lived task cycles over the configured hosts: fetch each host's
//! quote document with a bounded timeout, fold the result into the cache,
//! and recompute the best-offer table after every change. A host failure
//! never aborts the cycle for the remaining hosts, and the loop reruns
//! unconditionally at the configured interval until cancelled.

use crate::cache::RateCache;
use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::policy::PostagePolicy;
use crate::{Error, Result};
use slp_postage_core::PostageQuote;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Background client polling post offices for postage quotes.
pub struct PostOfficeClient {
    config: ClientConfig,
    http: reqwest::Client,
    cache: Arc<RateCache>,
    policy: Arc<dyn PostagePolicy>,
    cancel: CancelToken,
}

impl PostOfficeClient {
    /// Create a client over a shared cache and policy toggle.
    pub fn new(
        config: ClientConfig,
        cache: Arc<RateCache>,
        policy: Arc<dyn PostagePolicy>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            config,
            http,
            cache,
            policy,
            cancel: CancelToken::new(),
        })
    }

    /// Shared rate cache.
    pub fn cache(&self) -> Arc<RateCache> {
        Arc::clone(&self.cache)
    }

    /// Token that stops the poll loop.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Hand the poll loop to a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Poll until cancelled.
    ///
    /// Each cycle sleeps first, so a freshly started wallet settles its
    /// postage configuration before any network traffic.
    pub async fn run(self) {
        info!(
            hosts = self.config.hosts.len(),
            interval_secs = self.config.update_interval.as_secs(),
            "post office client started"
        );

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.update_interval) => {}
            }

            if !self.policy.postage_enabled() {
                debug!("postage disabled by policy; skipping cycle");
                continue;
            }

            for host in &self.config.hosts {
                if self.cancel.is_cancelled() {
                    break;
                }
                if let Err(e) = self.fetch(host).await {
                    warn!(
                        host = host.as_str(),
                        error = %e,
                        "failed to retrieve postage data; will retry next cycle"
                    );
                }
            }
        }

        info!("post office client stopped");
    }

    /// Fetch one host's quote document and fold it into the cache.
    ///
    /// A network failure leaves the host's previous data in place for the
    /// next cycle to refresh; an unparseable body evicts it, since it means
    /// whatever was cached no longer reflects what the host serves.
    async fn fetch(&self, host: &str) -> Result<()> {
        let url = format!("{host}/postage");
        let body = self.http.get(&url).send().await?.text().await?;
        self.fold_response(host, &body)
    }

    fn fold_response(&self, host: &str, body: &str) -> Result<()> {
        match serde_json::from_str::<PostageQuote>(body) {
            Ok(quote) => {
                debug!(
                    host,
                    weight = quote.weight,
                    stamps = quote.stamps.len(),
                    "postage quote updated"
                );
                self.cache.insert_quote(host, quote);
                self.cache.optimize_rates();
                Ok(())
            }
            Err(e) => {
                if self.cache.evict_host(host) {
                    self.cache.optimize_rates();
                }
                Err(Error::Parse(e))
            }
        }
    }
}
