//! SLP post office client
//!
//! Background acquisition of postage rate quotes: a single long-lived task
//! polls the configured post offices, keeps each host's latest quote
//! document, and maintains a per-token best-offer table that transfer
//! preparation reads synchronously through the core crate's quote seam.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod policy;

pub use cache::RateCache;
pub use cancel::CancelToken;
pub use client::PostOfficeClient;
pub use config::{
    ClientConfig, DEFAULT_POST_OFFICE_HOSTS, DEFAULT_REQUEST_TIMEOUT, DEFAULT_UPDATE_INTERVAL,
};
pub use error::{Error, Result};
pub use policy::{PostagePolicy, TogglePolicy};
