//! Exchange-rate fetching and caching.
//!
//! - [`RateClient`] — one-shot GET against the BCV dollar endpoint, with
//!   the nested/top-level price fallback the public API needs.
//! - [`RateCache`] — bounded, TTL-expiring cache so the intake service
//!   does not hit the rate API on every request.

pub mod cache;
pub mod client;

pub use cache::RateCache;
pub use client::{parse_rate_payload, RateClient, RateError, DEFAULT_RATE_URL};
