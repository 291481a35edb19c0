//! HTTP Client Module
//!
//! Resilient upstream client: one lazily built connection pool per service,
//! sleep-and-retry on 429, linear backoff with pool teardown on transport
//! failures.

mod client;
mod retry;

pub use client::ApiClient;
pub use retry::{backoff_delay, retry_after, DEFAULT_RETRY_AFTER};
