//! Astro Proxy - a caching proxy for NASA's open APIs
//!
//! Per-type TTL/LRU response caches in front of a resilient upstream client,
//! with call timing and cache metrics exposed over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod monitor;
pub mod services;
mod tasks;

pub use api::{create_router, AppState};
pub use cache::{CacheAside, CacheKey, CacheRegistry, CacheStore};
pub use config::Config;
pub use error::{ProxyError, Result};
pub use http::ApiClient;
pub use monitor::PerformanceMonitor;
pub use services::NasaService;
