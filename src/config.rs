//! Configuration Module
//!
//! Handles loading proxy configuration from environment variables, including
//! the per-cache-type TTL and capacity table.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

// == Cache Type Labels ==
/// Near-earth-object feed responses
pub const ASTEROIDS: &str = "asteroids";
/// Mars rover photo listings
pub const MARS_PHOTOS: &str = "mars_photos";
/// Earth satellite imagery (raw bytes)
pub const EARTH_IMAGERY: &str = "earth_imagery";
/// Exoplanet archive lookups
pub const EXOPLANET_INFO: &str = "exoplanet_info";

// == Cache Settings ==
/// TTL and capacity for one cache store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Entry lifetime in seconds, measured from insertion
    pub ttl_secs: u64,
    /// Maximum number of live entries
    pub max_size: usize,
}

impl CacheSettings {
    pub const fn new(ttl_secs: u64, max_size: usize) -> Self {
        Self { ttl_secs, max_size }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::new(3600, 100)
    }
}

// == Cache Config ==
/// Per-cache-type settings table with one documented fallback.
///
/// Unknown cache types resolve to `default`.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub default: CacheSettings,
    pub per_type: HashMap<String, CacheSettings>,
}

impl CacheConfig {
    /// Returns the settings for a cache type, falling back to the default.
    pub fn settings_for(&self, cache_type: &str) -> CacheSettings {
        self.per_type
            .get(cache_type)
            .copied()
            .unwrap_or(self.default)
    }

    /// Adds or replaces the settings of one cache type.
    pub fn with_type(mut self, cache_type: impl Into<String>, settings: CacheSettings) -> Self {
        self.per_type.insert(cache_type.into(), settings);
        self
    }

    /// Loads the table from the environment.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL` / `CACHE_DEFAULT_MAX_SIZE` - fallback settings
    /// - `CACHE_<TYPE>_TTL` / `CACHE_<TYPE>_MAX_SIZE` - override a built-in type,
    ///   e.g. `CACHE_MARS_PHOTOS_TTL=600`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the table from any `name -> value` source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = Self::default();
        let default = CacheSettings {
            ttl_secs: parse_or(lookup("CACHE_DEFAULT_TTL"), base.default.ttl_secs),
            max_size: parse_or(lookup("CACHE_DEFAULT_MAX_SIZE"), base.default.max_size),
        };

        let per_type = base
            .per_type
            .into_iter()
            .map(|(name, settings)| {
                let prefix = format!("CACHE_{}", name.to_ascii_uppercase());
                let settings = CacheSettings {
                    ttl_secs: parse_or(lookup(&format!("{prefix}_TTL")), settings.ttl_secs),
                    max_size: parse_or(lookup(&format!("{prefix}_MAX_SIZE")), settings.max_size),
                };
                (name, settings)
            })
            .collect();

        Self { default, per_type }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        let per_type = [
            (ASTEROIDS, CacheSettings::new(3600, 100)),
            (MARS_PHOTOS, CacheSettings::new(7200, 200)),
            (EARTH_IMAGERY, CacheSettings::new(86_400, 50)),
            (EXOPLANET_INFO, CacheSettings::new(86_400, 100)),
        ]
        .into_iter()
        .map(|(name, settings)| (name.to_string(), settings))
        .collect();

        Self {
            default: CacheSettings::default(),
            per_type,
        }
    }
}

// == HTTP Config ==
/// Settings of the resilient HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    /// Base URL relative request paths are joined to
    pub base_url: String,
    /// Total per-request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts made on transport failure before giving up
    pub max_retries: u32,
    /// Linear backoff step between transport retries, in milliseconds
    pub retry_base_delay_ms: u64,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.nasa.gov".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 1000,
        }
    }
}

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// NASA open API key sent with every upstream request
    pub api_key: String,
    /// HTTP port of the proxy and admin surface
    pub server_port: u16,
    /// Upstream client settings
    pub http: HttpConfig,
    /// Per-cache-type TTL/capacity table
    pub cache: CacheConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `NASA_API_KEY` - API key (default: DEMO_KEY)
    /// - `NASA_BASE_URL` - Upstream base URL (default: https://api.nasa.gov)
    /// - `HTTP_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `HTTP_MAX_RETRIES` - Transport attempts (default: 3)
    /// - `HTTP_RETRY_BASE_DELAY_MS` - Backoff step in ms (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = HttpConfig::default();
        Self {
            api_key: env::var("NASA_API_KEY").unwrap_or_else(|_| "DEMO_KEY".to_string()),
            server_port: env_or("SERVER_PORT", 3000),
            http: HttpConfig {
                base_url: env::var("NASA_BASE_URL").unwrap_or(defaults.base_url),
                timeout_secs: env_or("HTTP_TIMEOUT", defaults.timeout_secs),
                max_retries: env_or("HTTP_MAX_RETRIES", defaults.max_retries),
                retry_base_delay_ms: env_or("HTTP_RETRY_BASE_DELAY_MS", defaults.retry_base_delay_ms),
            },
            cache: CacheConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: "DEMO_KEY".to_string(),
            server_port: 3000,
            http: HttpConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    parse_or(env::var(name).ok(), default)
}

/// Parses `value`, keeping `default` when it is absent or malformed.
fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
