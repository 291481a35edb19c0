//! NASA open API operations
//!
//! Each operation builds its cache key, consults the cache-aside layer and on
//! a miss times the upstream fetch through the performance monitor.

use std::sync::Arc;

use bytes::Bytes;
use chrono::NaiveDate;
use serde_json::Value;

use crate::cache::{CacheAside, CacheKey};
use crate::config::{ASTEROIDS, EARTH_IMAGERY, MARS_PHOTOS};
use crate::error::{ProxyError, Result};
use crate::http::ApiClient;
use crate::monitor::PerformanceMonitor;

const NEO_FEED_PATH: &str = "/neo/rest/v1/feed";
const EARTH_IMAGERY_PATH: &str = "/planetary/earth/imagery";

/// Default scene width in degrees for earth imagery.
pub const DEFAULT_EARTH_DIM: f64 = 0.15;

/// Upstream operations against api.nasa.gov.
pub struct NasaService {
    client: ApiClient,
    api_key: String,
    cache: CacheAside,
}

impl NasaService {
    pub fn new(client: ApiClient, api_key: impl Into<String>, cache: CacheAside) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            cache,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &CacheAside {
        &self.cache
    }

    fn monitor(&self) -> &Arc<PerformanceMonitor> {
        self.cache.monitor()
    }

    // == Asteroids ==
    /// Near-earth objects approaching between `start` and `end`.
    pub async fn asteroid_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<Value> {
        if end < start {
            return Err(ProxyError::InvalidRequest(format!(
                "end_date {end} is before start_date {start}"
            )));
        }

        let key = CacheKey::new("asteroid_feed")
            .cache_type(ASTEROIDS)
            .arg(&start)
            .arg(&end);
        let (start, end) = (start.to_string(), end.to_string());
        let params = [
            ("start_date", start.as_str()),
            ("end_date", end.as_str()),
            ("api_key", self.api_key.as_str()),
        ];

        self.cache
            .cached(&key, || {
                self.monitor()
                    .timed("asteroid_feed", self.client.fetch_json::<Value>(NEO_FEED_PATH, &params))
            })
            .await
    }

    // == Mars rovers ==
    /// Photos taken by `rover` on martian day `sol`, optionally by one camera.
    pub async fn rover_photos(&self, rover: &str, sol: u32, camera: Option<&str>) -> Result<Value> {
        let rover = validate_name("rover", rover)?;
        let camera = camera.map(|c| validate_name("camera", c)).transpose()?;

        let key = CacheKey::new("rover_photos")
            .cache_type(MARS_PHOTOS)
            .arg(&rover)
            .kwarg("sol", &sol)
            .kwarg("camera", &camera);
        let path = format!("/mars-photos/api/v1/rovers/{rover}/photos");
        let sol = sol.to_string();

        let mut params = vec![("sol", sol.as_str()), ("api_key", self.api_key.as_str())];
        if let Some(camera) = camera.as_deref() {
            params.push(("camera", camera));
        }

        self.cache
            .cached(&key, || {
                self.monitor()
                    .timed("rover_photos", self.client.fetch_json::<Value>(&path, &params))
            })
            .await
    }

    // == Earth imagery ==
    /// Landsat image bytes centred on `lat`/`lon`, closest to `date`.
    pub async fn earth_imagery(
        &self,
        lat: f64,
        lon: f64,
        date: Option<NaiveDate>,
        dim: Option<f64>,
    ) -> Result<Bytes> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ProxyError::InvalidRequest(format!(
                "coordinates out of range: lat={lat}, lon={lon}"
            )));
        }
        let dim = dim.unwrap_or(DEFAULT_EARTH_DIM);

        let key = CacheKey::new("earth_imagery")
            .cache_type(EARTH_IMAGERY)
            .kwarg("lat", &lat)
            .kwarg("lon", &lon)
            .kwarg("date", &date)
            .kwarg("dim", &dim);

        let (lat, lon, dim) = (lat.to_string(), lon.to_string(), dim.to_string());
        let date = date.map(|d| d.to_string());

        let mut params = vec![
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("dim", dim.as_str()),
            ("api_key", self.api_key.as_str()),
        ];
        if let Some(date) = date.as_deref() {
            params.push(("date", date));
        }

        self.cache
            .cached(&key, || {
                self.monitor()
                    .timed("earth_imagery", self.client.fetch_bytes(EARTH_IMAGERY_PATH, &params))
            })
            .await
    }
}

/// Path segments must stay plain ASCII words.
fn validate_name(kind: &str, value: &str) -> Result<String> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ProxyError::InvalidRequest(format!("invalid {kind}: {value:?}")));
    }
    Ok(value.to_ascii_lowercase())
}
