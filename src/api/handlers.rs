//! API Handlers
//!
//! HTTP request handlers for the admin endpoints and the upstream proxy routes.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::cache::{CacheAside, CacheRegistry, Payload};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::http::ApiClient;
use crate::models::{
    AsteroidsQuery, ClearResponse, EarthImageryQuery, HealthResponse, MessageResponse,
    RoverPhotosQuery, StatsResponse,
};
use crate::monitor::PerformanceMonitor;
use crate::services::NasaService;

/// Application state shared across all handlers.
///
/// The registry and monitor are the same instances the service's cache-aside
/// layer records into.
#[derive(Clone)]
pub struct AppState {
    pub nasa: Arc<NasaService>,
    pub registry: Arc<CacheRegistry<Payload>>,
    pub monitor: Arc<PerformanceMonitor>,
}

impl AppState {
    /// Creates a new AppState around an already wired service.
    pub fn new(nasa: NasaService) -> Self {
        let registry = nasa.cache().registry().clone();
        let monitor = nasa.cache().monitor().clone();
        Self {
            nasa: Arc::new(nasa),
            registry,
            monitor,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Stores are built lazily on first use of each cache type.
    pub fn from_config(config: &Config) -> Self {
        let registry = Arc::new(CacheRegistry::new(config.cache.clone()));
        let monitor = Arc::new(PerformanceMonitor::new());
        let cache = CacheAside::new(registry, monitor);
        let client = ApiClient::new(config.http.clone());
        Self::new(NasaService::new(client, config.api_key.clone(), cache))
    }
}

// == Admin ==

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
///
/// Returns the monitor summary alongside per-store metrics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        performance: state.monitor.summary(),
        caches: state.registry.metrics(),
    })
}

/// Handler for POST /cache/clear
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse::new(state.registry.clear_all()))
}

/// Handler for POST /stats/reset
pub async fn reset_stats_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.monitor.reset();
    info!("Performance statistics reset");
    Json(MessageResponse::new("Performance statistics reset"))
}

// == Upstream proxy ==

/// Handler for GET /api/asteroids
pub async fn asteroids_handler(
    State(state): State<AppState>,
    Query(query): Query<AsteroidsQuery>,
) -> Result<Json<Value>> {
    let today = Utc::now().date_naive();
    if let Some(error_msg) = query.validate(today) {
        return Err(ProxyError::InvalidRequest(error_msg));
    }

    let (start, end) = query.date_range(today);
    let feed = state.nasa.asteroid_feed(start, end).await?;
    Ok(Json(feed))
}

/// Handler for GET /api/mars/:rover/photos
pub async fn rover_photos_handler(
    State(state): State<AppState>,
    Path(rover): Path<String>,
    Query(query): Query<RoverPhotosQuery>,
) -> Result<Json<Value>> {
    let photos = state
        .nasa
        .rover_photos(&rover, query.sol(), query.camera.as_deref())
        .await?;
    Ok(Json(photos))
}

/// Handler for GET /api/earth/imagery
///
/// Streams the upstream image bytes back as `image/png`.
pub async fn earth_imagery_handler(
    State(state): State<AppState>,
    Query(query): Query<EarthImageryQuery>,
) -> Result<impl IntoResponse> {
    let image = state
        .nasa
        .earth_imagery(query.lat, query.lon, query.date, query.dim)
        .await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheKey;
    use crate::config::ASTEROIDS;

    fn test_state() -> AppState {
        AppState::from_config(&Config::default())
    }

    #[tokio::test]
    async fn test_state_shares_registry_and_monitor() {
        let state = test_state();
        assert!(Arc::ptr_eq(&state.registry, state.nasa.cache().registry()));
        assert!(Arc::ptr_eq(&state.monitor, state.nasa.cache().monitor()));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_stats_handler_reports_stores() {
        let state = test_state();
        state.registry.resolve(ASTEROIDS).set("k", Payload::Json(Value::Null));

        let response = stats_handler(State(state)).await;
        assert_eq!(response.caches[ASTEROIDS].size, 1);
        assert_eq!(response.performance.total_api_calls, 0);
    }

    #[tokio::test]
    async fn test_clear_cache_handler() {
        let state = test_state();
        let key = CacheKey::new("asteroid_feed").cache_type(ASTEROIDS).arg("2024-01-01");
        let value: std::result::Result<Value, ProxyError> = state
            .nasa
            .cache()
            .cached(&key, || async { Ok(Value::from(1)) })
            .await;
        assert!(value.is_ok());

        let response = clear_cache_handler(State(state.clone())).await;
        assert_eq!(response.cleared, 1);
        assert_eq!(state.registry.metrics()[ASTEROIDS].size, 0);
    }

    #[tokio::test]
    async fn test_reset_stats_handler() {
        let state = test_state();
        state.monitor.record_cache_miss(ASTEROIDS);

        reset_stats_handler(State(state.clone())).await;
        assert!(state.monitor.summary().cache_stats.is_empty());
    }

    #[tokio::test]
    async fn test_asteroids_rejects_reversed_range() {
        let query = AsteroidsQuery {
            start_date: Some("2024-01-10".parse().unwrap()),
            end_date: Some("2024-01-01".parse().unwrap()),
        };
        let result = asteroids_handler(State(test_state()), Query(query)).await;
        assert!(matches!(result, Err(ProxyError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_rover_photos_rejects_bad_rover() {
        let result = rover_photos_handler(
            State(test_state()),
            Path("../keys".to_string()),
            Query(RoverPhotosQuery::default()),
        )
        .await;
        assert!(matches!(result, Err(ProxyError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_earth_imagery_rejects_bad_coordinates() {
        let query = EarthImageryQuery {
            lat: 123.0,
            lon: 0.0,
            date: None,
            dim: None,
        };
        let result = earth_imagery_handler(State(test_state()), Query(query)).await;
        assert!(matches!(result, Err(ProxyError::InvalidRequest(_))));
    }
}
