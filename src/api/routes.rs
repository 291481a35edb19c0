//! API Routes
//!
//! Configures the Axum router with the admin and upstream proxy endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    asteroids_handler, clear_cache_handler, earth_imagery_handler, health_handler,
    reset_stats_handler, rover_photos_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Call timings and cache metrics
/// - `POST /stats/reset` - Reset the performance monitor
/// - `POST /cache/clear` - Clear every cache store
/// - `GET /api/asteroids` - Near-earth object feed
/// - `GET /api/mars/:rover/photos` - Mars rover photos
/// - `GET /api/earth/imagery` - Landsat imagery (PNG)
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/stats/reset", post(reset_stats_handler))
        .route("/cache/clear", post(clear_cache_handler))
        .route("/api/asteroids", get(asteroids_handler))
        .route("/api/mars/:rover/photos", get(rover_photos_handler))
        .route("/api/earth/imagery", get(earth_imagery_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
