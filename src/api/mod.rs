//! API Module
//!
//! HTTP handlers and routing for the proxy's REST surface.
//!
//! # Endpoints
//! - `GET /health`, `GET /stats` - Liveness and metrics
//! - `POST /stats/reset`, `POST /cache/clear` - Admin actions
//! - `GET /api/...` - Cached NASA upstream routes

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
