//! Request and Response models for the proxy API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query strings and serializing admin response bodies.

pub mod requests;
pub mod responses;

pub use requests::{AsteroidsQuery, EarthImageryQuery, RoverPhotosQuery, DEFAULT_SOL, MAX_FEED_DAYS};
pub use responses::{ClearResponse, HealthResponse, MessageResponse, StatsResponse};
