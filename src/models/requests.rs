//! Query DTOs for the proxy API
//!
//! Defines the query strings accepted by the upstream proxy routes.

use chrono::{Duration, NaiveDate};
use serde::Deserialize;

/// Longest date window the NEO feed accepts.
pub const MAX_FEED_DAYS: i64 = 7;

/// Default martian day when `sol` is omitted.
pub const DEFAULT_SOL: u32 = 1000;

/// Query for GET /api/asteroids
///
/// # Fields
/// - `start_date`: First day of the window (defaults to today)
/// - `end_date`: Last day of the window (defaults to `start_date`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AsteroidsQuery {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl AsteroidsQuery {
    /// Resolves the omitted bounds against `today`.
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = self.start_date.unwrap_or(today);
        let end = self.end_date.unwrap_or(start);
        (start, end)
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self, today: NaiveDate) -> Option<String> {
        let (start, end) = self.date_range(today);
        if end < start {
            return Some(format!("end_date {end} is before start_date {start}"));
        }
        if end - start > Duration::days(MAX_FEED_DAYS) {
            return Some(format!("Date range exceeds {MAX_FEED_DAYS} days"));
        }
        None
    }
}

/// Query for GET /api/mars/:rover/photos
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoverPhotosQuery {
    /// Martian day (defaults to [`DEFAULT_SOL`])
    #[serde(default)]
    pub sol: Option<u32>,
    /// Optional camera abbreviation, e.g. `FHAZ`
    #[serde(default)]
    pub camera: Option<String>,
}

impl RoverPhotosQuery {
    pub fn sol(&self) -> u32 {
        self.sol.unwrap_or(DEFAULT_SOL)
    }
}

/// Query for GET /api/earth/imagery
#[derive(Debug, Clone, Deserialize)]
pub struct EarthImageryQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Scene width in degrees
    #[serde(default)]
    pub dim: Option<f64>,
}
