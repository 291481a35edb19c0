//! Upstream services built on the cache and HTTP layers.

pub mod nasa;

pub use nasa::NasaService;
