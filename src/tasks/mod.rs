//! Background Tasks Module
//!
//! Contains background tasks owned by long-lived components.
//!
//! # Tasks
//! - Expiry sweep: removes TTL-expired entries from one cache store every `ttl / 2`

mod sweeper;

pub(crate) use sweeper::spawn_sweep_task;
