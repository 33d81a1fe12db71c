//! Realtime train snapshot updater
//!
//! Polls an OpenTripPlanner GraphQL backend for rail vehicle positions and
//! trip details and publishes them as one compact JSON document.

pub mod config;
pub mod errors;
pub mod graphql;
pub mod models;
pub mod snapshot;
pub mod transform;
pub mod updater;
