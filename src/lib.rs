//! Shipment tracking with route progress and distance estimation.
//!
//! [`engine`] holds the pure route computations. The rest of the crate is the
//! service around it: models, a shipment store, and an axum API.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;
pub mod utils;

pub use engine::{
    compute_distance_breakdown, compute_progress, point_distance, route_distance,
    DistanceResult, RouteSnapshot,
};
pub use error::TrackingError;
