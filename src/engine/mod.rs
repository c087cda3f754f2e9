//! Route progress and distance estimation.
//!
//! Everything in here is a pure function over a [`RouteSnapshot`]. Nothing is
//! cached between calls and no input is mutated.

pub mod distance;
pub mod progress;

use serde::Serialize;

use crate::models::{Checkpoint, GeoPoint, ShipmentStatus};

pub use distance::{order_checkpoints, point_distance, route_distance, EARTH_RADIUS_KM};
pub use progress::{compute_distance_breakdown, compute_progress, PROGRESS_CAP};

/// The shipment fields the engine reads at one point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteSnapshot<'a> {
    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    pub current_location: Option<GeoPoint>,
    pub checkpoints: &'a [Checkpoint],
    pub status: ShipmentStatus,
}

impl<'a> RouteSnapshot<'a> {
    pub fn new(
        origin: GeoPoint,
        destination: GeoPoint,
        current_location: GeoPoint,
        status: ShipmentStatus,
    ) -> Self {
        Self {
            origin: Some(origin),
            destination: Some(destination),
            current_location: Some(current_location),
            checkpoints: &[],
            status,
        }
    }

    pub fn with_checkpoints(mut self, checkpoints: &'a [Checkpoint]) -> Self {
        self.checkpoints = checkpoints;
        self
    }
}

/// Route distances in kilometres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResult {
    pub total_distance_km: f64,
    pub distance_traveled_km: f64,
    pub remaining_distance_km: f64,
}

impl DistanceResult {
    pub fn new(total_distance_km: f64, distance_traveled_km: f64) -> Self {
        Self {
            total_distance_km,
            distance_traveled_km,
            remaining_distance_km: (total_distance_km - distance_traveled_km).max(0.0),
        }
    }
}
