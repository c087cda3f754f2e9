use tracing::trace;

use super::distance::{order_checkpoints, point_distance, route_distance};
use super::{DistanceResult, RouteSnapshot};
use crate::error::{Result, TrackingError};
use crate::models::{GeoPoint, ShipmentStatus};

/// Highest percentage position alone can report. Only `delivered` reaches 100.
pub const PROGRESS_CAP: u8 = 95;

/// Delivery progress as a percentage in `0..=100`.
///
/// Measured against the direct origin to destination distance, not the
/// checkpoint route. Missing points yield 0 instead of an error.
pub fn compute_progress(snapshot: &RouteSnapshot<'_>) -> u8 {
    let (Some(origin), Some(destination), Some(current)) = (
        snapshot.origin,
        snapshot.destination,
        snapshot.current_location,
    ) else {
        return 0;
    };

    if snapshot.status == ShipmentStatus::Delivered {
        return 100;
    }

    let total = point_distance(origin, destination);
    if total == 0.0 {
        return 0;
    }
    let traveled = point_distance(origin, current);
    let raw = (traveled / total * 100.0).round();
    if raw.is_nan() {
        return 0;
    }

    raw.clamp(0.0, f64::from(PROGRESS_CAP)) as u8
}

/// Total, traveled and remaining distance along the checkpoint route.
///
/// The route runs origin, checkpoints in route order, destination. The
/// traveled leg runs origin, reached checkpoints in route order, current
/// location. Fails with [`TrackingError::InsufficientData`] when any of the
/// three anchor points is missing.
pub fn compute_distance_breakdown(snapshot: &RouteSnapshot<'_>) -> Result<DistanceResult> {
    let origin = require(snapshot.origin, "origin")?;
    let destination = require(snapshot.destination, "destination")?;
    let current = require(snapshot.current_location, "current location")?;

    let ordered = order_checkpoints(snapshot.checkpoints);

    let mut route = Vec::with_capacity(ordered.len() + 2);
    route.push(origin);
    route.extend(ordered.iter().map(|c| c.location.coordinates));
    route.push(destination);

    let mut traveled_path = Vec::with_capacity(ordered.len() + 2);
    traveled_path.push(origin);
    traveled_path.extend(
        ordered
            .iter()
            .filter(|c| c.reached)
            .map(|c| c.location.coordinates),
    );
    traveled_path.push(current);

    let result = DistanceResult::new(route_distance(&route), route_distance(&traveled_path));
    trace!(
        legs = route.len() - 1,
        total_km = result.total_distance_km,
        traveled_km = result.distance_traveled_km,
        "computed distance breakdown"
    );
    Ok(result)
}

fn require(point: Option<GeoPoint>, field: &'static str) -> Result<GeoPoint> {
    point.ok_or(TrackingError::InsufficientData { field })
}
