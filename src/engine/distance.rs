use crate::models::{Checkpoint, GeoPoint};

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two points.
///
/// Coordinates are not range checked. Out-of-range input still yields a
/// number, just not a meaningful one.
pub fn point_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push h a hair outside [0, 1] for near-antipodal pairs
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Sum of leg distances along an ordered path.
pub fn route_distance(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|leg| point_distance(leg[0], leg[1]))
        .sum()
}

/// Route order of `checkpoints`.
///
/// Checkpoints carrying an estimated arrival are ordered by it, earliest
/// first, and fill the slots timestamped checkpoints held in the input.
/// Checkpoints without one keep their original position. Equal timestamps
/// keep insertion order.
pub fn order_checkpoints(checkpoints: &[Checkpoint]) -> Vec<&Checkpoint> {
    let mut timed: Vec<&Checkpoint> = checkpoints
        .iter()
        .filter(|c| c.estimated_arrival.is_some())
        .collect();
    timed.sort_by_key(|c| c.estimated_arrival);

    let mut timed = timed.into_iter();
    checkpoints
        .iter()
        .map(|c| match c.estimated_arrival {
            Some(_) => timed.next().unwrap_or(c),
            None => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use chrono::{TimeZone, Utc};

    fn checkpoint(name: &str, hour: Option<u32>) -> Checkpoint {
        let cp = Checkpoint::new(name, Location::new(GeoPoint::new(0.0, 0.0), name));
        match hour {
            Some(h) => cp.arriving(Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap()),
            None => cp,
        }
    }

    fn names(ordered: &[&Checkpoint]) -> Vec<String> {
        ordered.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn same_point_is_zero() {
        let p = GeoPoint::new(-73.9857, 40.7484);
        assert_eq!(point_distance(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = point_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn non_finite_input_does_not_panic() {
        let d = point_distance(GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(0.0, 0.0));
        assert!(d.is_nan());
        let d = point_distance(GeoPoint::new(500.0, 200.0), GeoPoint::new(0.0, 0.0));
        assert!(d.is_finite());
    }

    #[test]
    fn timed_checkpoints_sorted_by_arrival() {
        let cps = vec![checkpoint("c", Some(12)), checkpoint("a", Some(8)), checkpoint("b", Some(10))];
        assert_eq!(names(&order_checkpoints(&cps)), vec!["a", "b", "c"]);
    }

    #[test]
    fn untimed_checkpoints_keep_their_slot() {
        let cps = vec![
            checkpoint("late", Some(20)),
            checkpoint("manual", None),
            checkpoint("early", Some(6)),
        ];
        assert_eq!(names(&order_checkpoints(&cps)), vec!["early", "manual", "late"]);
    }

    #[test]
    fn equal_arrivals_keep_insertion_order() {
        let cps = vec![checkpoint("first", Some(9)), checkpoint("second", Some(9))];
        assert_eq!(names(&order_checkpoints(&cps)), vec!["first", "second"]);
    }
}
