//! Sample shipments for local development.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{
    Checkpoint, Customer, Dimensions, GeoPoint, Item, Location, Shipment, ShipmentStatus,
};
use crate::utils::generate_tracking_number;

/// Shipments generated when no count is given.
pub const DEFAULT_GENERATED_SHIPMENTS: usize = 15;
/// Most shipments a single generation request may create.
pub const MAX_GENERATED_SHIPMENTS: usize = 50;

const INDIAN_CITIES: &[(&str, f64, f64)] = &[
    ("Connaught Place, New Delhi", 77.2090, 28.6139),
    ("Nariman Point, Mumbai", 72.8777, 19.0760),
    ("MG Road, Bengaluru", 77.5946, 12.9716),
    ("T. Nagar, Chennai", 80.2707, 13.0827),
    ("Park Street, Kolkata", 88.3639, 22.5726),
    ("Banjara Hills, Hyderabad", 78.4867, 17.3850),
    ("FC Road, Pune", 73.8567, 18.5204),
    ("Ashram Road, Ahmedabad", 72.5714, 23.0225),
    ("MI Road, Jaipur", 75.7873, 26.9124),
    ("Hazratganj, Lucknow", 80.9462, 26.8467),
    ("Sector 17, Chandigarh", 76.7794, 30.7333),
    ("MP Nagar, Bhopal", 77.4126, 23.2599),
    ("Janpath, Bhubaneswar", 85.8245, 20.2961),
    ("Marine Drive, Kochi", 76.2673, 9.9312),
    ("GS Road, Guwahati", 91.7362, 26.1445),
    ("Civil Lines, Nagpur", 79.0882, 21.1458),
];

const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Aarav Mehta", "aarav.mehta@example.com", "+91 98100 12345"),
    ("Ananya Gupta", "ananya.gupta@example.com", "+91 98450 23456"),
    ("Rohan Nair", "rohan.nair@example.com", "+91 94470 34567"),
    ("Kavya Reddy", "kavya.reddy@example.com", "+91 99490 45678"),
    ("Vikram Singh", "vikram.singh@example.com", "+91 98290 56789"),
    ("Ishita Banerjee", "ishita.banerjee@example.com", "+91 98310 67890"),
];

const GOODS: &[(&str, f64)] = &[
    ("Handloom sarees", 1.2),
    ("Spice assortment", 0.5),
    ("Brassware", 3.0),
    ("Tea chests", 5.0),
    ("Mobile phones", 0.4),
    ("Ayurvedic products", 0.8),
    ("Leather goods", 1.5),
];

fn city(name: &str, longitude: f64, latitude: f64) -> Location {
    Location::new(GeoPoint::new(longitude, latitude), name)
}

fn parcel(description: &str, quantity: u32, weight: f64) -> Item {
    Item {
        description: description.to_string(),
        quantity,
        weight,
        dimensions: Dimensions {
            length: 40.0,
            width: 30.0,
            height: 20.0,
        },
    }
}

fn customer(name: &str, email: &str, phone: &str) -> Customer {
    Customer {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    }
}

fn shipment(
    now: DateTime<Utc>,
    origin: Location,
    destination: Location,
    customer: Customer,
    items: Vec<Item>,
) -> Shipment {
    let created_at = now - Duration::days(2);
    let mut shipment = Shipment {
        tracking_number: generate_tracking_number(),
        status: ShipmentStatus::Pending,
        current_location: Some(origin.clone().at(created_at)),
        origin,
        destination,
        checkpoints: Vec::new(),
        customer,
        items,
        estimated_delivery: Some(now + Duration::days(1)),
        history: Vec::new(),
        created_at,
        updated_at: created_at,
    };
    shipment.record("Shipment created");
    shipment
}

fn advance(shipment: &mut Shipment, status: ShipmentStatus, location: Location, description: &str) {
    shipment.status = status;
    shipment.current_location = Some(location);
    shipment.record(description);
}

/// The point `fraction` of the way from `from` to `to`, interpolated on the
/// coordinates.
fn along(from: GeoPoint, to: GeoPoint, fraction: f64) -> GeoPoint {
    GeoPoint::new(
        from.longitude + (to.longitude - from.longitude) * fraction,
        from.latitude + (to.latitude - from.latitude) * fraction,
    )
}

/// `count` random shipments between Indian cities in mixed states, each
/// with a relay checkpoint halfway along the route.
pub fn generate_indian_shipments<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<Shipment> {
    let mut shipments = Vec::with_capacity(count);

    for _ in 0..count {
        let ends: Vec<_> = INDIAN_CITIES.choose_multiple(rng, 2).copied().collect();
        let (from_name, from_lon, from_lat) = ends[0];
        let (to_name, to_lon, to_lat) = ends[1];
        let origin = city(from_name, from_lon, from_lat);
        let destination = city(to_name, to_lon, to_lat);

        let (name, email, phone) = CUSTOMERS[rng.gen_range(0..CUSTOMERS.len())];
        let items = (0..rng.gen_range(1..=3))
            .map(|_| {
                let (description, unit_weight) = GOODS[rng.gen_range(0..GOODS.len())];
                let quantity = rng.gen_range(1..=5);
                parcel(description, quantity, unit_weight * f64::from(quantity))
            })
            .collect();

        let relay_point = along(origin.coordinates, destination.coordinates, 0.5);
        let relay_name = format!("{} relay", short_name(from_name));
        let relay = Location::new(
            relay_point,
            format!("{} to {} corridor", short_name(from_name), short_name(to_name)),
        );

        let mut generated = shipment(
            now,
            origin.clone(),
            destination.clone(),
            customer(name, email, phone),
            items,
        );
        generated.checkpoints = vec![Checkpoint::new(relay_name.clone(), relay.clone())
            .arriving(generated.created_at + Duration::hours(rng.gen_range(12..36)))];

        match rng.gen_range(0..4) {
            0 => {}
            1 => {
                let fraction = rng.gen_range(0.1..0.9);
                if fraction > 0.5 {
                    generated.checkpoints[0].reached = true;
                    let reached = format!("Reached checkpoint {}", relay_name);
                    advance(&mut generated, ShipmentStatus::InTransit, relay.clone(), &reached);
                }
                let position =
                    Location::new(along(origin.coordinates, destination.coordinates, fraction), "");
                let position = position.at(now - Duration::hours(2));
                advance(&mut generated, ShipmentStatus::InTransit, position, "In transit");
            }
            2 => {
                generated.checkpoints[0].reached = true;
                let reached = format!("Reached checkpoint {}", relay_name);
                advance(&mut generated, ShipmentStatus::InTransit, relay, &reached);
                let near = Location::new(along(origin.coordinates, destination.coordinates, 0.97), to_name)
                    .at(now - Duration::hours(1));
                advance(&mut generated, ShipmentStatus::OutForDelivery, near, "Out for delivery");
            }
            _ => {
                generated.checkpoints[0].reached = true;
                let reached = format!("Reached checkpoint {}", relay_name);
                advance(&mut generated, ShipmentStatus::InTransit, relay, &reached);
                let delivered = destination.at(now - Duration::hours(3));
                advance(&mut generated, ShipmentStatus::Delivered, delivered, "Delivered to recipient");
            }
        }

        shipments.push(generated);
    }

    shipments
}

/// `"MI Road, Jaipur"` becomes `"Jaipur"`.
fn short_name(address: &str) -> &str {
    address.rsplit(", ").next().unwrap_or(address)
}

/// Three shipments covering the interesting states: moving along a
/// checkpoint route, freshly created, and delivered.
pub fn sample_shipments(now: DateTime<Utc>) -> Vec<Shipment> {
    let delhi = city("Connaught Place, New Delhi", 77.2090, 28.6139);
    let jaipur = city("MI Road, Jaipur", 75.7873, 26.9124);
    let ahmedabad = city("Ashram Road, Ahmedabad", 72.5714, 23.0225);
    let mumbai = city("Nariman Point, Mumbai", 72.8777, 19.0760);

    let mut west = shipment(
        now,
        delhi.clone(),
        mumbai,
        customer("Priya Sharma", "priya.sharma@example.com", "+91 98200 11223"),
        vec![parcel("Textile samples", 3, 4.5)],
    );
    west.checkpoints = vec![
        Checkpoint::new("Ahmedabad hub", ahmedabad).arriving(now + Duration::hours(8)),
        Checkpoint::new("Jaipur sorting centre", jaipur.clone())
            .arriving(now - Duration::hours(20))
            .mark_reached(),
    ];
    advance(&mut west, ShipmentStatus::InTransit, jaipur.at(now - Duration::hours(20)), "Arrived at Jaipur sorting centre");
    advance(
        &mut west,
        ShipmentStatus::InTransit,
        city("NH48, Udaipur", 73.7125, 24.5854).at(now - Duration::hours(4)),
        "In transit towards Ahmedabad",
    );

    let south = shipment(
        now,
        city("MG Road, Bengaluru", 77.5946, 12.9716),
        city("T. Nagar, Chennai", 80.2707, 13.0827),
        customer("Arjun Rao", "arjun.rao@example.com", "+91 99000 44556"),
        vec![parcel("Laptop", 1, 2.2), parcel("Accessories", 2, 0.8)],
    );

    let kolkata = city("Park Street, Kolkata", 88.3639, 22.5726);
    let lucknow = city("Hazratganj, Lucknow", 80.9462, 26.8467);
    let mut east = shipment(
        now,
        kolkata,
        delhi.clone(),
        customer("Meera Iyer", "meera.iyer@example.com", "+91 98300 77889"),
        vec![parcel("Books", 10, 7.5)],
    );
    east.checkpoints = vec![Checkpoint::new("Lucknow hub", lucknow.clone()).mark_reached()];
    advance(&mut east, ShipmentStatus::InTransit, lucknow, "Arrived at Lucknow hub");
    advance(&mut east, ShipmentStatus::OutForDelivery, delhi.clone(), "Out for delivery");
    advance(&mut east, ShipmentStatus::Delivered, delhi.at(now - Duration::hours(1)), "Delivered to recipient");

    vec![west, south, east]
}
