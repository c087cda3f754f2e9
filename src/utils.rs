use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::{Result, TrackingError};
use crate::models::{Checkpoint, Customer, GeoPoint, Item, Location};

const TRACKING_PREFIX: &str = "TRK";
const TRACKING_SUFFIX_LEN: usize = 9;

/// `TRK` followed by nine uppercase letters or digits.
pub fn generate_tracking_number() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TRACKING_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("{}{}", TRACKING_PREFIX, suffix)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn validate_point(point: &GeoPoint, what: &str) -> Result<()> {
    if point.in_range() {
        return Ok(());
    }
    if !point.longitude.is_finite() || !(-180.0..=180.0).contains(&point.longitude) {
        return Err(TrackingError::Validation(format!(
            "Invalid {} longitude. Must be between -180 and 180.",
            what
        )));
    }
    Err(TrackingError::Validation(format!(
        "Invalid {} latitude. Must be between -90 and 90.",
        what
    )))
}

/// A location picked from the address search: in range, not the `[0, 0]`
/// placeholder, with an address.
pub fn validate_route_location(location: &Location, what: &str) -> Result<()> {
    validate_point(&location.coordinates, what)?;
    if location.coordinates.is_unset() {
        return Err(TrackingError::Validation(format!(
            "Please select a valid {} address",
            what
        )));
    }
    require_text(&location.address, &format!("{} address", what))
}

pub fn validate_checkpoint(checkpoint: &Checkpoint) -> Result<()> {
    require_text(&checkpoint.name, "checkpoint name")?;
    validate_route_location(&checkpoint.location, "checkpoint")
}

pub fn validate_customer(customer: &Customer) -> Result<()> {
    require_text(&customer.name, "customer name")?;
    if !customer.email.is_empty() && !is_valid_email(&customer.email) {
        return Err(TrackingError::Validation(format!(
            "Invalid customer email: {}",
            customer.email
        )));
    }
    if !customer.phone.is_empty() && !is_valid_phone(&customer.phone) {
        return Err(TrackingError::Validation(format!(
            "Invalid customer phone: {}",
            customer.phone
        )));
    }
    Ok(())
}

pub fn validate_item(item: &Item) -> Result<()> {
    require_text(&item.description, "item description")?;
    if item.quantity == 0 {
        return Err(TrackingError::Validation(
            "Item quantity must be at least 1".to_string(),
        ));
    }
    let measures = [
        item.weight,
        item.dimensions.length,
        item.dimensions.width,
        item.dimensions.height,
    ];
    if measures.iter().any(|m| !m.is_finite() || *m < 0.0) {
        return Err(TrackingError::Validation(format!(
            "Item '{}' has a negative or invalid weight or dimension",
            item.description
        )));
    }
    Ok(())
}

pub fn require_text(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrackingError::Validation(format!("{} is required", what)));
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c));
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    local_ok && host_ok && tld_ok
}

fn is_valid_phone(phone: &str) -> bool {
    let number = phone.strip_prefix('+').unwrap_or(phone);
    let digits = number.chars().filter(|c| c.is_ascii_digit()).count();
    (5..=15).contains(&digits)
        && number
            .chars()
            .all(|c| c.is_ascii_digit() || " -()".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_numbers_have_fixed_shape() {
        let tn = generate_tracking_number();
        assert_eq!(tn.len(), 12);
        assert!(tn.starts_with("TRK"));
        assert!(tn[3..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn rounding_to_display_precision() {
        assert_eq!(round_to(111.19492664455873, 2), 111.19);
        assert_eq!(round_to(55.597463322279365, 1), 55.6);
        assert_eq!(round_to(7.5, 0), 8.0);
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ops@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@example.c"));
    }

    #[test]
    fn phone_shapes() {
        assert!(is_valid_phone("555-0100"));
        assert!(is_valid_phone("+91 98765 43210"));
        assert!(!is_valid_phone("1234"));
        assert!(!is_valid_phone("call me maybe"));
    }

    #[test]
    fn placeholder_coordinates_rejected_for_route_points() {
        let location = Location::new(GeoPoint::new(0.0, 0.0), "Null Island");
        assert!(matches!(
            validate_route_location(&location, "origin"),
            Err(TrackingError::Validation(_))
        ));
    }
}
