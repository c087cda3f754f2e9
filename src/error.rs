use thiserror::Error;

/// Errors surfaced by the tracking core and the shipment store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackingError {
    /// A route point required for the distance breakdown is absent.
    #[error("Insufficient data: shipment has no {field}")]
    InsufficientData { field: &'static str },
    #[error("Shipment with tracking number {0} not found")]
    NotFound(String),
    #[error("Checkpoint {0} not found")]
    CheckpointNotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    /// A derived value does not fit the representable range.
    #[error("Out of range: {0}")]
    OutOfRange(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

pub type Result<T> = std::result::Result<T, TrackingError>;
