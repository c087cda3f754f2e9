//! Shipment persistence.
//!
//! The route engine never talks to storage; the service layer loads a
//! [`Shipment`] through a [`ShipmentStore`] and hands its snapshot over.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Shipment, ShipmentStatus};

pub use memory::InMemoryShipmentStore;

/// An in-place edit applied to a stored shipment.
///
/// Returning an error leaves the stored record untouched.
pub type Mutation = Box<dyn FnOnce(&mut Shipment) -> Result<()> + Send>;

#[derive(Debug, Clone, Default)]
pub struct ShipmentFilter {
    pub status: Option<ShipmentStatus>,
    pub limit: Option<usize>,
}

#[async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Fails with `Conflict` when the tracking number is taken.
    async fn insert(&self, shipment: Shipment) -> Result<Shipment>;

    async fn get(&self, tracking_number: &str) -> Result<Shipment>;

    /// Newest first.
    async fn list(&self, filter: &ShipmentFilter) -> Result<Vec<Shipment>>;

    async fn modify(&self, tracking_number: &str, mutation: Mutation) -> Result<Shipment>;

    async fn count(&self) -> usize;
}
