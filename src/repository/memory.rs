use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use super::{Mutation, ShipmentFilter, ShipmentStore};
use crate::error::{Result, TrackingError};
use crate::models::Shipment;

/// Process-local store keyed by tracking number.
#[derive(Default)]
pub struct InMemoryShipmentStore {
    shipments: DashMap<String, Shipment>,
}

impl InMemoryShipmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShipmentStore for InMemoryShipmentStore {
    async fn insert(&self, shipment: Shipment) -> Result<Shipment> {
        match self.shipments.entry(shipment.tracking_number.clone()) {
            Entry::Occupied(_) => Err(TrackingError::Conflict(format!(
                "tracking number {} already exists",
                shipment.tracking_number
            ))),
            Entry::Vacant(slot) => {
                debug!(tracking_number = %shipment.tracking_number, "stored shipment");
                slot.insert(shipment.clone());
                Ok(shipment)
            }
        }
    }

    async fn get(&self, tracking_number: &str) -> Result<Shipment> {
        self.shipments
            .get(tracking_number)
            .map(|s| s.value().clone())
            .ok_or_else(|| TrackingError::NotFound(tracking_number.to_string()))
    }

    async fn list(&self, filter: &ShipmentFilter) -> Result<Vec<Shipment>> {
        let mut shipments: Vec<Shipment> = self
            .shipments
            .iter()
            .filter(|s| filter.status.map_or(true, |status| s.status == status))
            .map(|s| s.value().clone())
            .collect();

        shipments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.tracking_number.cmp(&b.tracking_number))
        });
        if let Some(limit) = filter.limit {
            shipments.truncate(limit);
        }
        Ok(shipments)
    }

    async fn modify(&self, tracking_number: &str, mutation: Mutation) -> Result<Shipment> {
        let mut entry = self
            .shipments
            .get_mut(tracking_number)
            .ok_or_else(|| TrackingError::NotFound(tracking_number.to_string()))?;

        // edit a copy so a failed mutation leaves the record as it was
        let mut updated = entry.value().clone();
        mutation(&mut updated)?;
        *entry.value_mut() = updated.clone();

        debug!(tracking_number = %tracking_number, "updated shipment");
        Ok(updated)
    }

    async fn count(&self) -> usize {
        self.shipments.len()
    }
}
