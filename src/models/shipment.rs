use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::checkpoint::Checkpoint;
use super::geo::Location;
use crate::engine::RouteSnapshot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[default]
    Pending,
    InTransit,
    OutForDelivery,
    Delivered,
    Exception,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InTransit => "in_transit",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Exception => "exception",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InTransit => "In Transit",
            Self::OutForDelivery => "Out For Delivery",
            Self::Delivered => "Delivered",
            Self::Exception => "Exception",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub description: String,
    pub quantity: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub dimensions: Dimensions,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    pub status: ShipmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub origin: Location,
    pub destination: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<Location>,
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
    pub customer: Customer,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    /// The fields the route engine reads, borrowed from this record.
    pub fn snapshot(&self) -> RouteSnapshot<'_> {
        RouteSnapshot {
            origin: Some(self.origin.coordinates),
            destination: Some(self.destination.coordinates),
            current_location: self.current_location.as_ref().map(|l| l.coordinates),
            checkpoints: &self.checkpoints,
            status: self.status,
        }
    }

    pub fn record(&mut self, description: impl Into<String>) {
        let now = Utc::now();
        self.history.push(HistoryEvent {
            status: self.status,
            location: self.current_location.clone(),
            timestamp: now,
            description: description.into(),
        });
        self.updated_at = now;
    }

    pub fn checkpoint_mut(&mut self, id: uuid::Uuid) -> Option<&mut Checkpoint> {
        self.checkpoints.iter_mut().find(|c| c.id == id)
    }
}
