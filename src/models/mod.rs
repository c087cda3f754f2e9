pub mod checkpoint;
pub mod geo;
pub mod shipment;

pub use checkpoint::{Checkpoint, CheckpointPatch};
pub use geo::{GeoPoint, Location};
pub use shipment::{Customer, Dimensions, HistoryEvent, Item, Shipment, ShipmentStatus};
