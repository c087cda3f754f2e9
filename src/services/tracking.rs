use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::engine::{compute_distance_breakdown, compute_progress};
use crate::error::{Result, TrackingError};
use crate::models::{
    Checkpoint, CheckpointPatch, Customer, GeoPoint, HistoryEvent, Item, Location, Shipment,
    ShipmentStatus,
};
use crate::repository::{ShipmentFilter, ShipmentStore};
use crate::seed;
use crate::utils::{self, round_to};

const MAX_TRACKING_NUMBER_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    pub origin: Location,
    pub destination: Location,
    #[serde(default)]
    pub checkpoints: Vec<NewCheckpoint>,
    pub customer: Customer,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub estimated_delivery: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckpoint {
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub reached: bool,
    #[serde(default)]
    pub estimated_arrival: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<NewCheckpoint> for Checkpoint {
    fn from(new: NewCheckpoint) -> Self {
        Checkpoint {
            id: Uuid::new_v4(),
            name: new.name,
            location: new.location,
            reached: new.reached,
            estimated_arrival: new.estimated_arrival,
            notes: new.notes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub coordinates: GeoPoint,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: Option<ShipmentStatus>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: ShipmentStatus,
    #[serde(default)]
    pub description: Option<String>,
}

/// A shipment together with its derived progress percentage.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentView {
    #[serde(flatten)]
    pub shipment: Shipment,
    pub progress: u8,
}

impl From<Shipment> for ShipmentView {
    fn from(shipment: Shipment) -> Self {
        let progress = compute_progress(&shipment.snapshot());
        Self { shipment, progress }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDistance {
    pub tracking_number: String,
    pub total_distance: f64,
    pub distance_traveled: f64,
    pub remaining_distance: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eta {
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub estimated_delivery: DateTime<Utc>,
    /// True when the time was derived from remaining distance and average
    /// speed instead of the recorded estimate.
    pub projected: bool,
    pub delivered: bool,
    pub remaining_distance: f64,
}

/// Shipment operations on top of a [`ShipmentStore`].
pub struct TrackingService {
    store: Arc<dyn ShipmentStore>,
    display_precision: u32,
    average_speed_kmh: f64,
}

impl TrackingService {
    pub fn new(store: Arc<dyn ShipmentStore>, config: &Config) -> Self {
        Self {
            store,
            display_precision: config.display_precision,
            average_speed_kmh: config.average_speed_kmh,
        }
    }

    pub async fn count(&self) -> usize {
        self.store.count().await
    }

    pub async fn create(&self, new: NewShipment) -> Result<ShipmentView> {
        utils::validate_route_location(&new.origin, "origin")?;
        utils::validate_route_location(&new.destination, "destination")?;
        utils::validate_customer(&new.customer)?;
        for item in &new.items {
            utils::validate_item(item)?;
        }
        let checkpoints: Vec<Checkpoint> = new.checkpoints.into_iter().map(Checkpoint::from).collect();
        for checkpoint in &checkpoints {
            utils::validate_checkpoint(checkpoint)?;
        }

        let now = Utc::now();
        let mut shipment = Shipment {
            tracking_number: String::new(),
            status: ShipmentStatus::Pending,
            current_location: Some(new.origin.clone().at(now)),
            origin: new.origin,
            destination: new.destination,
            checkpoints,
            customer: new.customer,
            items: new.items,
            estimated_delivery: new.estimated_delivery,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        shipment.record("Shipment created");

        let stored = self.insert_unique(shipment).await?;
        info!(tracking_number = %stored.tracking_number, "shipment created");
        Ok(stored.into())
    }

    /// Inserts under a fresh tracking number, regenerating on collision.
    async fn insert_unique(&self, mut shipment: Shipment) -> Result<Shipment> {
        for _ in 0..MAX_TRACKING_NUMBER_ATTEMPTS {
            shipment.tracking_number = utils::generate_tracking_number();
            match self.store.insert(shipment.clone()).await {
                Ok(stored) => return Ok(stored),
                Err(TrackingError::Conflict(_)) => {
                    warn!(tracking_number = %shipment.tracking_number, "tracking number collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }
        Err(TrackingError::Conflict(
            "could not allocate a unique tracking number".to_string(),
        ))
    }

    pub async fn get(&self, tracking_number: &str) -> Result<ShipmentView> {
        self.store.get(tracking_number).await.map(ShipmentView::from)
    }

    pub async fn list(&self, filter: &ShipmentFilter) -> Result<Vec<ShipmentView>> {
        let shipments = self.store.list(filter).await?;
        Ok(shipments.into_iter().map(ShipmentView::from).collect())
    }

    /// Moves the shipment. With `require_address` set the update must name
    /// an address, as manual corrections do.
    pub async fn update_location(
        &self,
        tracking_number: &str,
        update: LocationUpdate,
        require_address: bool,
    ) -> Result<ShipmentView> {
        utils::validate_point(&update.coordinates, "location")?;
        if require_address {
            utils::require_text(&update.address, "Address")?;
        }

        let shipment = self
            .store
            .modify(
                tracking_number,
                Box::new(move |shipment: &mut Shipment| -> Result<()> {
                    if let Some(status) = update.status {
                        change_status(shipment, status)?;
                    }
                    let location = Location::new(update.coordinates, update.address).at(Utc::now());
                    let description = update
                        .description
                        .unwrap_or_else(|| format!("Location updated to {}", describe(&location)));
                    shipment.current_location = Some(location);
                    shipment.record(description);
                    Ok(())
                }),
            )
            .await?;

        info!(
            tracking_number = %tracking_number,
            status = %shipment.status,
            "location updated"
        );
        Ok(shipment.into())
    }

    pub async fn update_status(&self, tracking_number: &str, update: StatusUpdate) -> Result<ShipmentView> {
        let shipment = self
            .store
            .modify(
                tracking_number,
                Box::new(move |shipment: &mut Shipment| -> Result<()> {
                    change_status(shipment, update.status)?;
                    let description = update
                        .description
                        .unwrap_or_else(|| format!("Status updated to {}", update.status.label()));
                    shipment.record(description);
                    Ok(())
                }),
            )
            .await?;

        info!(tracking_number = %tracking_number, status = %shipment.status, "status updated");
        Ok(shipment.into())
    }

    pub async fn history(&self, tracking_number: &str) -> Result<Vec<HistoryEvent>> {
        Ok(self.store.get(tracking_number).await?.history)
    }

    pub async fn distance(&self, tracking_number: &str) -> Result<RouteDistance> {
        let shipment = self.store.get(tracking_number).await?;
        let breakdown = compute_distance_breakdown(&shipment.snapshot())?;
        let precision = self.display_precision;

        Ok(RouteDistance {
            tracking_number: shipment.tracking_number,
            total_distance: round_to(breakdown.total_distance_km, precision),
            distance_traveled: round_to(breakdown.distance_traveled_km, precision),
            remaining_distance: round_to(breakdown.remaining_distance_km, precision),
            unit: "km".to_string(),
        })
    }

    pub async fn eta(&self, tracking_number: &str) -> Result<Eta> {
        let shipment = self.store.get(tracking_number).await?;

        if shipment.status == ShipmentStatus::Delivered {
            return Ok(Eta {
                estimated_delivery: delivered_at(&shipment),
                tracking_number: shipment.tracking_number,
                status: shipment.status,
                projected: false,
                delivered: true,
                remaining_distance: 0.0,
            });
        }

        let breakdown = compute_distance_breakdown(&shipment.snapshot())?;
        let remaining = breakdown.remaining_distance_km;
        let (estimated_delivery, projected) = match shipment.estimated_delivery {
            Some(at) => (at, false),
            None => (project_arrival(Utc::now(), remaining, self.average_speed_kmh)?, true),
        };

        Ok(Eta {
            tracking_number: shipment.tracking_number,
            status: shipment.status,
            estimated_delivery,
            projected,
            delivered: false,
            remaining_distance: round_to(remaining, self.display_precision),
        })
    }

    pub async fn add_checkpoint(&self, tracking_number: &str, new: NewCheckpoint) -> Result<Checkpoint> {
        let checkpoint = Checkpoint::from(new);
        utils::validate_checkpoint(&checkpoint)?;

        let added = checkpoint.clone();
        self.store
            .modify(
                tracking_number,
                Box::new(move |shipment: &mut Shipment| -> Result<()> {
                    let description = format!("Checkpoint {} added", checkpoint.name);
                    shipment.checkpoints.push(checkpoint);
                    shipment.record(description);
                    Ok(())
                }),
            )
            .await?;

        info!(tracking_number = %tracking_number, checkpoint = %added.id, "checkpoint added");
        Ok(added)
    }

    pub async fn update_checkpoint(
        &self,
        tracking_number: &str,
        checkpoint_id: Uuid,
        patch: CheckpointPatch,
    ) -> Result<Checkpoint> {
        let shipment = self
            .store
            .modify(
                tracking_number,
                Box::new(move |shipment: &mut Shipment| -> Result<()> {
                    let checkpoint = shipment
                        .checkpoint_mut(checkpoint_id)
                        .ok_or_else(|| TrackingError::CheckpointNotFound(checkpoint_id.to_string()))?;
                    let was_reached = checkpoint.reached;
                    patch.apply(checkpoint);
                    utils::validate_checkpoint(checkpoint)?;

                    if checkpoint.reached && !was_reached {
                        let description = format!("Reached checkpoint {}", checkpoint.name);
                        shipment.record(description);
                    } else {
                        shipment.updated_at = Utc::now();
                    }
                    Ok(())
                }),
            )
            .await?;

        shipment
            .checkpoints
            .into_iter()
            .find(|c| c.id == checkpoint_id)
            .ok_or_else(|| TrackingError::CheckpointNotFound(checkpoint_id.to_string()))
    }

    pub async fn delete_checkpoint(&self, tracking_number: &str, checkpoint_id: Uuid) -> Result<()> {
        self.store
            .modify(
                tracking_number,
                Box::new(move |shipment: &mut Shipment| -> Result<()> {
                    let before = shipment.checkpoints.len();
                    shipment.checkpoints.retain(|c| c.id != checkpoint_id);
                    if shipment.checkpoints.len() == before {
                        return Err(TrackingError::CheckpointNotFound(checkpoint_id.to_string()));
                    }
                    shipment.updated_at = Utc::now();
                    Ok(())
                }),
            )
            .await?;

        info!(tracking_number = %tracking_number, checkpoint = %checkpoint_id, "checkpoint deleted");
        Ok(())
    }

    /// Inserts the sample shipments and returns their tracking numbers.
    pub async fn seed(&self) -> Result<Vec<String>> {
        let tracking_numbers = self.insert_all(seed::sample_shipments(Utc::now())).await?;
        info!(count = tracking_numbers.len(), "seeded sample shipments");
        Ok(tracking_numbers)
    }

    /// Inserts `count` randomly generated shipments between Indian cities.
    pub async fn seed_generated(&self, count: usize) -> Result<Vec<String>> {
        if count == 0 || count > seed::MAX_GENERATED_SHIPMENTS {
            return Err(TrackingError::Validation(format!(
                "count must be between 1 and {}",
                seed::MAX_GENERATED_SHIPMENTS
            )));
        }

        let shipments = seed::generate_indian_shipments(&mut rand::thread_rng(), count, Utc::now());
        let tracking_numbers = self.insert_all(shipments).await?;
        info!(count = tracking_numbers.len(), "seeded generated shipments");
        Ok(tracking_numbers)
    }

    async fn insert_all(&self, shipments: Vec<Shipment>) -> Result<Vec<String>> {
        let mut tracking_numbers = Vec::with_capacity(shipments.len());
        for shipment in shipments {
            let stored = self.insert_unique(shipment).await?;
            tracking_numbers.push(stored.tracking_number);
        }
        Ok(tracking_numbers)
    }
}

/// `delivered` is terminal; every other move is recorded as requested.
fn change_status(shipment: &mut Shipment, status: ShipmentStatus) -> Result<()> {
    if shipment.status.is_terminal() && status != shipment.status {
        return Err(TrackingError::Conflict(format!(
            "shipment {} is already {}",
            shipment.tracking_number, shipment.status
        )));
    }
    shipment.status = status;
    Ok(())
}

/// `now` plus the time needed to cover `remaining_km` at `speed_kmh`.
fn project_arrival(now: DateTime<Utc>, remaining_km: f64, speed_kmh: f64) -> Result<DateTime<Utc>> {
    let out_of_range = || {
        TrackingError::OutOfRange(format!(
            "cannot project delivery for {:.2} km at {} km/h",
            remaining_km, speed_kmh
        ))
    };

    let millis = (remaining_km / speed_kmh * 3_600_000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return Err(out_of_range());
    }
    let travel = Duration::try_milliseconds(millis as i64).ok_or_else(out_of_range)?;
    now.checked_add_signed(travel).ok_or_else(out_of_range)
}

fn delivered_at(shipment: &Shipment) -> DateTime<Utc> {
    shipment
        .history
        .iter()
        .rev()
        .find(|event| event.status == ShipmentStatus::Delivered)
        .map(|event| event.timestamp)
        .unwrap_or(shipment.updated_at)
}

fn describe(location: &Location) -> String {
    if location.address.trim().is_empty() {
        let [lon, lat]: [f64; 2] = location.coordinates.into();
        format!("[{:.4}, {:.4}]", lon, lat)
    } else {
        location.address.clone()
    }
}
