use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::geo::Location;

/// A named waypoint on a shipment's route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub reached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Checkpoint {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location,
            reached: false,
            estimated_arrival: None,
            notes: None,
        }
    }

    pub fn arriving(mut self, at: DateTime<Utc>) -> Self {
        self.estimated_arrival = Some(at);
        self
    }

    pub fn mark_reached(mut self) -> Self {
        self.reached = true;
        self
    }
}

/// Partial update applied by `PATCH .../checkpoints/:id`.
///
/// Absent fields are left alone. For the optional fields an explicit `null`
/// clears the stored value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointPatch {
    pub name: Option<String>,
    pub location: Option<Location>,
    pub reached: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub estimated_arrival: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// Marks a field as present, keeping `null` distinguishable from absent.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl CheckpointPatch {
    pub fn apply(self, checkpoint: &mut Checkpoint) {
        if let Some(name) = self.name {
            checkpoint.name = name;
        }
        if let Some(location) = self.location {
            checkpoint.location = location;
        }
        if let Some(reached) = self.reached {
            checkpoint.reached = reached;
        }
        if let Some(at) = self.estimated_arrival {
            checkpoint.estimated_arrival = at;
        }
        if let Some(notes) = self.notes {
            checkpoint.notes = notes;
        }
    }
}
