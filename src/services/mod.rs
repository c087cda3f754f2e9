pub mod tracking;

use crate::config::Config;
use crate::repository::{InMemoryShipmentStore, ShipmentStore};
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub tracking: Arc<tracking::TrackingService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(InMemoryShipmentStore::new()))
    }

    pub fn with_store(config: Config, store: Arc<dyn ShipmentStore>) -> Self {
        let tracking = Arc::new(tracking::TrackingService::new(store, &config));
        Self { config, tracking }
    }
}
