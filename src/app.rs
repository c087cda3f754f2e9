use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers::{self, health, shipments};
use crate::services::AppState;

/// Request bodies above this are rejected with 413.
pub const MAX_BODY_BYTES: usize = 10 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let timeout = state.config.request_timeout();

    let api = Router::new()
        .route(
            "/",
            get(shipments::list_shipments).post(shipments::create_shipment),
        )
        .route("/seed", post(shipments::seed_shipments))
        .route("/seed/india", post(shipments::seed_indian_shipments))
        .route("/:tracking_number", get(shipments::get_shipment))
        .route("/:tracking_number/location", patch(shipments::update_location))
        .route(
            "/:tracking_number/location/manual",
            patch(shipments::update_location_manual),
        )
        .route("/:tracking_number/status", patch(shipments::update_status))
        .route("/:tracking_number/history", get(shipments::get_history))
        .route("/:tracking_number/distance", get(shipments::get_distance))
        .route("/:tracking_number/eta", get(shipments::get_eta))
        .route(
            "/:tracking_number/checkpoints",
            post(shipments::add_checkpoint),
        )
        .route(
            "/:tracking_number/checkpoints/:checkpoint_id",
            patch(shipments::update_checkpoint).delete(shipments::delete_checkpoint),
        );

    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .nest("/api/shipments", api)
        .route("/shipments", any(handlers::redirect_to_api))
        .route("/shipments/*rest", any(handlers::redirect_to_api))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
}
