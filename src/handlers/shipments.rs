use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::{ApiResponse, AppError};
use crate::error::TrackingError;
use crate::models::{Checkpoint, CheckpointPatch, HistoryEvent, ShipmentStatus};
use crate::repository::ShipmentFilter;
use crate::seed::DEFAULT_GENERATED_SHIPMENTS;
use crate::services::tracking::{
    Eta, LocationUpdate, NewCheckpoint, NewShipment, RouteDistance, ShipmentView, StatusUpdate,
};
use crate::services::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

#[derive(Debug, Deserialize)]
pub struct ListShipmentsQuery {
    pub status: Option<ShipmentStatus>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub count: usize,
    pub tracking_numbers: Vec<String>,
}

impl From<Vec<String>> for SeedResponse {
    fn from(tracking_numbers: Vec<String>) -> Self {
        Self {
            count: tracking_numbers.len(),
            tracking_numbers,
        }
    }
}

pub async fn list_shipments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListShipmentsQuery>,
) -> ApiResult<Vec<ShipmentView>> {
    let filter = ShipmentFilter {
        status: query.status,
        limit: query.limit,
    };
    let shipments = state.tracking.list(&filter).await?;
    Ok(ApiResponse::ok(shipments))
}

pub async fn create_shipment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewShipment>,
) -> Result<(StatusCode, Json<ApiResponse<ShipmentView>>), AppError> {
    let shipment = state.tracking.create(payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(shipment)))
}

pub async fn get_shipment(
    State(state): State<Arc<AppState>>,
    Path(tracking_number): Path<String>,
) -> ApiResult<ShipmentView> {
    let shipment = state.tracking.get(&tracking_number).await?;
    Ok(ApiResponse::ok(shipment))
}

pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(tracking_number): Path<String>,
    Json(payload): Json<LocationUpdate>,
) -> ApiResult<ShipmentView> {
    let shipment = state
        .tracking
        .update_location(&tracking_number, payload, false)
        .await?;
    Ok(ApiResponse::ok(shipment))
}

pub async fn update_location_manual(
    State(state): State<Arc<AppState>>,
    Path(tracking_number): Path<String>,
    Json(payload): Json<LocationUpdate>,
) -> ApiResult<ShipmentView> {
    let shipment = state
        .tracking
        .update_location(&tracking_number, payload, true)
        .await?;
    Ok(ApiResponse::ok(shipment))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(tracking_number): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> ApiResult<ShipmentView> {
    let shipment = state.tracking.update_status(&tracking_number, payload).await?;
    Ok(ApiResponse::ok(shipment))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(tracking_number): Path<String>,
) -> ApiResult<Vec<HistoryEvent>> {
    let history = state.tracking.history(&tracking_number).await?;
    Ok(ApiResponse::ok(history))
}

pub async fn get_distance(
    State(state): State<Arc<AppState>>,
    Path(tracking_number): Path<String>,
) -> ApiResult<RouteDistance> {
    let distance = state.tracking.distance(&tracking_number).await?;
    Ok(ApiResponse::ok(distance))
}

pub async fn get_eta(
    State(state): State<Arc<AppState>>,
    Path(tracking_number): Path<String>,
) -> ApiResult<Eta> {
    let eta = state.tracking.eta(&tracking_number).await?;
    Ok(ApiResponse::ok(eta))
}

pub async fn add_checkpoint(
    State(state): State<Arc<AppState>>,
    Path(tracking_number): Path<String>,
    Json(payload): Json<NewCheckpoint>,
) -> Result<(StatusCode, Json<ApiResponse<Checkpoint>>), AppError> {
    let checkpoint = state.tracking.add_checkpoint(&tracking_number, payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(checkpoint)))
}

pub async fn update_checkpoint(
    State(state): State<Arc<AppState>>,
    Path((tracking_number, checkpoint_id)): Path<(String, Uuid)>,
    Json(payload): Json<CheckpointPatch>,
) -> ApiResult<Checkpoint> {
    let checkpoint = state
        .tracking
        .update_checkpoint(&tracking_number, checkpoint_id, payload)
        .await?;
    Ok(ApiResponse::ok(checkpoint))
}

pub async fn delete_checkpoint(
    State(state): State<Arc<AppState>>,
    Path((tracking_number, checkpoint_id)): Path<(String, Uuid)>,
) -> ApiResult<Uuid> {
    state
        .tracking
        .delete_checkpoint(&tracking_number, checkpoint_id)
        .await?;
    Ok(ApiResponse::ok(checkpoint_id))
}

fn ensure_seeding_allowed(state: &AppState) -> Result<(), AppError> {
    if state.config.allow_seed {
        return Ok(());
    }
    Err(TrackingError::Forbidden(
        "seeding is disabled; set SHIPTRACK_ALLOW_SEED=true to enable it".to_string(),
    )
    .into())
}

pub async fn seed_shipments(State(state): State<Arc<AppState>>) -> ApiResult<SeedResponse> {
    ensure_seeding_allowed(&state)?;
    let tracking_numbers = state.tracking.seed().await?;
    Ok(ApiResponse::ok(SeedResponse::from(tracking_numbers)))
}

pub async fn seed_indian_shipments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GenerateQuery>,
) -> ApiResult<SeedResponse> {
    ensure_seeding_allowed(&state)?;
    let count = query.count.unwrap_or(DEFAULT_GENERATED_SHIPMENTS);
    let tracking_numbers = state.tracking.seed_generated(count).await?;
    Ok(ApiResponse::ok(SeedResponse::from(tracking_numbers)))
}
