use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::services::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "store": "memory",
        "shipments": state.tracking.count().await
    }))
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Shipment Tracker API is running",
        "endpoints": {
            "health": "/health",
            "api": "/api/shipments"
        }
    }))
}
