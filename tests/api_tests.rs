//! Tests for the HTTP API, driven through the router without a socket.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use shiptrack::app::create_router;
use shiptrack::config::Config;
use shiptrack::repository::{InMemoryShipmentStore, ShipmentStore};
use shiptrack::seed::sample_shipments;
use shiptrack::services::AppState;

fn app_with(config: Config) -> Router {
    create_router(Arc::new(AppState::new(config)))
}

fn app() -> Router {
    app_with(Config::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn shipment_payload() -> Value {
    json!({
        "origin": { "coordinates": [0.0, 0.5], "address": "Origin depot" },
        "destination": { "coordinates": [0.0, 1.5], "address": "Destination depot" },
        "checkpoints": [
            {
                "name": "Midway",
                "location": { "coordinates": [0.0, 1.0], "address": "Midway hub" },
                "estimatedArrival": "2024-06-01T12:00:00Z"
            }
        ],
        "customer": { "name": "Dana Lee", "email": "dana@example.com", "phone": "+1 555-0100" },
        "items": [
            {
                "description": "Books",
                "quantity": 2,
                "weight": 1.5,
                "dimensions": { "length": 30.0, "width": 20.0, "height": 10.0 }
            }
        ]
    })
}

async fn create(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/api/shipments", Some(shipment_payload())).await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    body["data"]["trackingNumber"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_returns_shipment_with_progress() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/shipments", Some(shipment_payload())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["progress"], 0);
    assert_eq!(body["data"]["currentLocation"]["coordinates"], json!([0.0, 0.5]));
    assert_eq!(body["data"]["checkpoints"][0]["reached"], false);
}

#[tokio::test]
async fn create_rejects_out_of_range_coordinates() {
    let app = app();
    let mut payload = shipment_payload();
    payload["destination"]["coordinates"] = json!([200.0, 10.0]);

    let (status, body) = send(&app, Method::POST, "/api/shipments", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("longitude"));
}

#[tokio::test]
async fn distance_endpoint_reports_rounded_breakdown() {
    let app = app();
    let tn = create(&app).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/shipments/{}/location", tn),
        Some(json!({ "coordinates": [0.0, 1.0], "address": "Midway hub", "status": "in_transit" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["progress"], 50);

    let (status, body) = send(&app, Method::GET, &format!("/api/shipments/{}/distance", tn), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalDistance"], 111.19);
    assert_eq!(body["data"]["distanceTraveled"], 55.6);
    assert_eq!(body["data"]["remainingDistance"], 55.6);
    assert_eq!(body["data"]["unit"], "km");
}

#[tokio::test]
async fn distance_without_current_location_is_unprocessable() {
    let store = Arc::new(InMemoryShipmentStore::new());
    let mut shipment = sample_shipments(Utc::now()).remove(1);
    shipment.current_location = None;
    let tn = shipment.tracking_number.clone();
    store.insert(shipment).await.unwrap();
    let app = create_router(Arc::new(AppState::with_store(Config::default(), store)));

    let (status, body) = send(&app, Method::GET, &format!("/api/shipments/{}/distance", tn), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("current location"));

    // progress stays lenient for the same record
    let (status, body) = send(&app, Method::GET, &format!("/api/shipments/{}", tn), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["progress"], 0);
}

#[tokio::test]
async fn unknown_shipment_is_not_found() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/shipments/TRKNOPE00000/distance", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn delivered_status_forces_full_progress_and_is_terminal() {
    let app = app();
    let tn = create(&app).await;
    let uri = format!("/api/shipments/{}/status", tn);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "delivered" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["progress"], 100);

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "in_transit" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::GET, &format!("/api/shipments/{}/eta", tn), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["delivered"], true);
    assert_eq!(body["data"]["remainingDistance"], 0.0);
}

#[tokio::test]
async fn history_grows_with_each_update() {
    let app = app();
    let tn = create(&app).await;

    send(
        &app,
        Method::PATCH,
        &format!("/api/shipments/{}/status", tn),
        Some(json!({ "status": "in_transit", "description": "Picked up by courier" })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, &format!("/api/shipments/{}/history", tn), None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body["data"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["status"], "in_transit");
    assert_eq!(events[1]["description"], "Picked up by courier");
}

#[tokio::test]
async fn manual_location_requires_valid_coordinates() {
    let app = app();
    let tn = create(&app).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/shipments/{}/location/manual", tn),
        Some(json!({ "coordinates": [10.0, 95.0], "address": "Somewhere" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("latitude"));
}

#[tokio::test]
async fn checkpoint_lifecycle() {
    let app = app();
    let tn = create(&app).await;
    let base = format!("/api/shipments/{}/checkpoints", tn);

    let (status, body) = send(
        &app,
        Method::POST,
        &base,
        Some(json!({
            "name": "Late hub",
            "location": { "coordinates": [0.1, 1.4], "address": "Late hub" },
            "notes": "dock 4"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("{}/{}", base, id),
        Some(json!({ "reached": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reached"], true);
    assert_eq!(body["data"]["notes"], "dock 4");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("{}/{}", base, id),
        Some(json!({ "notes": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notes"], Value::Null);
    assert_eq!(body["data"]["reached"], true);

    let (status, _) = send(&app, Method::DELETE, &format!("{}/{}", base, id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &format!("{}/{}", base, id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, &format!("/api/shipments/{}", tn), None).await;
    assert_eq!(body["data"]["checkpoints"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn seeding_is_disabled_by_default() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/api/shipments/seed", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn seeded_shipments_can_be_filtered() {
    let app = app_with(Config {
        allow_seed: true,
        ..Config::default()
    });
    let (status, body) = send(&app, Method::POST, "/api/shipments/seed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 3);

    let (status, body) = send(&app, Method::GET, "/api/shipments?status=delivered", None).await;
    assert_eq!(status, StatusCode::OK);
    let shipments = body["data"].as_array().unwrap();
    assert_eq!(shipments.len(), 1);
    assert_eq!(shipments[0]["progress"], 100);

    let (_, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["shipments"], 3);
}

#[tokio::test]
async fn generated_seed_honours_count() {
    let app = app_with(Config {
        allow_seed: true,
        ..Config::default()
    });

    let (status, body) = send(&app, Method::POST, "/api/shipments/seed/india?count=7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 7);
    assert_eq!(body["data"]["trackingNumbers"].as_array().unwrap().len(), 7);

    let (status, body) = send(&app, Method::GET, "/api/shipments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 7);

    let (status, body) = send(&app, Method::POST, "/api/shipments/seed/india", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 15);
}

#[tokio::test]
async fn generated_seed_rejects_excessive_count() {
    let app = app_with(Config {
        allow_seed: true,
        ..Config::default()
    });

    let (status, _) = send(&app, Method::POST, "/api/shipments/seed/india?count=500", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::POST, "/api/shipments/seed/india?count=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generated_seed_is_gated() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/api/shipments/seed/india?count=3", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn legacy_prefix_redirects_to_api() {
    let app = app();
    let request = Request::builder()
        .uri("/shipments/TRK123456789/distance")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/shipments/TRK123456789/distance"
    );
}

#[tokio::test]
async fn unknown_route_is_reported() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Can't find /api/nothing-here on this server!");
}
