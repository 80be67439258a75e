//! HTTP routes: snapshot endpoints, vehicle CRUD, users, dashboard.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router, middleware};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use tracking::broadcast::LocationBroadcast;
use tracking::error::{Error, HttpError};
use tracking::model::{User, Vehicle, VehicleKind};
use tracking::snapshot::{DashboardStats, SnapshotService};
use tracking::store::{UserStore, VehicleStore};

use crate::config::HttpConfig;
use crate::store::MemoryStore;
use crate::ws;

/// Shared state handed to every handler and to viewer sessions.
#[derive(Clone)]
pub struct AppState {
    pub store: MemoryStore,
    pub broadcast: LocationBroadcast,
    pub snapshot: SnapshotService<MemoryStore>,
    /// Origins allowed to open viewer connections. Empty means any; filled
    /// in by [`router`] from the edge config.
    pub allowed_origins: Arc<Vec<String>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: MemoryStore, broadcast: LocationBroadcast, active_window: Duration) -> Self {
        let snapshot = SnapshotService::new(store.clone(), active_window);
        Self { store, broadcast, snapshot, allowed_origins: Arc::new(Vec::new()) }
    }
}

/// Builds the application router with CORS restricted to the configured
/// origins (any origin when the list is empty, for local development).
/// The same list gates the `/ws` handshake, where CORS headers alone
/// restrict nothing.
pub fn router(state: AppState, config: &HttpConfig) -> Router {
    let state =
        AppState { allowed_origins: Arc::new(config.allowed_origins.clone()), ..state };
    Router::new()
        .route("/", get(root))
        .route(
            "/ws",
            get(ws::ws_handler)
                .layer(middleware::from_fn_with_state(state.clone(), ws::require_allowed_origin)),
        )
        .route("/api/vehicles/active", get(active_vehicles))
        .route("/api/vehicles/add", post(add_vehicle))
        .route("/api/vehicles/track/{vehicle_id}", get(track_vehicle))
        .route("/api/vehicles/{owner_id}", get(vehicles_by_owner))
        .route("/api/vehicles/{owner_id}/{vehicle_id}", delete(delete_vehicle))
        .route("/api/users", get(users))
        .route("/api/dashboard/stats", get(dashboard_stats))
        .layer(cors_layer(config))
        .with_state(state)
}

fn cors_layer(config: &HttpConfig) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE];
    let headers = [header::CONTENT_TYPE, header::AUTHORIZATION];

    if config.allowed_origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(methods).allow_headers(headers);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(origin = %origin, error = %err, "ignoring unparseable origin");
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(origins).allow_methods(methods).allow_headers(headers)
}

async fn root() -> &'static str {
    "Real-Time Vehicle Tracking API Running"
}

/// Envelope for `GET /api/vehicles/active`. One canonical shape; the
/// bare-array variant some clients tolerated is deliberately not produced.
#[derive(Debug, Serialize, Deserialize)]
pub struct VehiclesReply {
    pub vehicles: Vec<Vehicle>,
}

#[axum::debug_handler]
async fn active_vehicles(State(state): State<AppState>) -> Result<Json<VehiclesReply>, HttpError> {
    let vehicles = state.snapshot.active_vehicles().await.map_err(HttpError::from)?;
    Ok(Json(VehiclesReply { vehicles }))
}

#[axum::debug_handler]
async fn vehicles_by_owner(
    State(state): State<AppState>, Path(owner_id): Path<String>,
) -> Result<Json<Vec<Vehicle>>, HttpError> {
    let vehicles = state.snapshot.vehicles_for_owner(&owner_id).await.map_err(HttpError::from)?;
    Ok(Json(vehicles))
}

/// Reply for `GET /api/vehicles/track/{vehicleId}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrackReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[axum::debug_handler]
async fn track_vehicle(
    State(state): State<AppState>, Path(vehicle_id): Path<String>,
) -> impl IntoResponse {
    match state.snapshot.vehicle_by_id(&vehicle_id).await {
        Ok(vehicle) => (
            StatusCode::OK,
            Json(TrackReply { success: true, vehicle: Some(vehicle), message: None }),
        ),
        Err(Error::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(TrackReply {
                success: false,
                vehicle: None,
                message: Some("Vehicle not found".to_string()),
            }),
        ),
        Err(err) => (
            err.code(),
            Json(TrackReply {
                success: false,
                vehicle: None,
                message: Some("Server error".to_string()),
            }),
        ),
    }
}

/// Payload for `POST /api/vehicles/add`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVehicleRequest {
    pub vehicle_id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: VehicleKind,
    pub lat: f64,
    pub lng: f64,
    pub owner_id: String,
}

#[axum::debug_handler]
async fn add_vehicle(
    State(state): State<AppState>, Json(request): Json<AddVehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), HttpError> {
    if request.vehicle_id.is_empty() || request.name.is_empty() || request.owner_id.is_empty() {
        return Err(Error::BadRequest("All fields are required".to_string()).into());
    }
    if !request.lat.is_finite() || !request.lng.is_finite() {
        return Err(Error::BadRequest("Coordinates must be finite".to_string()).into());
    }

    let vehicle = Vehicle::register(
        request.vehicle_id,
        request.name,
        request.kind,
        request.lat,
        request.lng,
        request.owner_id,
    );

    // Duplicate ids are the only insert failure the process-local store
    // produces.
    if let Err(err) = state.store.insert(vehicle.clone()).await {
        return Err(Error::BadRequest(err.to_string()).into());
    }

    // Display metadata only; ownership is computed from the vehicle record.
    if let Err(err) = state.store.record_vehicle_name(&vehicle.owner_id, &vehicle.name).await {
        warn!(owner = %vehicle.owner_id, error = %err, "failed to record vehicle name");
    }

    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// Reply for `DELETE /api/vehicles/{ownerId}/{vehicleId}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageReply {
    pub message: String,
}

#[axum::debug_handler]
async fn delete_vehicle(
    State(state): State<AppState>, Path((owner_id, vehicle_id)): Path<(String, String)>,
) -> Result<Json<MessageReply>, HttpError> {
    let removed = state
        .store
        .remove(&owner_id, &vehicle_id)
        .await
        .map_err(|err| HttpError::from(Error::StoreError(err.to_string())))?;

    if removed.is_none() {
        return Err(Error::NotFound("Vehicle not found".to_string()).into());
    }

    Ok(Json(MessageReply { message: "Vehicle deleted successfully".to_string() }))
}

#[axum::debug_handler]
async fn users(State(state): State<AppState>) -> Result<Json<Vec<User>>, HttpError> {
    let users = UserStore::list(&state.store)
        .await
        .map_err(|err| HttpError::from(Error::StoreError(err.to_string())))?;
    Ok(Json(users))
}

#[axum::debug_handler]
async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, HttpError> {
    let stats = state.snapshot.stats(&state.store).await.map_err(HttpError::from)?;
    Ok(Json(stats))
}
