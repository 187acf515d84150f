use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::{get, put};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::event::RequestEvent;
use crate::models::location::{DeviceLocation, GeoPoint};
use crate::projection::map::MapView;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/map", get(get_map))
        .route("/map/selection", put(select_request).delete(clear_selection))
        .route("/location", put(update_location))
        .route("/location/error", put(report_location_error))
}

#[derive(Deserialize)]
pub struct SelectRequest {
    pub id: String,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
}

#[derive(Deserialize)]
pub struct LocationErrorRequest {
    pub message: String,
}

async fn get_map(State(state): State<Arc<AppState>>) -> Json<MapView> {
    let screen = state.screen.read().await;
    Json(screen.map_view(state.display_offset))
}

async fn select_request(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectRequest>,
) -> Result<Json<MapView>, AppError> {
    let mut screen = state.screen.write().await;
    let next = screen.selecting(&payload.id)?;
    state.commit(&mut screen, next);
    let view = screen.map_view(state.display_offset);
    drop(screen);

    state.publish(RequestEvent::SelectionChanged {
        request_id: Some(payload.id.clone()),
    });
    info!(request_id = %payload.id, "request selected on map");

    Ok(Json(view))
}

async fn clear_selection(State(state): State<Arc<AppState>>) -> Json<MapView> {
    let mut screen = state.screen.write().await;
    let next = screen.deselected();
    state.commit(&mut screen, next);
    let view = screen.map_view(state.display_offset);
    drop(screen);

    state.publish(RequestEvent::SelectionChanged { request_id: None });
    Json(view)
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<MapView>, AppError> {
    if !payload.latitude.is_finite() || !payload.longitude.is_finite() {
        return Err(AppError::BadRequest(
            "latitude and longitude must be finite".to_string(),
        ));
    }

    if payload.accuracy.is_some_and(|accuracy| !accuracy.is_finite() || accuracy < 0.0) {
        return Err(AppError::BadRequest(
            "accuracy must be a non-negative number".to_string(),
        ));
    }

    let location = DeviceLocation {
        point: GeoPoint::new(payload.latitude, payload.longitude),
        accuracy_m: payload.accuracy,
        recorded_at: Utc::now(),
    };

    let mut screen = state.screen.write().await;
    let next = screen.located(location.clone());
    state.commit(&mut screen, next);
    let view = screen.map_view(state.display_offset);
    drop(screen);

    debug!(
        latitude = location.point.latitude,
        longitude = location.point.longitude,
        "device location updated"
    );
    state.publish(RequestEvent::LocationUpdated { location });

    Ok(Json(view))
}

async fn report_location_error(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LocationErrorRequest>,
) -> Result<Json<MapView>, AppError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message cannot be empty".to_string()));
    }

    let mut screen = state.screen.write().await;
    let next = screen.location_failed(message);
    state.commit(&mut screen, next);
    let view = screen.map_view(state.display_offset);
    drop(screen);

    warn!(reason = %message, "device location unavailable");
    state.publish(RequestEvent::LocationFailed {
        message: message.to_string(),
    });

    Ok(Json(view))
}
