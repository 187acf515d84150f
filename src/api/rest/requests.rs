use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::filter::RequestFilter;
use crate::engine::transition::ConfirmOutcome;
use crate::error::AppError;
use crate::models::event::RequestEvent;
use crate::models::request::RequestRecord;
use crate::projection::list::ListView;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/requests", get(list_requests))
        .route("/requests/filter", put(update_filter))
        .route("/requests/refresh", post(refresh_requests))
        .route("/requests/:id", get(get_request))
        .route("/requests/:id/confirm", post(confirm_request))
}

#[derive(Deserialize)]
pub struct RefreshParams {
    pub count: Option<usize>,
}

#[derive(Serialize)]
pub struct ConfirmResponse {
    pub outcome: ConfirmOutcome,
    pub request: Option<RequestRecord>,
}

async fn list_requests(State(state): State<Arc<AppState>>) -> Json<ListView> {
    let screen = state.screen.read().await;
    Json(screen.list_view(state.display_offset))
}

async fn update_filter(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<RequestFilter>,
) -> Json<ListView> {
    let mut screen = state.screen.write().await;
    let next = screen.filtered_by(filter);
    state.commit(&mut screen, next);

    let view = screen.list_view(state.display_offset);
    debug!(
        query = %screen.filter.query,
        unconfirmed_only = screen.filter.unconfirmed_only,
        visible = view.visible,
        "filter updated"
    );
    Json(view)
}

async fn refresh_requests(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RefreshParams>,
) -> Result<Json<ListView>, AppError> {
    let count = params.count.unwrap_or(state.default_request_count);
    let requests = state.generate(count)?;

    let mut screen = state.screen.write().await;
    let next = screen.refreshed(requests);
    state.commit(&mut screen, next);
    let view = screen.list_view(state.display_offset);
    drop(screen);

    state.publish(RequestEvent::Refreshed { count });
    info!(count, "requests refreshed");

    Ok(Json(view))
}

async fn get_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RequestRecord>, AppError> {
    let screen = state.screen.read().await;
    let request = screen
        .find(&id)
        .ok_or_else(|| AppError::NotFound(format!("request {id} not found")))?;

    Ok(Json(request.clone()))
}

async fn confirm_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<ConfirmResponse> {
    let mut screen = state.screen.write().await;
    let (next, outcome) = screen.confirmed(&id);
    state.commit(&mut screen, next);
    let request = screen.find(&id).cloned();
    drop(screen);

    state.metrics.record_confirm(&outcome);
    state.publish(RequestEvent::ConfirmAttempted {
        request_id: id.clone(),
        outcome,
        request: request.clone(),
    });
    info!(request_id = %id, outcome = outcome.label(), "confirm requested");

    Json(ConfirmResponse { outcome, request })
}
