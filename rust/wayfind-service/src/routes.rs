use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info, info_span};

use wayfind_core::policy::{compose, Composition};
use wayfind_core::{GraphCache, PathFinder, Place, RouteRequest};

use crate::db::CampusDb;
use crate::errors::AppError;
use crate::models::{ComputeRouteRequest, ComputeRouteResponse, RouteDto};
use crate::store::{Retrieval, RouteStore};

#[derive(Clone)]
pub struct AppState {
    pub db_path: PathBuf,
    pub store: Arc<RouteStore>,
    pub cache: Option<Arc<GraphCache>>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/version", get(version))
        .route("/routes", post(compute_route))
        .route("/routes/:id", get(get_route))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match CampusDb::open_read_only(&state.db_path).and_then(|db| db.data_version()) {
        Ok(_) => (StatusCode::OK, Json(json!({"ready": true}))).into_response(),
        Err(e) => {
            error!(error = %e, "readyz failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"ready": false, "error": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn version() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "service_version": env!("CARGO_PKG_VERSION"),
            "core_version": wayfind_core::version(),
        })),
    )
}

async fn compute_route(
    State(state): State<AppState>,
    Json(req): Json<ComputeRouteRequest>,
) -> Result<Json<ComputeRouteResponse>, AppError> {
    let span = info_span!("compute_route", start = %req.start_id, end = %req.end_id);
    let _enter = span.enter();

    let db = CampusDb::open_read_only(&state.db_path)?;
    let start = resolve_place(&db, &req.start_id)?;
    let end = resolve_place(&db, &req.end_id)?;
    let waypoints = req
        .waypoint_ids
        .iter()
        .map(|id| resolve_place(&db, id))
        .collect::<Result<Vec<_>, _>>()?;

    let places = db.list_places()?;
    let networks = db.load_networks()?;
    let options = req.options.clone().unwrap_or_default();
    let finder = match state.cache.as_deref() {
        Some(cache) => PathFinder::with_cache(&options, cache, db.data_version()?),
        None => PathFinder::new(&options),
    };

    let request = RouteRequest {
        start,
        end,
        mode: req.mode,
        vehicle: req.vehicle,
        waypoints,
    };
    let route = match compose(&request, &networks, &places, &finder)? {
        Composition::Complete(route) => route,
        Composition::AwaitingParkingSelection(pending) => match &req.parking_id {
            Some(id) => {
                let parking = resolve_place(&db, id)?;
                pending.resume(&parking, &networks, &places, &finder)?
            }
            None => {
                info!(vehicle = %pending.required_vehicle, "parking selection required");
                return Ok(Json(ComputeRouteResponse::AwaitingParkingSelection {
                    required_vehicle: pending.required_vehicle,
                    message: format!(
                        "select a {} parking area to start from",
                        pending.required_vehicle
                    ),
                }));
            }
        },
    };

    let id = state.store.insert(route.clone());
    info!(
        route = %id,
        phases = route.phases.len(),
        distance_m = route.distance_m,
        "route stored"
    );
    Ok(Json(ComputeRouteResponse::Complete {
        id,
        route: RouteDto::from(&route),
    }))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RouteDto>, AppError> {
    match state.store.get(&id) {
        Retrieval::Found(route) => Ok(Json(RouteDto::from(&route))),
        Retrieval::Expired => Err(AppError::Expired),
        Retrieval::Missing => Err(AppError::NotFound),
    }
}

fn resolve_place(db: &CampusDb, id: &str) -> Result<Place, AppError> {
    db.get_place(id)?
        .ok_or_else(|| AppError::BadRequest(format!("unknown place: {id}")))
}
