use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::entity::{Barber, ResolvedEntity};
use crate::location::{GazetteerEntry, MatchRule};
use crate::locator::{LocateOutcome, ViewMode};
use crate::position::PositionState;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /api/resolve ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_coords: String,
    pub rule: MatchRule,
    pub matched: String,
}

pub(super) async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let start = Instant::now();

    // Only blank-ness is checked on a trimmed copy; the resolver sees the
    // string as sent, since matching is case- and substring-sensitive.
    let query = params.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'query' parameter"));
    }

    let resolution = {
        let mut cache = state.cache.lock().map_err(|_| {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "resolution cache poisoned")
        })?;
        cache.resolve(state.locator.resolver(), &query)
    };

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    let Some(resolution) = resolution else {
        info!(query = %query, elapsed_ms, "GET /api/resolve -> unresolved");
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Location not resolved: '{}'", query),
        ));
    };
    info!(query = %query, matched = %resolution.matched, elapsed_ms, "GET /api/resolve");

    Ok(Json(ResolveResponse {
        latitude: resolution.point.latitude,
        longitude: resolution.point.longitude,
        formatted_coords: resolution.point.to_string(),
        rule: resolution.rule,
        matched: resolution.matched,
        query,
    }))
}

// ─── POST /api/nearby ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    pub barbers: Vec<Barber>,
    #[serde(default)]
    pub position: PositionState,
    pub radius: Option<f64>,
    #[serde(default)]
    pub mode: ViewMode,
}

pub(super) async fn nearby(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NearbyRequest>,
) -> Result<Json<LocateOutcome<Barber>>, ApiError> {
    let start = Instant::now();

    let radius = req.radius.unwrap_or(state.config.default_radius_miles);
    if !state.config.radius_options.contains(&radius) {
        // Any radius is accepted; off-menu values are only worth a note.
        warn!(radius, "radius is not one of the configured options");
    }

    let resolved: Vec<ResolvedEntity<Barber>> = {
        let mut cache = state.cache.lock().map_err(|_| {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "resolution cache poisoned")
        })?;
        req.barbers
            .into_iter()
            .map(|b| {
                let coordinates = cache
                    .resolve(state.locator.resolver(), &b.location)
                    .map(|r| r.point);
                ResolvedEntity::new(b, coordinates)
            })
            .collect()
    };

    let outcome = state
        .locator
        .locate_resolved(resolved, &req.position, req.mode, radius);

    info!(
        mode = ?req.mode,
        radius,
        returned = outcome.entities.len(),
        unresolved = outcome.unresolved.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "POST /api/nearby"
    );

    Ok(Json(outcome))
}

// ─── GET /api/gazetteer ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GazetteerResponse {
    pub cities: Vec<GazetteerEntry>,
    pub states: Vec<GazetteerEntry>,
}

pub(super) async fn gazetteer(State(state): State<Arc<AppState>>) -> Json<GazetteerResponse> {
    let g = state.locator.resolver().gazetteer();
    Json(GazetteerResponse {
        cities: g.cities().to_vec(),
        states: g.states().to_vec(),
    })
}

// ─── GET /api/radii ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RadiiResponse {
    pub options: Vec<f64>,
    pub default: f64,
}

pub(super) async fn radii(State(state): State<Arc<AppState>>) -> Json<RadiiResponse> {
    Json(RadiiResponse {
        options: state.config.radius_options.clone(),
        default: state.config.default_radius_miles,
    })
}
