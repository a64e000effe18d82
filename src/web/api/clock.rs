use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::clock;
use crate::session::SessionEvent;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ClockStatus {
    pub tick: u64,
    pub instant: DateTime<Utc>,
    pub rate: f64,
    pub earth_rotation_rad: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateRequest {
    /// Simulation seconds per real second
    pub rate: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScrubRequest {
    pub instant: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/clock",
    responses(
        (status = 200, description = "Clock as of the last frame", body = ClockStatus),
        (status = 503, description = "No frame presented yet", body = ErrorResponse)
    ),
    tag = "clock"
)]
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<ClockStatus>> {
    let frame = state.latest_frame()?;
    Ok(Json(ClockStatus {
        tick: frame.tick,
        instant: frame.instant,
        rate: frame.rate,
        earth_rotation_rad: frame.earth_rotation_rad,
    }))
}

#[utoipa::path(
    post,
    path = "/api/clock/rate",
    request_body = RateRequest,
    responses(
        (status = 202, description = "Rate change queued for the next tick"),
        (status = 400, description = "Rate is not a positive number", body = ErrorResponse),
        (status = 503, description = "Session stopped", body = ErrorResponse)
    ),
    tag = "clock"
)]
pub async fn set_rate(
    State(state): State<AppState>,
    Json(request): Json<RateRequest>,
) -> ApiResult<StatusCode> {
    let rate = clock::validate_rate(request.rate)?;
    state.send(SessionEvent::SetRate(rate))?;
    Ok(StatusCode::ACCEPTED)
}

#[utoipa::path(
    post,
    path = "/api/clock/scrub",
    request_body = ScrubRequest,
    responses(
        (status = 202, description = "Scrub queued for the next tick"),
        (status = 503, description = "Session stopped", body = ErrorResponse)
    ),
    tag = "clock"
)]
pub async fn scrub(
    State(state): State<AppState>,
    Json(request): Json<ScrubRequest>,
) -> ApiResult<StatusCode> {
    state.send(SessionEvent::Scrub(request.instant))?;
    Ok(StatusCode::ACCEPTED)
}
