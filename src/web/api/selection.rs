use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::propagation::SatelliteInfo;
use crate::selection::InterestSets;
use crate::session::SessionEvent;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectRequest {
    pub index: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SelectResponse {
    pub index: usize,
    pub satellite: SatelliteInfo,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InterestRequest {
    #[serde(default)]
    pub primary: Vec<String>,
    #[serde(default)]
    pub secondary: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/selection",
    request_body = SelectRequest,
    responses(
        (status = 200, description = "Selection queued for the next tick", body = SelectResponse),
        (status = 404, description = "No satellite at that index", body = ErrorResponse),
        (status = 503, description = "Session stopped", body = ErrorResponse)
    ),
    tag = "selection"
)]
pub async fn select(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<Json<SelectResponse>> {
    let satellite = state
        .satellites
        .get(request.index)
        .cloned()
        .ok_or(ApiError::NotFound("satellite_not_found"))?;

    state.send(SessionEvent::Select(request.index))?;
    Ok(Json(SelectResponse {
        index: request.index,
        satellite,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/selection",
    responses(
        (status = 202, description = "Deselection queued for the next tick"),
        (status = 503, description = "Session stopped", body = ErrorResponse)
    ),
    tag = "selection"
)]
pub async fn deselect(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.send(SessionEvent::Deselect)?;
    Ok(StatusCode::ACCEPTED)
}

#[utoipa::path(
    put,
    path = "/api/interest",
    request_body = InterestRequest,
    responses(
        (status = 202, description = "Interest sets queued for the next tick"),
        (status = 503, description = "Session stopped", body = ErrorResponse)
    ),
    tag = "selection"
)]
pub async fn set_interest(
    State(state): State<AppState>,
    Json(request): Json<InterestRequest>,
) -> ApiResult<StatusCode> {
    let sets = InterestSets::new(request.primary, request.secondary);
    state.send(SessionEvent::SetInterest(sets))?;
    Ok(StatusCode::ACCEPTED)
}
