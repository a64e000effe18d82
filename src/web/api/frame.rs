use std::sync::PoisonError;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::propagation::SatelliteInfo;
use crate::render::FrameSnapshot;
use crate::selection::InterestTier;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SatelliteEntry {
    /// Stable buffer index, used for selection
    pub index: usize,
    pub tier: InterestTier,
    pub info: SatelliteInfo,
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    responses(
        (status = 200, description = "Tracked satellites in buffer order", body = Vec<SatelliteEntry>)
    ),
    tag = "scene"
)]
pub async fn list_satellites(State(state): State<AppState>) -> Json<Vec<SatelliteEntry>> {
    let tiers = state
        .frame
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|frame| frame.tiers.clone())
        .unwrap_or_default();

    let entries = state
        .satellites
        .iter()
        .enumerate()
        .map(|(index, info)| SatelliteEntry {
            index,
            tier: tiers.get(index).copied().unwrap_or_default(),
            info: info.clone(),
        })
        .collect();

    Json(entries)
}

#[utoipa::path(
    get,
    path = "/api/frame",
    responses(
        (status = 200, description = "Last presented frame", body = FrameSnapshot),
        (status = 503, description = "No frame presented yet", body = ErrorResponse)
    ),
    tag = "scene"
)]
pub async fn latest_frame(State(state): State<AppState>) -> ApiResult<Json<FrameSnapshot>> {
    Ok(Json(state.latest_frame()?))
}
