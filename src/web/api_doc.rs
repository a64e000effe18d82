use utoipa::OpenApi;

use super::api::clock::{ClockStatus, RateRequest, ScrubRequest};
use super::api::error::ErrorResponse;
use super::api::frame::SatelliteEntry;
use super::api::selection::{InterestRequest, SelectRequest, SelectResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::frame::list_satellites,
        super::api::frame::latest_frame,
        super::api::clock::status,
        super::api::clock::set_rate,
        super::api::clock::scrub,
        super::api::selection::select,
        super::api::selection::deselect,
        super::api::selection::set_interest,
    ),
    components(
        schemas(
            SatelliteEntry,
            ClockStatus,
            RateRequest,
            ScrubRequest,
            SelectRequest,
            SelectResponse,
            InterestRequest,
            ErrorResponse,
            crate::render::FrameSnapshot,
            crate::render::CurveSnapshot,
            crate::render::CurveHandle,
            crate::selection::CurveKey,
            crate::selection::InterestTier,
            crate::scene::SimVector3,
            crate::scene::TrajectoryCurve,
            crate::scene::UpdateReport,
            crate::propagation::SatelliteInfo,
        )
    ),
    info(
        title = "Sat-O-View Scene API",
        description = "Live satellite scene: positions, trajectories, playback clock and selection",
        version = "0.1.0"
    ),
    tags(
        (name = "scene", description = "Tracked satellites and rendered frames"),
        (name = "clock", description = "Simulation clock control"),
        (name = "selection", description = "Selection and interest highlighting")
    )
)]
pub struct ApiDoc;
