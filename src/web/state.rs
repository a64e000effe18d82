use std::sync::{Arc, PoisonError};

use tokio::sync::mpsc::UnboundedSender;

use crate::propagation::SatelliteInfo;
use crate::render::{FrameSnapshot, SharedFrame};
use crate::session::SessionEvent;
use crate::web::api::error::{ApiError, ApiResult};

/// Handlers never touch the session. They queue events for the tick task
/// and read the last frame it published.
#[derive(Clone)]
pub struct AppState {
    pub events: UnboundedSender<SessionEvent>,
    pub frame: SharedFrame,
    pub satellites: Arc<Vec<SatelliteInfo>>,
}

impl AppState {
    pub fn send(&self, event: SessionEvent) -> ApiResult<()> {
        self.events
            .send(event)
            .map_err(|_| ApiError::Unavailable("session_stopped"))
    }

    pub fn latest_frame(&self) -> ApiResult<FrameSnapshot> {
        self.frame
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ApiError::Unavailable("no_frame_yet"))
    }
}
