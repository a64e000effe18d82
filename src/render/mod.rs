mod snapshot;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::scene::{PositionBuffer, TrajectoryCurve, UpdateReport};
use crate::selection::{CurveKey, InterestTier};

pub use snapshot::{CurveSnapshot, FrameSnapshot, SharedFrame, SnapshotRenderer};

/// Opaque id of line geometry owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
pub struct CurveHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameInfo {
    pub tick: u64,
    pub instant: DateTime<Utc>,
    pub rate: f64,
    pub earth_rotation_rad: f64,
    pub report: UpdateReport,
}

pub trait SceneRenderer {
    fn update_instances(&mut self, buffer: &PositionBuffer);

    fn update_tiers(&mut self, tiers: &[InterestTier]);

    /// Build line geometry for a non-empty curve.
    fn create_curve(&mut self, key: CurveKey, curve: &TrajectoryCurve) -> CurveHandle;

    fn dispose_curve(&mut self, handle: CurveHandle);

    fn present(&mut self, frame: &FrameInfo);
}
