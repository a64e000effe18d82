use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::render::{CurveHandle, FrameInfo, SceneRenderer};
use crate::scene::{PositionBuffer, SimVector3, TrajectoryCurve, UpdateReport};
use crate::selection::{CurveKey, InterestTier};

pub type SharedFrame = Arc<RwLock<Option<FrameSnapshot>>>;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CurveSnapshot {
    pub handle: CurveHandle,
    pub key: CurveKey,
    pub curve: TrajectoryCurve,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub instant: DateTime<Utc>,
    pub rate: f64,
    pub earth_rotation_rad: f64,
    pub report: UpdateReport,
    /// Slot-indexed positions; `null` until a slot has had a good fix
    pub positions: Vec<Option<SimVector3>>,
    pub stale: Vec<usize>,
    pub tiers: Vec<InterestTier>,
    pub curves: Vec<CurveSnapshot>,
}

pub struct SnapshotRenderer {
    shared: SharedFrame,
    positions: Vec<Option<SimVector3>>,
    stale: Vec<usize>,
    tiers: Vec<InterestTier>,
    curves: BTreeMap<CurveHandle, (CurveKey, TrajectoryCurve)>,
    next_handle: u64,
}

impl SnapshotRenderer {
    pub fn new(shared: SharedFrame) -> Self {
        Self {
            shared,
            positions: Vec::new(),
            stale: Vec::new(),
            tiers: Vec::new(),
            curves: BTreeMap::new(),
            next_handle: 1,
        }
    }

    pub fn shared(&self) -> SharedFrame {
        self.shared.clone()
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    pub fn latest(&self) -> Option<FrameSnapshot> {
        self.shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SceneRenderer for SnapshotRenderer {
    fn update_instances(&mut self, buffer: &PositionBuffer) {
        self.positions.clear();
        self.positions
            .extend((0..buffer.len()).map(|index| buffer.get(index)));
        self.stale.clear();
        self.stale
            .extend((0..buffer.len()).filter(|&index| buffer.is_stale(index)));
    }

    fn update_tiers(&mut self, tiers: &[InterestTier]) {
        self.tiers = tiers.to_vec();
    }

    fn create_curve(&mut self, key: CurveKey, curve: &TrajectoryCurve) -> CurveHandle {
        let handle = CurveHandle(self.next_handle);
        self.next_handle += 1;
        self.curves.insert(handle, (key, curve.clone()));
        handle
    }

    fn dispose_curve(&mut self, handle: CurveHandle) {
        if self.curves.remove(&handle).is_none() {
            log::warn!("Disposing unknown curve {:?}", handle);
        }
    }

    fn present(&mut self, frame: &FrameInfo) {
        let snapshot = FrameSnapshot {
            tick: frame.tick,
            instant: frame.instant,
            rate: frame.rate,
            earth_rotation_rad: frame.earth_rotation_rad,
            report: frame.report,
            positions: self.positions.clone(),
            stale: self.stale.clone(),
            tiers: self.tiers.clone(),
            curves: self
                .curves
                .iter()
                .map(|(handle, (key, curve))| CurveSnapshot {
                    handle: *handle,
                    key: *key,
                    curve: curve.clone(),
                })
                .collect(),
        };

        *self.shared.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }
}
