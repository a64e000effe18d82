#![allow(dead_code)]

use std::collections::BTreeSet;

use sat_o_view::render::{CurveHandle, FrameInfo, SceneRenderer};
use sat_o_view::scene::{PositionBuffer, SimVector3, TrajectoryCurve};
use sat_o_view::selection::{CurveKey, InterestTier};

/// Two satellites sharing one orbital plane and period, half an orbit apart.
pub const COLLISION_PAIR: &str = "\
0 ALPHA
1 90001U 24001A   24001.50000000  .00000000  00000-0  00000-0 0  9999
2 90001  53.0000 120.0000 0001000   0.0000   0.0000 15.05000000    16
0 BRAVO
1 90002U 24001A   24001.50000000  .00000000  00000-0  00000-0 0  9990
2 90002  53.0000 120.0000 0001000   0.0000 180.0000 15.05000000    16
";

pub const ISS: &str = "\
ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
";

/// Last digit of line 1 changed, so the checksum no longer matches.
pub const CORRUPTED: &str = "\
BROKEN
1 90001U 24001A   24001.50000000  .00000000  00000-0  00000-0 0  9998
2 90001  53.0000 120.0000 0001000   0.0000   0.0000 15.05000000    16
";

/// Renderer double that records what the core asked of it.
#[derive(Default)]
pub struct MockRenderer {
    next: u64,
    pub live: BTreeSet<CurveHandle>,
    pub created: Vec<(CurveHandle, CurveKey, usize)>,
    pub disposed: Vec<CurveHandle>,
    pub positions: Vec<Option<SimVector3>>,
    pub tiers: Vec<InterestTier>,
    pub frames: Vec<FrameInfo>,
}

impl MockRenderer {
    pub fn curve_for(&self, key: CurveKey) -> Option<(CurveHandle, usize)> {
        self.created
            .iter()
            .rev()
            .find(|(handle, k, _)| *k == key && self.live.contains(handle))
            .map(|(handle, _, satellite)| (*handle, *satellite))
    }
}

impl SceneRenderer for MockRenderer {
    fn update_instances(&mut self, buffer: &PositionBuffer) {
        self.positions = (0..buffer.len()).map(|i| buffer.get(i)).collect();
    }

    fn update_tiers(&mut self, tiers: &[InterestTier]) {
        self.tiers = tiers.to_vec();
    }

    fn create_curve(&mut self, key: CurveKey, curve: &TrajectoryCurve) -> CurveHandle {
        assert!(!curve.is_empty(), "empty curves must not reach the renderer");
        self.next += 1;
        let handle = CurveHandle(self.next);
        self.live.insert(handle);
        self.created.push((handle, key, curve.satellite));
        handle
    }

    fn dispose_curve(&mut self, handle: CurveHandle) {
        assert!(self.live.remove(&handle), "unknown or repeated dispose");
        self.disposed.push(handle);
    }

    fn present(&mut self, frame: &FrameInfo) {
        self.frames.push(*frame);
    }
}
