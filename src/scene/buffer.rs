use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::propagation::{propagate, Satellite};
use crate::scene::transform::{to_scene_space, SimVector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct UpdateReport {
    pub updated: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct PositionBuffer {
    positions: Vec<SimVector3>,
    fixed: Vec<bool>,
    stale: Vec<bool>,
}

impl PositionBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![SimVector3::ORIGIN; len],
            fixed: vec![false; len],
            stale: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[SimVector3] {
        &self.positions
    }

    pub fn get(&self, index: usize) -> Option<SimVector3> {
        match self.fixed.get(index) {
            Some(true) => Some(self.positions[index]),
            _ => None,
        }
    }

    pub fn has_fix(&self, index: usize) -> bool {
        self.fixed.get(index).copied().unwrap_or(false)
    }

    pub fn is_stale(&self, index: usize) -> bool {
        self.stale.get(index).copied().unwrap_or(false)
    }

    pub fn update_all(&mut self, satellites: &[Satellite], instant: DateTime<Utc>) -> UpdateReport {
        debug_assert_eq!(satellites.len(), self.positions.len());

        let mut report = UpdateReport::default();

        for (index, satellite) in satellites.iter().enumerate().take(self.positions.len()) {
            let result = propagate(satellite, instant)
                .map_err(|e| e.to_string())
                .and_then(|state| to_scene_space(state.position_km).map_err(|e| e.to_string()));

            match result {
                Ok(position) => {
                    self.positions[index] = position;
                    self.fixed[index] = true;
                    if self.stale[index] {
                        log::info!("{} (slot {}) propagating again", satellite.name(), index);
                        self.stale[index] = false;
                    }
                    report.updated += 1;
                }
                Err(e) => {
                    if !self.stale[index] {
                        log::warn!(
                            "{} (slot {}) frozen at last good position: {}",
                            satellite.name(),
                            index,
                            e
                        );
                        self.stale[index] = true;
                    }
                    report.failed += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::elements::ElementRecord;

    const ISS_LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";
    const VANGUARD_LINE1: &str = "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
    const VANGUARD_LINE2: &str = "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";
    const DECAYING_LINE1: &str = "1 90003U 24001B   24001.50000000  .00100000  00000-0  10000-1 0  9994";
    const DECAYING_LINE2: &str = "2 90003  51.6000  10.0000 0005000   0.0000   0.0000 16.30000000    13";

    fn satellite(name: &str, line1: &str, line2: &str) -> Satellite {
        Satellite::from_record(ElementRecord::parse(name, line1, line2).unwrap()).unwrap()
    }

    #[test]
    fn slots_follow_satellite_order() {
        let sats = vec![
            satellite("ISS", ISS_LINE1, ISS_LINE2),
            satellite("VANGUARD 1", VANGUARD_LINE1, VANGUARD_LINE2),
        ];
        let mut buffer = PositionBuffer::new(sats.len());
        let start = sats[0].epoch();

        for step in 0..3 {
            let instant = start + Duration::minutes(10 * step);
            let report = buffer.update_all(&sats, instant);
            assert_eq!(report, UpdateReport { updated: 2, failed: 0 });

            for (index, sat) in sats.iter().enumerate() {
                let expected = to_scene_space(sat.propagate(instant).unwrap().position_km).unwrap();
                assert_eq!(buffer.get(index), Some(expected));
            }
        }
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn failed_slot_keeps_last_good_position() {
        let sats = vec![satellite("DECAYING", DECAYING_LINE1, DECAYING_LINE2)];
        let mut buffer = PositionBuffer::new(sats.len());

        let epoch = sats[0].epoch();
        let report = buffer.update_all(&sats, epoch);
        assert_eq!(report, UpdateReport { updated: 1, failed: 0 });
        let good = buffer.get(0).unwrap();
        assert!(!buffer.is_stale(0));

        let report = buffer.update_all(&sats, epoch + Duration::days(3650));
        assert_eq!(report, UpdateReport { updated: 0, failed: 1 });
        assert!(buffer.is_stale(0));
        assert_eq!(buffer.get(0), Some(good));
        assert!(buffer.positions().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn never_fixed_slot_reports_no_position() {
        let sats = vec![satellite("DECAYING", DECAYING_LINE1, DECAYING_LINE2)];
        let mut buffer = PositionBuffer::new(1);
        buffer.update_all(&sats, sats[0].epoch() + Duration::days(3650));
        assert!(!buffer.has_fix(0));
        assert_eq!(buffer.get(0), None);
        assert_eq!(buffer.positions()[0], SimVector3::ORIGIN);
    }
}
