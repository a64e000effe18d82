use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::propagation::{propagate, Satellite};
use crate::scene::transform::{to_scene_space, SimVector3};

pub const DEFAULT_SAMPLE_STEP: Duration = Duration::seconds(60);

/// Upper bound on points per orbit; slow orbits get a wider step.
pub const MAX_CURVE_SAMPLES: usize = 2048;

/// Scene-space samples along one orbital period, starting at a fixed instant.
#[derive(Debug, Clone)]
pub struct OrbitSamples<'a> {
    satellite: &'a Satellite,
    start: DateTime<Utc>,
    step: Duration,
    period: Duration,
    offset: Option<Duration>,
}

impl Iterator for OrbitSamples<'_> {
    type Item = SimVector3;

    fn next(&mut self) -> Option<SimVector3> {
        while let Some(offset) = self.offset.filter(|o| *o <= self.period) {
            self.offset = offset.checked_add(&self.step);

            let Some(instant) = self.start.checked_add_signed(offset) else {
                self.offset = None;
                return None;
            };

            let state = match propagate(self.satellite, instant) {
                Ok(state) => state,
                Err(e) => {
                    log::trace!("{}: skipping sample at {}: {}", self.satellite.name(), instant, e);
                    continue;
                }
            };
            match to_scene_space(state.position_km) {
                Ok(point) => return Some(point),
                Err(e) => {
                    log::trace!("{}: dropping sample at {}: {}", self.satellite.name(), instant, e);
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.offset {
            Some(offset) if offset <= self.period => {
                let remaining = (self.period - offset).num_milliseconds()
                    / self.step.num_milliseconds().max(1)
                    + 1;
                (0, Some(remaining as usize))
            }
            _ => (0, Some(0)),
        }
    }
}

pub fn sample_orbit(satellite: &Satellite, start: DateTime<Utc>) -> OrbitSamples<'_> {
    sample_orbit_with_step(satellite, start, DEFAULT_SAMPLE_STEP)
}

pub fn sample_orbit_with_step(
    satellite: &Satellite,
    start: DateTime<Utc>,
    step: Duration,
) -> OrbitSamples<'_> {
    let period = satellite.period();
    let step = if step > Duration::zero() {
        step
    } else {
        DEFAULT_SAMPLE_STEP
    };
    OrbitSamples {
        satellite,
        start,
        step: step.max(min_step_for(period)),
        period,
        offset: Some(Duration::zero()),
    }
}

// Smallest step that keeps one period within MAX_CURVE_SAMPLES points.
fn min_step_for(period: Duration) -> Duration {
    let intervals = (MAX_CURVE_SAMPLES - 1) as i64;
    let ms = (period.num_milliseconds() + intervals - 1) / intervals;
    Duration::milliseconds(ms.max(1))
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrajectoryCurve {
    pub satellite: usize,
    pub anchor: DateTime<Utc>,
    pub points: Vec<SimVector3>,
}

impl TrajectoryCurve {
    /// Returns `None` when no sample survived; an empty curve is never built.
    pub fn sample(
        index: usize,
        satellite: &Satellite,
        anchor: DateTime<Utc>,
        step: Duration,
    ) -> Option<Self> {
        let points: Vec<SimVector3> = sample_orbit_with_step(satellite, anchor, step).collect();
        if points.is_empty() {
            log::debug!("No trajectory available for {} at {}", satellite.name(), anchor);
            return None;
        }
        Some(Self {
            satellite: index,
            anchor,
            points,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
