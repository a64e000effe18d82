use std::f64::consts::TAU;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use sgp4::{Constants, Elements};

use crate::elements::{ElementRecord, ParseError};
use crate::propagation::error::PropagationError;
use crate::propagation::types::{EciState, SatelliteInfo};

pub const EARTH_REAL_RADIUS_KM: f64 = 6371.0;
pub const EARTH_MU_KM3_S2: f64 = 398_600.4418;
pub const MINUTES_PER_DAY: f64 = 1440.0;

#[derive(Clone)]
pub struct Satellite {
    record: ElementRecord,
    elements: Elements,
    constants: Constants,
}

impl fmt::Debug for Satellite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Satellite")
            .field("name", &self.record.name())
            .field("norad_id", &self.elements.norad_id)
            .finish()
    }
}

impl Satellite {
    pub fn from_record(record: ElementRecord) -> Result<Self, ParseError> {
        let elements = Elements::from_tle(
            Some(record.name().to_string()),
            record.line1().as_bytes(),
            record.line2().as_bytes(),
        )
        .map_err(|e| ParseError::Elements(e.to_string()))?;

        let constants =
            Constants::from_elements(&elements).map_err(|e| ParseError::Elements(e.to_string()))?;

        Ok(Self {
            record,
            elements,
            constants,
        })
    }

    pub fn record(&self) -> &ElementRecord {
        &self.record
    }

    pub fn name(&self) -> &str {
        self.record.name()
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.elements.datetime.and_utc()
    }

    pub fn mean_motion(&self) -> f64 {
        self.elements.mean_motion
    }

    /// Orbital period `2π / n` with n in rad/min, in minutes.
    pub fn period_minutes(&self) -> f64 {
        let n_rad_min = self.elements.mean_motion * TAU / MINUTES_PER_DAY;
        TAU / n_rad_min
    }

    pub fn period(&self) -> Duration {
        Duration::milliseconds((self.period_minutes() * 60_000.0).round() as i64)
    }

    pub fn mean_altitude_km(&self) -> f64 {
        let n_rad_s = self.elements.mean_motion * TAU / (MINUTES_PER_DAY * 60.0);
        let a = (EARTH_MU_KM3_S2 / (n_rad_s * n_rad_s)).cbrt();
        a - EARTH_REAL_RADIUS_KM
    }

    pub fn info(&self) -> SatelliteInfo {
        SatelliteInfo {
            name: self.name().to_string(),
            norad_id: self.norad_id(),
            international_designator: self.elements.international_designator.clone(),
            epoch: self.epoch(),
            inclination_deg: self.elements.inclination,
            eccentricity: self.elements.eccentricity,
            period_minutes: self.period_minutes(),
            mean_altitude_km: self.mean_altitude_km(),
        }
    }

    pub fn propagate(&self, instant: DateTime<Utc>) -> Result<EciState, PropagationError> {
        propagate(self, instant)
    }
}

pub fn propagate(
    satellite: &Satellite,
    instant: DateTime<Utc>,
) -> Result<EciState, PropagationError> {
    let minutes = satellite
        .elements
        .datetime_to_minutes_since_epoch(&instant.naive_utc())
        .map_err(|e| PropagationError::Epoch(e.to_string()))?;

    let prediction = satellite
        .constants
        .propagate(minutes)
        .map_err(|e| PropagationError::Degenerate(e.to_string()))?;

    check_physical(EciState {
        position_km: prediction.position,
        velocity_km_s: prediction.velocity,
    })
}

fn check_physical(state: EciState) -> Result<EciState, PropagationError> {
    let finite = state
        .position_km
        .iter()
        .chain(state.velocity_km_s.iter())
        .all(|v| v.is_finite());
    if !finite {
        return Err(PropagationError::Degenerate(
            "non-finite state vector".into(),
        ));
    }

    let radius = state.radius_km();
    if radius < EARTH_REAL_RADIUS_KM {
        return Err(PropagationError::Degenerate(format!(
            "position {:.1} km from Earth center is below the surface",
            radius
        )));
    }

    Ok(state)
}
