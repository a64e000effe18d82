use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Inertial (TEME) state produced by SGP4/SDP4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct EciState {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

impl EciState {
    pub fn radius_km(&self) -> f64 {
        let [x, y, z] = self.position_km;
        (x * x + y * y + z * z).sqrt()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u64,
    pub international_designator: Option<String>,
    pub epoch: DateTime<Utc>,
    pub inclination_deg: f64,
    pub eccentricity: f64,
    pub period_minutes: f64,
    pub mean_altitude_km: f64,
}
