use std::f64::consts::TAU;
use std::ops::{Add, Mul, Neg, Sub};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::propagation::EARTH_REAL_RADIUS_KM;

pub const EARTH_RENDER_RADIUS: f64 = 10.0;

pub const SCENE_SCALE: f64 = EARTH_RENDER_RADIUS / EARTH_REAL_RADIUS_KM;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransformError {
    #[error("non-finite coordinate in {0:?}")]
    NonFinite([f64; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, ToSchema)]
pub struct SimVector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SimVector3 {
    pub const ORIGIN: SimVector3 = SimVector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: SimVector3) -> f64 {
        (*self - other).length()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for SimVector3 {
    type Output = SimVector3;

    fn add(self, rhs: SimVector3) -> SimVector3 {
        SimVector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for SimVector3 {
    type Output = SimVector3;

    fn sub(self, rhs: SimVector3) -> SimVector3 {
        SimVector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for SimVector3 {
    type Output = SimVector3;

    fn mul(self, k: f64) -> SimVector3 {
        SimVector3::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Neg for SimVector3 {
    type Output = SimVector3;

    fn neg(self) -> SimVector3 {
        SimVector3::new(-self.x, -self.y, -self.z)
    }
}

pub fn to_scene_space(position_km: [f64; 3]) -> Result<SimVector3, TransformError> {
    if !position_km.iter().all(|v| v.is_finite()) {
        return Err(TransformError::NonFinite(position_km));
    }
    let [x, y, z] = position_km;
    Ok(SimVector3::new(x, y, z) * SCENE_SCALE)
}

/// Greenwich sidereal angle in radians, used to orient the Earth mesh inside
/// the inertial scene.
pub fn earth_rotation_rad(instant: DateTime<Utc>) -> f64 {
    let gmst =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&instant.naive_utc()));
    gmst.rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn close(a: SimVector3, b: SimVector3) -> bool {
        a.distance(b) <= 1e-12 * (1.0 + a.length().max(b.length()))
    }

    #[test]
    fn earth_radius_maps_to_render_radius() {
        let p = to_scene_space([EARTH_REAL_RADIUS_KM, 0.0, 0.0]).unwrap();
        assert!((p.x - EARTH_RENDER_RADIUS).abs() < 1e-12);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn transform_is_linear() {
        let p = [6778.0, -1200.5, 3400.25];
        let base = to_scene_space(p).unwrap();
        for k in [-3.0, -1.0, 0.0, 0.5, 2.0, 1e3] {
            let scaled = to_scene_space([p[0] * k, p[1] * k, p[2] * k]).unwrap();
            assert!(close(scaled, base * k), "k = {k}");
        }
    }

    #[test]
    fn rejects_non_finite_components() {
        for bad in [
            [f64::NAN, 0.0, 0.0],
            [0.0, f64::INFINITY, 0.0],
            [0.0, 0.0, f64::NEG_INFINITY],
        ] {
            assert!(matches!(
                to_scene_space(bad),
                Err(TransformError::NonFinite(_))
            ));
        }
    }

    #[test]
    fn rotation_angle_is_normalized() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
        let angle = earth_rotation_rad(instant);
        assert!((0.0..TAU).contains(&angle));
    }
}
