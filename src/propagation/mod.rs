mod error;
mod propagator;
mod types;

pub use error::PropagationError;
pub use propagator::{
    propagate, Satellite, EARTH_MU_KM3_S2, EARTH_REAL_RADIUS_KM, MINUTES_PER_DAY,
};
pub use types::{EciState, SatelliteInfo};
