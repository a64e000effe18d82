mod buffer;
mod trajectory;
mod transform;

pub use buffer::{PositionBuffer, UpdateReport};
pub use trajectory::{
    sample_orbit, sample_orbit_with_step, OrbitSamples, TrajectoryCurve, DEFAULT_SAMPLE_STEP,
    MAX_CURVE_SAMPLES,
};
pub use transform::{
    earth_rotation_rad, to_scene_space, SimVector3, TransformError, EARTH_RENDER_RADIUS,
    SCENE_SCALE,
};
