mod policy;
mod tier;

pub use policy::{CurveKey, SelectionPolicy};
pub use tier::{classify, InterestSets, InterestTier};
