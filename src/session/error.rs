use thiserror::Error;

use crate::clock::ClockError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no valid element records to track")]
    NoData,
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),
}
