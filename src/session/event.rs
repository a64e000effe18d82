use chrono::{DateTime, Utc};

use crate::selection::InterestSets;

/// Requests from the UI, applied at the start of the next tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SetRate(f64),
    Scrub(DateTime<Utc>),
    Select(usize),
    Deselect,
    SetInterest(InterestSets),
}

impl SessionEvent {
    pub fn is_clock_command(&self) -> bool {
        matches!(self, SessionEvent::SetRate(_) | SessionEvent::Scrub(_))
    }
}
