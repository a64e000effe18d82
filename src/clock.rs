use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub const DEFAULT_RATE: f64 = rates::REALTIME;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ClockError {
    #[error("invalid playback rate {0}: must be a positive finite number")]
    InvalidRate(f64),
}

pub fn validate_rate(rate: f64) -> Result<f64, ClockError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(ClockError::InvalidRate(rate))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SimulationClock {
    current: DateTime<Utc>,
    rate: f64,
}

impl SimulationClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: start,
            rate: DEFAULT_RATE,
        }
    }

    pub fn with_rate(start: DateTime<Utc>, rate: f64) -> Result<Self, ClockError> {
        Ok(Self {
            current: start,
            rate: validate_rate(rate)?,
        })
    }

    pub fn current(&self) -> DateTime<Utc> {
        self.current
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Rejects zero, negative and non-finite rates; the clock is left as is.
    pub fn set_rate(&mut self, rate: f64) -> Result<(), ClockError> {
        self.rate = validate_rate(rate)?;
        Ok(())
    }

    pub fn advance(&mut self, real_seconds: f64) -> DateTime<Utc> {
        if !real_seconds.is_finite() || real_seconds < 0.0 {
            log::debug!("Ignoring invalid tick duration {}", real_seconds);
            return self.current;
        }

        let sim_micros = (real_seconds * self.rate * 1e6).round();
        if sim_micros >= i64::MAX as f64 {
            log::warn!("Tick of {} simulated seconds is out of range", sim_micros / 1e6);
            return self.current;
        }

        match self
            .current
            .checked_add_signed(Duration::microseconds(sim_micros as i64))
        {
            Some(next) => self.current = next,
            None => log::warn!("Simulation clock would leave the representable range"),
        }
        self.current
    }

    pub fn scrub(&mut self, instant: DateTime<Utc>) {
        self.current = instant;
    }

    pub fn jump(&mut self, offset: Duration) {
        if let Some(next) = self.current.checked_add_signed(offset) {
            self.current = next;
        }
    }
}

pub mod rates {
    pub const REALTIME: f64 = 1.0;
    pub const MINUTE_PER_SEC: f64 = 60.0;
    pub const TEN_MINUTES_PER_SEC: f64 = 600.0;
    pub const HOUR_PER_SEC: f64 = 3600.0;
    pub const DAY_PER_SEC: f64 = 86400.0;
}
