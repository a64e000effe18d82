mod error;
mod event;

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use crate::clock::{SimulationClock, DEFAULT_RATE};
use crate::elements::{ElementRecord, RejectedRecord};
use crate::propagation::Satellite;
use crate::render::{FrameInfo, SceneRenderer};
use crate::scene::{earth_rotation_rad, PositionBuffer, DEFAULT_SAMPLE_STEP};
use crate::selection::{InterestSets, SelectionPolicy};

pub use error::SessionError;
pub use event::SessionEvent;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub start: DateTime<Utc>,
    pub rate: f64,
    pub sample_step: Duration,
    pub interest: InterestSets,
}

impl SessionOptions {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start,
            rate: DEFAULT_RATE,
            sample_step: DEFAULT_SAMPLE_STEP,
            interest: InterestSets::default(),
        }
    }
}

pub struct Session {
    satellites: Vec<Satellite>,
    rejected: Vec<RejectedRecord>,
    clock: SimulationClock,
    buffer: PositionBuffer,
    policy: SelectionPolicy,
    events: VecDeque<SessionEvent>,
    tiers_dirty: bool,
    interest_dirty: bool,
    tick: u64,
}

impl Session {
    pub fn new(records: Vec<ElementRecord>, options: SessionOptions) -> Result<Self, SessionError> {
        let clock = SimulationClock::with_rate(options.start, options.rate)?;

        let mut satellites = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        for record in records {
            let name = record.name().to_string();
            match Satellite::from_record(record) {
                Ok(satellite) => satellites.push(satellite),
                Err(error) => {
                    log::warn!("Excluding {}: {}", name, error);
                    rejected.push(RejectedRecord {
                        name,
                        source: "session".to_string(),
                        error,
                    });
                }
            }
        }

        if satellites.is_empty() {
            return Err(SessionError::NoData);
        }

        log::info!(
            "Tracking {} satellites from {} at rate {}x",
            satellites.len(),
            clock.current(),
            clock.rate()
        );

        let policy = SelectionPolicy::new(&satellites, options.interest, options.sample_step);
        let buffer = PositionBuffer::new(satellites.len());

        Ok(Self {
            satellites,
            rejected,
            clock,
            buffer,
            policy,
            events: VecDeque::new(),
            tiers_dirty: true,
            interest_dirty: true,
            tick: 0,
        })
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn buffer(&self) -> &PositionBuffer {
        &self.buffer
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Satellite behind a buffer index. Does not change the selection; queue
    /// [`SessionEvent::Select`] for that.
    pub fn on_select(&self, index: usize) -> Option<&Satellite> {
        self.satellites.get(index)
    }

    pub fn queue(&mut self, event: SessionEvent) {
        self.events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn tick(&mut self, real_seconds: f64, renderer: &mut dyn SceneRenderer) -> FrameInfo {
        let (clock_events, scene_events): (Vec<_>, Vec<_>) = self
            .events
            .drain(..)
            .partition(SessionEvent::is_clock_command);

        for event in clock_events {
            match event {
                SessionEvent::SetRate(rate) => match self.clock.set_rate(rate) {
                    Ok(()) => log::info!("Playback rate set to {}x", rate),
                    Err(e) => log::warn!("Rejected rate change: {}", e),
                },
                SessionEvent::Scrub(instant) => {
                    log::info!("Scrubbed to {}", instant);
                    self.clock.scrub(instant);
                }
                _ => {}
            }
        }

        let instant = self.clock.advance(real_seconds);
        let report = self.buffer.update_all(&self.satellites, instant);

        for event in scene_events {
            match event {
                SessionEvent::Select(index) => {
                    self.policy
                        .on_select(index, &self.satellites, instant, renderer);
                }
                SessionEvent::Deselect => self.policy.deselect(renderer),
                SessionEvent::SetInterest(interest) => {
                    if self
                        .policy
                        .set_interest(interest, &self.satellites, instant, renderer)
                    {
                        self.tiers_dirty = true;
                    }
                    self.interest_dirty = false;
                }
                SessionEvent::SetRate(_) | SessionEvent::Scrub(_) => {}
            }
        }

        if self.interest_dirty {
            self.policy
                .sync_interest_curves(&self.satellites, instant, renderer);
            self.interest_dirty = false;
        }
        self.policy
            .refresh_stale(&self.satellites, instant, renderer);

        renderer.update_instances(&self.buffer);
        if self.tiers_dirty {
            renderer.update_tiers(self.policy.tiers());
            self.tiers_dirty = false;
        }

        self.tick += 1;
        let frame = FrameInfo {
            tick: self.tick,
            instant,
            rate: self.clock.rate(),
            earth_rotation_rad: earth_rotation_rad(instant),
            report,
        };
        renderer.present(&frame);
        frame
    }

    pub fn shutdown(&mut self, renderer: &mut dyn SceneRenderer) {
        self.events.clear();
        self.policy.release_all(renderer);
        log::info!("Session ended after {} ticks", self.tick);
    }
}
