use std::time::{Duration, Instant};

use super::engine::{GameEngine, TickOutcome};
use super::error::GameError;

/// Tick rate in ticks per second, always finite and above zero
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Speed(f64);

impl Speed {
    pub fn new(ticks_per_second: f64) -> Result<Self, GameError> {
        if ticks_per_second.is_finite() && ticks_per_second > 0.0 {
            Ok(Self(ticks_per_second))
        } else {
            Err(GameError::InvalidSpeed(ticks_per_second))
        }
    }

    pub fn ticks_per_second(&self) -> f64 {
        self.0
    }

    /// Time between two ticks
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.0).unwrap_or(Duration::MAX)
    }
}

/// Fixed-rate tick driver fed by frame callbacks.
///
/// Frames arrive at whatever rate the front-end renders. A tick fires on the
/// first frame at least one interval after the previous tick, and the marker
/// then jumps to that frame's timestamp, so a long stall yields one tick
/// rather than a burst of catch-up ticks.
#[derive(Debug, Clone)]
pub struct Scheduler {
    speed: Speed,
    last_tick: Option<Instant>,
}

impl Scheduler {
    pub fn new(speed: Speed) -> Self {
        Self {
            speed,
            last_tick: None,
        }
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Takes effect from the next frame
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Feed one frame. Returns the tick outcome if a tick was due.
    pub fn on_frame(&mut self, now: Instant, engine: &mut GameEngine) -> Option<TickOutcome> {
        let last = *self.last_tick.get_or_insert(now);

        if now.saturating_duration_since(last) < self.speed.interval() {
            return None;
        }

        self.last_tick = Some(now);
        Some(engine.tick())
    }
}
