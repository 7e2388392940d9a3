use std::time::Instant;
use tracing::{debug, warn};

use super::{
    action::{Intent, IntentSource},
    config::GameConfig,
    engine::{GameEngine, TickOutcome},
    error::GameError,
    scheduler::{Scheduler, Speed},
    state::Snapshot,
};

/// Engine plus its tick driver: the single entry point front-ends talk to
pub struct GameSession {
    engine: GameEngine,
    scheduler: Scheduler,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let speed = Speed::new(config.clamp_speed(config.initial_speed))?;
        let engine = GameEngine::new(config)?;

        Ok(Self {
            engine,
            scheduler: Scheduler::new(speed),
        })
    }

    /// Build a session around an existing engine
    pub fn from_engine(engine: GameEngine) -> Result<Self, GameError> {
        let config = engine.config();
        let speed = Speed::new(config.clamp_speed(config.initial_speed))?;

        Ok(Self {
            engine,
            scheduler: Scheduler::new(speed),
        })
    }

    /// Apply one intent. Speeds outside the configured range are clamped;
    /// speeds that are not positive finite numbers are rejected.
    pub fn apply(&mut self, intent: Intent) -> Result<(), GameError> {
        match intent {
            Intent::Turn(direction) => self.engine.set_pending_direction(direction),
            Intent::Start => self.engine.request_start(),
            Intent::Reset => self.engine.request_reset()?,
            Intent::TogglePause => self.engine.request_pause_toggle(),
            Intent::SetSpeed(ticks_per_second) => {
                Speed::new(ticks_per_second)?;
                self.set_clamped_speed(ticks_per_second)?;
            }
            Intent::AdjustSpeed(delta) => {
                if !delta.is_finite() {
                    return Err(GameError::InvalidSpeed(delta));
                }
                let current = self.scheduler.speed().ticks_per_second();
                self.set_clamped_speed(current + delta)?;
            }
            Intent::SelectFruit(kind) => self.engine.set_fruit_kind(kind),
        }
        Ok(())
    }

    /// Drain every queued intent. Rejected intents are logged and skipped.
    pub fn pump<S: IntentSource + ?Sized>(&mut self, source: &mut S) {
        while let Some(intent) = source.next_intent() {
            if let Err(err) = self.apply(intent) {
                warn!(?intent, %err, "intent rejected");
            }
        }
    }

    /// Feed one frame to the scheduler
    pub fn on_frame(&mut self, now: Instant) -> Option<TickOutcome> {
        self.scheduler.on_frame(now, &mut self.engine)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn speed(&self) -> Speed {
        self.scheduler.speed()
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    fn set_clamped_speed(&mut self, ticks_per_second: f64) -> Result<(), GameError> {
        let speed = Speed::new(self.engine.config().clamp_speed(ticks_per_second))?;
        debug!(ticks_per_second = speed.ticks_per_second(), "speed changed");
        self.scheduler.set_speed(speed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, FruitKind, RunState};
    use std::collections::VecDeque;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default().with_seed(21)).unwrap()
    }

    #[test]
    fn test_starts_idle_at_initial_speed() {
        let session = session();
        assert_eq!(session.snapshot().run_state, RunState::Idle);
        assert_eq!(session.speed().ticks_per_second(), 10.0);
    }

    #[test]
    fn test_set_speed_clamps() {
        let mut session = session();

        session.apply(Intent::SetSpeed(100.0)).unwrap();
        assert_eq!(session.speed().ticks_per_second(), 30.0);

        session.apply(Intent::SetSpeed(0.25)).unwrap();
        assert_eq!(session.speed().ticks_per_second(), 1.0);
    }

    #[test]
    fn test_set_speed_rejects_non_positive() {
        let mut session = session();

        assert_eq!(
            session.apply(Intent::SetSpeed(0.0)),
            Err(GameError::InvalidSpeed(0.0))
        );
        assert!(session.apply(Intent::SetSpeed(f64::NAN)).is_err());
        assert_eq!(session.speed().ticks_per_second(), 10.0);
    }

    #[test]
    fn test_adjust_speed() {
        let mut session = session();

        session.apply(Intent::AdjustSpeed(2.0)).unwrap();
        assert_eq!(session.speed().ticks_per_second(), 12.0);

        session.apply(Intent::AdjustSpeed(-50.0)).unwrap();
        assert_eq!(session.speed().ticks_per_second(), 1.0);
    }

    #[test]
    fn test_pump_applies_in_order_and_skips_rejected() {
        let mut session = session();
        let mut queue: VecDeque<Intent> = VecDeque::from([
            Intent::Start,
            Intent::SetSpeed(-1.0),
            Intent::Turn(Direction::Up),
            Intent::SelectFruit(FruitKind::Bonus),
            Intent::TogglePause,
        ]);

        session.pump(&mut queue);

        assert!(queue.is_empty());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.run_state, RunState::Paused);
        assert_eq!(snapshot.fruit_kind, FruitKind::Bonus);
        assert_eq!(session.engine().pending_direction(), Direction::Up);
        assert_eq!(session.speed().ticks_per_second(), 10.0);
    }

    #[test]
    fn test_frames_drive_ticks() {
        let mut session = session();
        session.apply(Intent::Start).unwrap();
        let t0 = Instant::now();

        assert_eq!(session.on_frame(t0), None);
        assert!(session
            .on_frame(t0 + std::time::Duration::from_millis(100))
            .is_some());
        assert_eq!(session.snapshot().ticks, 1);
    }
}
