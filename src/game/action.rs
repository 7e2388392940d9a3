
use super::state::FruitKind;

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A request coming from outside the engine (keyboard, mouse, tests).
///
/// Intents never mutate the simulation directly: turns are buffered until the
/// next tick and speed changes take effect on the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Request a new heading, applied at the start of the next tick
    Turn(Direction),
    /// Leave the idle screen and begin the first run
    Start,
    /// Throw away the current run and start a fresh one
    Reset,
    /// Pause or resume a running game
    TogglePause,
    /// Set the tick rate in ticks per second
    SetSpeed(f64),
    /// Nudge the tick rate by a signed amount, clamped to the configured range
    AdjustSpeed(f64),
    /// Switch the fruit currently on the board to the given kind
    SelectFruit(FruitKind),
}

impl From<Direction> for Intent {
    fn from(direction: Direction) -> Self {
        Intent::Turn(direction)
    }
}

/// Anything that can hand intents to the game session.
///
/// The session drains a source once per frame, so implementations only need
/// to queue what arrived since the previous call.
pub trait IntentSource {
    /// Pop the oldest queued intent, if any
    fn next_intent(&mut self) -> Option<Intent>;
}

impl IntentSource for std::collections::VecDeque<Intent> {
    fn next_intent(&mut self) -> Option<Intent> {
        self.pop_front()
    }
}
