//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Front-ends feed it intents and frame timestamps and read back snapshots.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod fruit;
pub mod scheduler;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Intent, IntentSource};
pub use config::GameConfig;
pub use engine::{GameEngine, TickOutcome};
pub use error::GameError;
pub use fruit::FruitPlacer;
pub use scheduler::{Scheduler, Speed};
pub use session::GameSession;
pub use state::{Cell, Fruit, FruitKind, GameOverCause, RunState, Snake, Snapshot};
