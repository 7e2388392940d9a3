//! Fruit Snake - a terminal snake game
//!
//! This library provides:
//! - Core game logic and the fixed-rate tick scheduler (game module)
//! - Keyboard and mouse translation into game intents (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
