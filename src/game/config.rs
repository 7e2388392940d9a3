use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::GameError;
use super::state::FruitKind;

/// Largest accepted grid side, so every cell fits an `i32` coordinate
pub const MAX_GRID_SIDE: usize = u16::MAX as usize;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of columns in the grid
    pub grid_cols: usize,
    /// Number of rows in the grid
    pub grid_rows: usize,
    /// Length of the snake after a reset
    pub initial_length: usize,

    /// Points for eating a normal fruit
    pub normal_points: u32,
    /// Points for eating a bonus fruit
    pub bonus_points: u32,
    /// Chance that the fruit kind flips after each fruit eaten
    pub bonus_flip_probability: f64,
    /// Fruit kind on the board when the program starts
    pub initial_fruit: FruitKind,

    /// Ticks per second at startup
    pub initial_speed: f64,
    /// Slowest speed reachable through speed adjustments
    pub min_speed: f64,
    /// Fastest speed reachable through speed adjustments
    pub max_speed: f64,
    /// Step used by the speed up / slow down controls
    pub speed_step: f64,

    /// Random draws tried before falling back to scanning free cells
    pub max_placement_attempts: usize,
    /// Seed for the random source; random if unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_cols: 30,
            grid_rows: 30,
            initial_length: 2,
            normal_points: 10,
            bonus_points: 30,
            bonus_flip_probability: 0.12,
            initial_fruit: FruitKind::Normal,
            initial_speed: 10.0,
            min_speed: 1.0,
            max_speed: 30.0,
            speed_step: 1.0,
            max_placement_attempts: 1024,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            grid_cols: cols,
            grid_rows: rows,
            ..Default::default()
        }
    }

    /// Same configuration with a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Points awarded for eating a fruit of the given kind
    pub fn points_for(&self, kind: FruitKind) -> u32 {
        match kind {
            FruitKind::Normal => self.normal_points,
            FruitKind::Bonus => self.bonus_points,
        }
    }

    /// Clamp a speed into the configured range
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        speed.clamp(self.min_speed, self.max_speed)
    }

    /// Check that the configuration describes a playable game
    pub fn validate(&self) -> Result<(), GameError> {
        let length = self.initial_length.max(2);
        // head sits at the centre column, the body trails to the left
        let fits_row = self.grid_cols / 2 + 1 >= length;
        let has_room = self.grid_cols.saturating_mul(self.grid_rows) > length;
        let too_large = self.grid_cols > MAX_GRID_SIDE || self.grid_rows > MAX_GRID_SIDE;
        if self.grid_rows == 0 || !fits_row || !has_room || too_large {
            return Err(GameError::InvalidGrid {
                cols: self.grid_cols,
                rows: self.grid_rows,
                snake_len: length,
            });
        }

        if !(self.min_speed.is_finite()
            && self.max_speed.is_finite()
            && self.min_speed > 0.0
            && self.min_speed <= self.max_speed)
        {
            return Err(GameError::InvalidSpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }

        if !(self.initial_speed.is_finite() && self.initial_speed > 0.0) {
            return Err(GameError::InvalidSpeed(self.initial_speed));
        }

        if !(0.0..=1.0).contains(&self.bonus_flip_probability) {
            return Err(GameError::InvalidProbability(self.bonus_flip_probability));
        }

        Ok(())
    }
}
