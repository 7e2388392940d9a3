use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{
    action::Direction,
    config::GameConfig,
    error::GameError,
    fruit::FruitPlacer,
    state::{in_bounds, Cell, Fruit, FruitKind, GameOverCause, RunState, Snake, Snapshot},
};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was not running, nothing changed
    Idle,
    /// The snake moved one cell without eating
    Moved,
    /// The snake ate a fruit of `kind`; `score` is the new total
    Ate { kind: FruitKind, score: u32 },
    /// The run ended this tick
    GameOver(GameOverCause),
}

/// The game engine that owns and advances all game state
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    placer: FruitPlacer,
    snake: Snake,
    /// Cleared once the snake fills the whole grid
    fruit_cell: Option<Cell>,
    fruit_kind: FruitKind,
    score: u32,
    run_state: RunState,
    direction: Direction,
    pending_direction: Direction,
    ticks: u64,
    last_game_over: Option<GameOverCause>,
}

impl GameEngine {
    /// Create an idle engine with a fresh board
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let placer = FruitPlacer::new(
            config.grid_cols,
            config.grid_rows,
            config.max_placement_attempts,
        );

        let mut engine = Self {
            rng,
            placer,
            snake: Snake::from_cells(std::iter::empty()),
            fruit_cell: None,
            fruit_kind: config.initial_fruit,
            score: 0,
            run_state: RunState::Idle,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            ticks: 0,
            last_game_over: None,
            config,
        };
        engine.reset_board()?;

        Ok(engine)
    }

    /// Create an idle engine with a hand-made starting layout.
    ///
    /// The snake must be non-empty, inside the grid, and not overlap the fruit.
    pub fn with_layout(
        config: GameConfig,
        snake: Snake,
        direction: Direction,
        fruit: Fruit,
    ) -> Result<Self, GameError> {
        let mut engine = Self::new(config)?;
        let (cols, rows) = (engine.config.grid_cols, engine.config.grid_rows);

        if snake.is_empty() {
            return Err(GameError::InvalidLayout("snake has no cells"));
        }
        if !snake.cells().all(|cell| in_bounds(*cell, cols, rows)) {
            return Err(GameError::InvalidLayout("snake leaves the grid"));
        }
        if !in_bounds(fruit.cell, cols, rows) {
            return Err(GameError::InvalidLayout("fruit is outside the grid"));
        }
        if snake.occupies(fruit.cell) {
            return Err(GameError::InvalidLayout("fruit sits on the snake"));
        }

        engine.snake = snake;
        engine.fruit_cell = Some(fruit.cell);
        engine.fruit_kind = fruit.kind;
        engine.direction = direction;
        engine.pending_direction = direction;
        Ok(engine)
    }

    /// Idle -> Running. Only the very first start does anything.
    pub fn request_start(&mut self) {
        if self.run_state == RunState::Idle {
            self.run_state = RunState::Running;
            info!(cols = self.config.grid_cols, rows = self.config.grid_rows, "game started");
        }
    }

    /// Rebuild the board and start running, whatever the current state
    pub fn request_reset(&mut self) -> Result<(), GameError> {
        self.reset_board()?;
        self.run_state = RunState::Running;
        info!("game reset");
        Ok(())
    }

    /// Running <-> Paused; ignored in any other state
    pub fn request_pause_toggle(&mut self) {
        self.run_state = match self.run_state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            other => other,
        };
    }

    /// Remember a heading for the next tick. Later calls overwrite earlier ones.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        self.pending_direction = direction;
    }

    /// Switch the kind of the fruit currently on the board
    pub fn set_fruit_kind(&mut self, kind: FruitKind) {
        self.fruit_kind = kind;
    }

    /// Advance the simulation by one step.
    ///
    /// When a fruit is eaten the random source is consumed in a fixed order:
    /// first the kind flip draw, then the placement of the next fruit.
    pub fn tick(&mut self) -> TickOutcome {
        if self.run_state != RunState::Running {
            return TickOutcome::Idle;
        }

        if !self.direction.is_opposite(self.pending_direction) {
            self.direction = self.pending_direction;
        }

        let new_head = self.snake.head().moved_in_direction(self.direction);

        if !in_bounds(new_head, self.config.grid_cols, self.config.grid_rows) {
            return self.game_over(GameOverCause::Wall);
        }

        // the tail has not moved yet, so stepping onto it counts as a hit
        if self.snake.occupies(new_head) {
            return self.game_over(GameOverCause::SelfCollision);
        }

        self.snake.advance(self.direction);
        self.ticks += 1;

        if self.fruit_cell != Some(new_head) {
            self.snake.drop_tail();
            return TickOutcome::Moved;
        }

        let eaten = self.fruit_kind;
        self.score += self.config.points_for(eaten);

        if self.rng.gen_bool(self.config.bonus_flip_probability) {
            self.fruit_kind = eaten.flipped();
        }

        debug!(score = self.score, kind = ?eaten, length = self.snake.len(), "fruit eaten");

        match self.placer.place(&self.snake, &mut self.rng) {
            Ok(cell) => {
                self.fruit_cell = Some(cell);
                TickOutcome::Ate {
                    kind: eaten,
                    score: self.score,
                }
            }
            Err(_) => {
                self.fruit_cell = None;
                self.game_over(GameOverCause::BoardFilled)
            }
        }
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.snake.cells().copied().collect(),
            fruit: self.fruit(),
            fruit_kind: self.fruit_kind,
            score: self.score,
            run_state: self.run_state,
            direction: self.direction,
            ticks: self.ticks,
            grid_cols: self.config.grid_cols,
            grid_rows: self.config.grid_rows,
            last_game_over: self.last_game_over,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// The fruit on the board; `None` only after the snake filled the grid
    pub fn fruit(&self) -> Option<Fruit> {
        self.fruit_cell.map(|cell| Fruit {
            cell,
            kind: self.fruit_kind,
        })
    }

    pub fn fruit_kind(&self) -> FruitKind {
        self.fruit_kind
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Ticks that moved the snake since the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn game_over(&mut self, cause: GameOverCause) -> TickOutcome {
        self.run_state = RunState::Over;
        self.last_game_over = Some(cause);
        info!(?cause, score = self.score, length = self.snake.len(), "game over");
        TickOutcome::GameOver(cause)
    }

    /// Put the snake back in the middle of the grid heading right, clear the
    /// score and drop a new fruit. The fruit kind is kept.
    fn reset_board(&mut self) -> Result<(), GameError> {
        let head = Cell::new(
            (self.config.grid_cols / 2) as i32,
            (self.config.grid_rows / 2) as i32,
        );
        let snake = Snake::new(head, Direction::Right, self.config.initial_length.max(2));
        let cell = self.placer.place(&snake, &mut self.rng)?;

        self.snake = snake;
        self.fruit_cell = Some(cell);
        self.score = 0;
        self.ticks = 0;
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.last_game_over = None;
        Ok(())
    }
}
