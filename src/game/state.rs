use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use super::action::Direction;

/// A cell on the game grid
///
/// Coordinates are signed so a head that left the grid can still be
/// represented and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell one step in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
///
/// Cells are kept tail-first, head-last. A hash index mirrors the deque so
/// occupancy checks stay constant time on large grids.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    occupied: HashSet<Cell>,
}

impl Snake {
    /// Create a snake whose head sits at `head`, with `length - 1` segments
    /// trailing behind it opposite to `direction`.
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let length = length.max(1);

        let cells = (0..length).rev().map(|i| {
            let back = i as i32;
            head.moved_by(-dx * back, -dy * back)
        });

        Self::from_cells(cells)
    }

    /// Build a snake from cells ordered tail-first. Duplicate cells are
    /// skipped so the uniqueness invariant holds.
    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I) -> Self {
        let mut snake = Self {
            body: VecDeque::new(),
            occupied: HashSet::new(),
        };
        for cell in cells {
            if snake.occupied.insert(cell) {
                snake.body.push_back(cell);
            }
        }
        snake
    }

    /// Get the head position. Panics on an empty snake.
    pub fn head(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// Append a new head one step in `direction` and return it.
    /// The tail is left in place; the caller decides on growth.
    pub fn advance(&mut self, direction: Direction) -> Cell {
        let new_head = self.head().moved_in_direction(direction);
        self.body.push_back(new_head);
        self.occupied.insert(new_head);
        new_head
    }

    /// Remove the oldest segment
    pub fn drop_tail(&mut self) {
        if let Some(tail) = self.body.pop_front() {
            self.occupied.remove(&tail);
        }
    }

    /// Check whether any segment sits on `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    /// Cells in order, tail first
    pub fn cells(&self) -> impl ExactSizeIterator<Item = &Cell> + '_ {
        self.body.iter()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl PartialEq for Snake {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
    }
}

impl Eq for Snake {}

/// Kind of fruit on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FruitKind {
    /// Regular fruit, low score
    #[default]
    Normal,
    /// Gold fruit, high score
    Bonus,
}

impl FruitKind {
    /// The other kind
    pub fn flipped(self) -> Self {
        match self {
            FruitKind::Normal => FruitKind::Bonus,
            FruitKind::Bonus => FruitKind::Normal,
        }
    }
}

/// The fruit currently on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fruit {
    pub cell: Cell,
    pub kind: FruitKind,
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Nothing started yet
    #[default]
    Idle,
    Running,
    Paused,
    /// Run finished, waiting for a reset
    Over,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    SelfCollision,
    /// Snake covers every cell, nowhere left to put fruit
    BoardFilled,
}

/// Read-only view of the game handed to renderers
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Snake cells, tail first
    pub cells: Vec<Cell>,
    /// Fruit on the board, absent once the snake fills the grid
    pub fruit: Option<Fruit>,
    /// Kind the next fruit is scored as
    pub fruit_kind: FruitKind,
    pub score: u32,
    pub run_state: RunState,
    pub direction: Direction,
    pub ticks: u64,
    pub grid_cols: usize,
    pub grid_rows: usize,
    pub last_game_over: Option<GameOverCause>,
}

impl Snapshot {
    /// Head of the snake, if it has any cells
    pub fn head(&self) -> Option<Cell> {
        self.cells.last().copied()
    }
}

/// Check if a cell is within a `cols x rows` grid
pub fn in_bounds(cell: Cell, cols: usize, rows: usize) -> bool {
    cell.x >= 0 && (cell.x as i64) < cols as i64 && cell.y >= 0 && (cell.y as i64) < rows as i64
}
