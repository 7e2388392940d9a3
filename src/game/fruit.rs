use rand::seq::IteratorRandom;
use rand::Rng;

use super::error::GameError;
use super::state::{Cell, Snake};

/// Picks empty cells for fruit
///
/// Placement draws random cells and retries on collisions with the snake. To
/// stay bounded on crowded boards it gives up after `max_attempts` draws and
/// picks uniformly among the remaining free cells instead, so the result is
/// uniform either way.
#[derive(Debug, Clone)]
pub struct FruitPlacer {
    cols: usize,
    rows: usize,
    max_attempts: usize,
}

impl FruitPlacer {
    pub fn new(cols: usize, rows: usize, max_attempts: usize) -> Self {
        Self {
            cols,
            rows,
            max_attempts,
        }
    }

    /// Return a random cell not occupied by `snake`, or `GridFull` if the
    /// snake covers the whole grid.
    pub fn place<R: Rng + ?Sized>(&self, snake: &Snake, rng: &mut R) -> Result<Cell, GameError> {
        let total = self.cols.saturating_mul(self.rows);
        if total == 0 || snake.len() >= total {
            return Err(GameError::GridFull);
        }

        for _ in 0..self.max_attempts {
            let cell = Cell::new(
                rng.gen_range(0..self.cols) as i32,
                rng.gen_range(0..self.rows) as i32,
            );
            if !snake.occupies(cell) {
                return Ok(cell);
            }
        }

        self.free_cells(snake)
            .choose(rng)
            .ok_or(GameError::GridFull)
    }

    fn free_cells<'a>(&self, snake: &'a Snake) -> impl Iterator<Item = Cell> + 'a {
        let (cols, rows) = (self.cols as i32, self.rows as i32);
        (0..rows)
            .flat_map(move |y| (0..cols).map(move |x| Cell::new(x, y)))
            .filter(move |cell| !snake.occupies(*cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::Direction;
    use crate::game::config::MAX_GRID_SIDE;
    use crate::game::state::in_bounds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_never_places_on_snake() {
        let placer = FruitPlacer::new(10, 10, 64);
        let snake = Snake::new(Cell::new(5, 5), Direction::Right, 5);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..500 {
            let cell = placer.place(&snake, &mut rng).unwrap();
            assert!(!snake.occupies(cell));
            assert!((0..10).contains(&cell.x));
            assert!((0..10).contains(&cell.y));
        }
    }

    #[test]
    fn test_finds_last_free_cell() {
        // 3x1 grid with a 2-cell snake leaves exactly one free cell
        let placer = FruitPlacer::new(3, 1, 0);
        let snake = Snake::from_cells([Cell::new(0, 0), Cell::new(1, 0)]);
        let mut rng = StdRng::seed_from_u64(9);

        assert_eq!(placer.place(&snake, &mut rng), Ok(Cell::new(2, 0)));
    }

    #[test]
    fn test_fallback_scan_after_exhausted_draws() {
        let placer = FruitPlacer::new(4, 4, 1);
        // every cell but (3, 3)
        let cells = (0..4)
            .flat_map(|y| (0..4).map(move |x| Cell::new(x, y)))
            .filter(|c| *c != Cell::new(3, 3));
        let snake = Snake::from_cells(cells);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            assert_eq!(placer.place(&snake, &mut rng), Ok(Cell::new(3, 3)));
        }
    }

    #[test]
    fn test_full_grid() {
        let placer = FruitPlacer::new(2, 1, 16);
        let snake = Snake::from_cells([Cell::new(0, 0), Cell::new(1, 0)]);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(placer.place(&snake, &mut rng), Err(GameError::GridFull));
    }

    #[test]
    fn test_largest_grid() {
        let side = MAX_GRID_SIDE;
        let placer = FruitPlacer::new(side, side, 4);
        let snake = Snake::new(Cell::new(5, 0), Direction::Right, 3);
        let mut rng = StdRng::seed_from_u64(4);

        let cell = placer.place(&snake, &mut rng).unwrap();
        assert!(in_bounds(cell, side, side));
        assert!(!snake.occupies(cell));
    }

    #[test]
    fn test_covers_every_free_cell() {
        let placer = FruitPlacer::new(3, 3, 8);
        let snake = Snake::new(Cell::new(1, 1), Direction::Right, 2);
        let mut rng = StdRng::seed_from_u64(11);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(placer.place(&snake, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 7);
    }
}
