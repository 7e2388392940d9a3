use thiserror::Error;

/// Errors raised by the game core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("speed must be a finite number of ticks per second above zero, got {0}")]
    InvalidSpeed(f64),

    #[error("a {cols}x{rows} grid cannot hold a snake of length {snake_len} plus a fruit")]
    InvalidGrid {
        cols: usize,
        rows: usize,
        snake_len: usize,
    },

    #[error("speed range {min}..={max} is empty or not positive")]
    InvalidSpeedRange { min: f64, max: f64 },

    #[error("bonus flip probability {0} is outside 0..=1")]
    InvalidProbability(f64),

    #[error("no free cell left for fruit")]
    GridFull,

    #[error("invalid starting layout: {0}")]
    InvalidLayout(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GameError::GridFull.to_string(),
            "no free cell left for fruit"
        );
        assert_eq!(
            GameError::InvalidGrid {
                cols: 1,
                rows: 2,
                snake_len: 2
            }
            .to_string(),
            "a 1x2 grid cannot hold a snake of length 2 plus a fruit"
        );
    }
}
