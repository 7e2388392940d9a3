pub mod renderer;

pub use renderer::{Renderer, Tile, tiles};
