pub mod collision;
pub mod game_loop;
pub mod grid;
pub mod input;
pub mod render;
pub mod terminal;

pub use game_loop::{Game, Outcome, Status};
pub use grid::{Grid, Point};
pub use input::{Direction, Input, KeyScheme};
