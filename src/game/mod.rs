//! Core Connect Four game logic: board representation, player types, and the
//! per-game state machine.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, MoveError, CELLS, COLS, ROWS};
pub use player::Player;
pub use state::{GameState, GameStatus};
