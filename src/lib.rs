//! # GA Connect Four
//!
//! Trains Connect Four playing networks with a genetic algorithm. A
//! population of small feed-forward networks plays scored tournaments
//! against itself; the top agents survive unchanged and refill the rest of
//! the population with mutated copies. The best network's weights are
//! written to a plain text file.
//!
//! ## Modules
//!
//! - [`game`]: board, players and the move/turn state machine
//! - [`ai`]: networks, agents, exploration schedule and move selection
//! - [`training`]: matches, tournaments, reproduction and the training loop
//! - [`export`]: weight file and run summary
//! - [`config`]: TOML configuration loading and validation
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod export;
pub mod game;
pub mod logging;
pub mod training;
