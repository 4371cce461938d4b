use rand::Rng;

use super::agent::Agent;
use super::exploration::ExplorationSchedule;
use super::network::{Activation, OUTPUTS};
use crate::game::{Board, Player, COLS};

/// The column an agent decided on and how it got there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveChoice {
    pub column: usize,
    /// Network outputs, absent when the move was a random exploration.
    pub outputs: Option<[f64; OUTPUTS]>,
}

/// Index of the highest output among columns that are not full; ties go to
/// the lowest index. `None` only if every column is full.
pub fn masked_argmax(outputs: &[f64; OUTPUTS], board: &Board) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (col, &value) in outputs.iter().enumerate() {
        if board.is_column_full(col) {
            continue;
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((col, value)),
        }
    }
    best.map(|(col, _)| col)
}

/// Random playable column: scan forward from a uniformly random start,
/// wrapping around and skipping full columns.
pub fn random_legal_column<R: Rng>(board: &Board, rng: &mut R) -> Option<usize> {
    let start = rng.random_range(0..COLS);
    (0..COLS)
        .map(|offset| (start + offset) % COLS)
        .find(|&col| !board.is_column_full(col))
}

/// Pick a move for `agent` playing `player`: explore with probability
/// `explore_percent`, otherwise take the masked argmax of its network.
pub fn choose_move<R: Rng>(
    agent: &Agent,
    board: &Board,
    player: Player,
    explore_percent: f64,
    activation: Activation,
    rng: &mut R,
) -> Option<MoveChoice> {
    if ExplorationSchedule::should_explore(explore_percent, rng) {
        return random_legal_column(board, rng).map(|column| MoveChoice {
            column,
            outputs: None,
        });
    }

    let outputs = agent.evaluate(board, player, activation);
    masked_argmax(&outputs, board).map(|column| MoveChoice {
        column,
        outputs: Some(outputs),
    })
}
