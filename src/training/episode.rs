use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::ai::{choose_move, Activation, Agent};
use crate::error::TrainingError;
use crate::game::{GameState, GameStatus, Player};

/// Seed stream tags, so the same base seed never feeds two consumers the
/// same sequence.
pub const INIT_STREAM: u64 = 1;
pub const PAIRING_STREAM: u64 = 2;
pub const MATCH_STREAM: u64 = 3;
pub const REPRODUCTION_STREAM: u64 = 4;

/// Per-match settings shared by every game of a generation.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext {
    pub explore_percent: f64,
    pub activation: Activation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    FirstWins,
    SecondWins,
    Tie,
}

/// Result of one game. `first` moved first as player one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub first: usize,
    pub second: usize,
    pub outcome: MatchOutcome,
    pub moves: usize,
}

impl MatchResult {
    /// Slot index of the winner, if there is one.
    pub fn winner(&self) -> Option<usize> {
        match self.outcome {
            MatchOutcome::FirstWins => Some(self.first),
            MatchOutcome::SecondWins => Some(self.second),
            MatchOutcome::Tie => None,
        }
    }
}

/// Play one game between two agents with its own random stream.
///
/// Exploration and network moves both skip full columns, so a failed drop
/// means the legality check was bypassed; it is reported as
/// [`TrainingError::IllegalMove`] rather than retried.
pub fn play_match(
    first: &Agent,
    second: &Agent,
    context: &MatchContext,
    seed: u64,
) -> Result<MatchResult, TrainingError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::initial();

    while !state.is_terminal() {
        let player = state.current_player();
        let agent = match player {
            Player::One => first,
            Player::Two => second,
        };

        let choice = choose_move(
            agent,
            state.board(),
            player,
            context.explore_percent,
            context.activation,
            &mut rng,
        )
        .ok_or(TrainingError::NoLegalMove { agent: agent.id() })?;

        match choice.outputs {
            Some(outputs) => debug!(
                agent = agent.id(),
                player = player.name(),
                column = choice.column,
                ?outputs,
                "network move"
            ),
            None => debug!(
                agent = agent.id(),
                player = player.name(),
                column = choice.column,
                "random move"
            ),
        }

        state
            .apply_move(choice.column)
            .map_err(|_| TrainingError::IllegalMove {
                agent: agent.id(),
                column: choice.column,
                legal: state.board().legal_columns(),
            })?;
        trace!("board after move {}:\n{}", state.moves_played(), state.board());
    }

    let outcome = match state.status() {
        GameStatus::Win(Player::One) => MatchOutcome::FirstWins,
        GameStatus::Win(Player::Two) => MatchOutcome::SecondWins,
        _ => MatchOutcome::Tie,
    };
    debug!(
        first = first.id(),
        second = second.id(),
        ?outcome,
        moves = state.moves_played(),
        "match finished"
    );

    Ok(MatchResult {
        first: first.id(),
        second: second.id(),
        outcome,
        moves: state.moves_played(),
    })
}

/// Derive a deterministic seed from a base seed and a path of indices, e.g.
/// `[MATCH_STREAM, generation, match_index]`.
pub fn derive_seed(base_seed: u64, path: &[u64]) -> u64 {
    // FNV-1a-inspired mixing for deterministic, well-distributed seeds
    let mut hash = base_seed ^ 0x517cc1b727220a95;
    for &index in path {
        hash = hash.wrapping_mul(0x100000001b3);
        hash ^= index;
        hash = hash.wrapping_mul(0x100000001b3);
        hash ^= index >> 32;
    }
    hash
}

/// Seed of the `match_index`-th game in `generation`.
pub fn match_seed(base_seed: u64, generation: usize, match_index: usize) -> u64 {
    derive_seed(
        base_seed,
        &[MATCH_STREAM, generation as u64, match_index as u64],
    )
}
