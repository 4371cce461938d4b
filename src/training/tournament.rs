//! Pairing and scoring strategies for one generation.
//!
//! Both strategies reset every agent's fitness, play their matches, and
//! return a ranking of every slot (best first) that selection consumes.

use std::cmp::Reverse;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::episode::{
    derive_seed, match_seed, play_match, MatchContext, MatchOutcome, MatchResult, PAIRING_STREAM,
};
use crate::ai::Agent;
use crate::error::TrainingError;

pub const WIN_POINTS: u32 = 3;
pub const TIE_POINTS: u32 = 1;
pub const LOSS_POINTS: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentKind {
    /// Shuffled pairings repeated `fights_per_agent` times, ranked by points.
    #[default]
    RoundRobin,
    /// Single elimination until at most `winners` agents remain.
    Bracket,
}

/// Tournament configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub kind: TournamentKind,
    /// Number of shuffled sub-rounds per generation (round-robin only).
    pub fights_per_agent: usize,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        TournamentConfig {
            kind: TournamentKind::RoundRobin,
            fights_per_agent: 5,
        }
    }
}

impl TournamentConfig {
    /// Build the strategy described by this configuration.
    pub fn build(&self, winners: usize) -> Box<dyn Tournament> {
        match self.kind {
            TournamentKind::RoundRobin => Box::new(RoundRobin {
                fights_per_agent: self.fights_per_agent,
            }),
            TournamentKind::Bracket => Box::new(Bracket { winners }),
        }
    }
}

/// Everything a tournament needs to know about the generation it scores.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext {
    pub generation: usize,
    pub base_seed: u64,
    pub parallel: bool,
    pub matches: MatchContext,
}

/// Outcome of scoring one generation.
#[derive(Debug, Clone)]
pub struct TournamentReport {
    /// Slot indices, best first. Always a permutation of `0..agents`.
    pub ranking: Vec<usize>,
    pub results: Vec<MatchResult>,
}

/// A pairing and scoring strategy.
pub trait Tournament: Send + Sync {
    fn name(&self) -> &'static str;

    /// Play the generation, writing fitness into `agents`, and rank them.
    fn run(
        &self,
        agents: &mut [Agent],
        context: &GenerationContext,
    ) -> Result<TournamentReport, TrainingError>;
}

/// Scored round-robin: shuffle, pair neighbours, repeat; 3/1/0 points.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    pub fights_per_agent: usize,
}

impl Tournament for RoundRobin {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn run(
        &self,
        agents: &mut [Agent],
        context: &GenerationContext,
    ) -> Result<TournamentReport, TrainingError> {
        reset_fitness(agents);
        let mut rng = pairing_rng(context);
        let mut order: Vec<usize> = (0..agents.len()).collect();
        let mut results = Vec::with_capacity(self.fights_per_agent * agents.len() / 2);

        for _ in 0..self.fights_per_agent {
            order.shuffle(&mut rng);
            let pairs = pair_up(&order);
            let round = play_round(agents, &pairs, context, results.len())?;
            for result in &round {
                award(agents, result);
            }
            results.extend(round);
        }

        let mut ranking: Vec<usize> = (0..agents.len()).collect();
        ranking.sort_by_key(|&slot| Reverse(agents[slot].fitness()));
        Ok(TournamentReport { ranking, results })
    }
}

/// Bracket elimination: winners advance until no more than `winners`
/// entrants remain (or an odd number is left). On a tie the agent that
/// moved second advances.
#[derive(Debug, Clone)]
pub struct Bracket {
    pub winners: usize,
}

impl Tournament for Bracket {
    fn name(&self) -> &'static str {
        "bracket"
    }

    fn run(
        &self,
        agents: &mut [Agent],
        context: &GenerationContext,
    ) -> Result<TournamentReport, TrainingError> {
        reset_fitness(agents);
        let mut rng = pairing_rng(context);
        let mut entrants: Vec<usize> = (0..agents.len()).collect();
        entrants.shuffle(&mut rng);

        let mut survived = vec![0usize; agents.len()];
        let mut results = Vec::with_capacity(agents.len());

        while entrants.len() > self.winners && entrants.len() >= 2 && entrants.len() % 2 == 0 {
            let pairs = pair_up(&entrants);
            let round = play_round(agents, &pairs, context, results.len())?;
            entrants.clear();
            for result in &round {
                award(agents, result);
                let advancing = match result.outcome {
                    MatchOutcome::FirstWins => result.first,
                    MatchOutcome::SecondWins | MatchOutcome::Tie => result.second,
                };
                survived[advancing] += 1;
                entrants.push(advancing);
            }
            results.extend(round);
        }

        let mut ranking: Vec<usize> = (0..agents.len()).collect();
        ranking.sort_by_key(|&slot| Reverse((survived[slot], agents[slot].fitness())));
        Ok(TournamentReport { ranking, results })
    }
}

fn reset_fitness(agents: &mut [Agent]) {
    for agent in agents.iter_mut() {
        agent.reset_fitness();
    }
}

fn pairing_rng(context: &GenerationContext) -> StdRng {
    StdRng::seed_from_u64(derive_seed(
        context.base_seed,
        &[PAIRING_STREAM, context.generation as u64],
    ))
}

/// Pair neighbours: `[a, b, c, d]` becomes `[(a, b), (c, d)]`.
fn pair_up(order: &[usize]) -> Vec<(usize, usize)> {
    order.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Play independent matches, optionally in parallel. Each match is seeded by
/// its index within the generation, so the results do not depend on
/// scheduling and come back in pairing order.
fn play_round(
    agents: &[Agent],
    pairs: &[(usize, usize)],
    context: &GenerationContext,
    first_match_index: usize,
) -> Result<Vec<MatchResult>, TrainingError> {
    let play = |(offset, &(first, second)): (usize, &(usize, usize))| {
        let seed = match_seed(
            context.base_seed,
            context.generation,
            first_match_index + offset,
        );
        play_match(&agents[first], &agents[second], &context.matches, seed)
    };

    if context.parallel {
        pairs.par_iter().enumerate().map(play).collect()
    } else {
        pairs.iter().enumerate().map(play).collect()
    }
}

/// Credit both participants of a finished match.
fn award(agents: &mut [Agent], result: &MatchResult) {
    let (first_points, second_points) = match result.outcome {
        MatchOutcome::FirstWins => (WIN_POINTS, LOSS_POINTS),
        MatchOutcome::SecondWins => (LOSS_POINTS, WIN_POINTS),
        MatchOutcome::Tie => (TIE_POINTS, TIE_POINTS),
    };
    agents[result.first].add_fitness(first_points);
    agents[result.second].add_fitness(second_points);
}
