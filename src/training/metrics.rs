use std::collections::VecDeque;

use serde::Serialize;

use crate::ai::Agent;
use crate::training::episode::{MatchOutcome, MatchResult};

/// Summary of one scored generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub explore_percent: f64,
    pub matches: usize,
    pub first_player_wins: usize,
    pub second_player_wins: usize,
    pub ties: usize,
    pub average_game_length: f32,
    pub best_fitness: u32,
    pub mean_fitness: f32,
}

impl GenerationSummary {
    pub fn new(
        generation: usize,
        explore_percent: f64,
        results: &[MatchResult],
        agents: &[Agent],
    ) -> Self {
        let count = |outcome: MatchOutcome| {
            results.iter().filter(|r| r.outcome == outcome).count()
        };
        let total_moves: usize = results.iter().map(|r| r.moves).sum();
        let average_game_length = if results.is_empty() {
            0.0
        } else {
            total_moves as f32 / results.len() as f32
        };
        let total_fitness: u32 = agents.iter().map(|a| a.fitness()).sum();
        let mean_fitness = if agents.is_empty() {
            0.0
        } else {
            total_fitness as f32 / agents.len() as f32
        };

        GenerationSummary {
            generation,
            explore_percent,
            matches: results.len(),
            first_player_wins: count(MatchOutcome::FirstWins),
            second_player_wins: count(MatchOutcome::SecondWins),
            ties: count(MatchOutcome::Tie),
            average_game_length,
            best_fitness: agents.iter().map(|a| a.fitness()).max().unwrap_or(0),
            mean_fitness,
        }
    }
}

/// Training metrics tracker with rolling window computations.
#[derive(Debug)]
pub struct TrainingMetrics {
    generations: VecDeque<GenerationSummary>,
    capacity: usize,
    total_generations: usize, // lifetime count, never capped
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            generations: VecDeque::with_capacity(capacity),
            capacity,
            total_generations: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_generation(&mut self, summary: GenerationSummary) {
        self.total_generations += 1;
        self.generations.push_back(summary);
        if self.generations.len() > self.capacity {
            self.generations.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&GenerationSummary> {
        self.generations.back()
    }

    fn window(&self, last_n: usize) -> impl Iterator<Item = &GenerationSummary> + '_ {
        self.generations.iter().rev().take(last_n)
    }

    /// Share of matches won by the player moving first in the last N generations.
    pub fn first_player_win_rate(&self, last_n: usize) -> f32 {
        let (wins, matches) = self
            .window(last_n)
            .fold((0, 0), |(w, m), s| (w + s.first_player_wins, m + s.matches));
        if matches == 0 {
            return 0.0;
        }
        wins as f32 / matches as f32
    }

    /// Tie rate in the last N generations.
    pub fn tie_rate(&self, last_n: usize) -> f32 {
        let (ties, matches) = self
            .window(last_n)
            .fold((0, 0), |(t, m), s| (t + s.ties, m + s.matches));
        if matches == 0 {
            return 0.0;
        }
        ties as f32 / matches as f32
    }

    /// Average game length over the last N generations, weighted by matches.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let (moves, matches) = self.window(last_n).fold((0.0, 0), |(mv, m), s| {
            (mv + s.average_game_length * s.matches as f32, m + s.matches)
        });
        if matches == 0 {
            return 0.0;
        }
        moves / matches as f32
    }

    pub fn total_generations(&self) -> usize {
        self.total_generations
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn summary(first: usize, second: usize, ties: usize, length: f32) -> GenerationSummary {
        GenerationSummary {
            generation: 0,
            explore_percent: 0.0,
            matches: first + second + ties,
            first_player_wins: first,
            second_player_wins: second,
            ties,
            average_game_length: length,
            best_fitness: 0,
            mean_fitness: 0.0,
        }
    }

    #[test]
    fn test_summary_from_results() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut agents: Vec<Agent> = (0..4).map(|id| Agent::random(id, &mut rng)).collect();
        agents[0].add_fitness(3);
        agents[2].add_fitness(1);
        agents[3].add_fitness(1);
        let results = [
            MatchResult {
                first: 0,
                second: 1,
                outcome: MatchOutcome::FirstWins,
                moves: 10,
            },
            MatchResult {
                first: 2,
                second: 3,
                outcome: MatchOutcome::Tie,
                moves: 42,
            },
        ];

        let s = GenerationSummary::new(5, 12.5, &results, &agents);
        assert_eq!(s.generation, 5);
        assert_eq!(s.matches, 2);
        assert_eq!(s.first_player_wins, 1);
        assert_eq!(s.second_player_wins, 0);
        assert_eq!(s.ties, 1);
        assert!((s.average_game_length - 26.0).abs() < 1e-6);
        assert_eq!(s.best_fitness, 3);
        assert!((s.mean_fitness - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_first_player_win_rate() {
        let mut m = TrainingMetrics::new();
        m.record_generation(summary(7, 3, 0, 10.0));
        assert!((m.first_player_win_rate(10) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_tie_rate() {
        let mut m = TrainingMetrics::new();
        m.record_generation(summary(1, 0, 1, 42.0));
        assert!((m.tie_rate(10) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_average_game_length_weighted() {
        let mut m = TrainingMetrics::new();
        m.record_generation(summary(2, 0, 0, 20.0));
        m.record_generation(summary(1, 1, 0, 30.0));
        assert!((m.average_game_length(10) - 25.0).abs() < 1e-6);
        // Only the latest generation
        assert!((m.average_game_length(1) - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_capacity_caps_window_not_total() {
        let mut m = TrainingMetrics::with_capacity(2);
        for _ in 0..5 {
            m.record_generation(summary(1, 0, 0, 7.0));
        }
        assert_eq!(m.total_generations(), 5);
        assert_eq!(m.generations.len(), 2);
        assert!(m.latest().is_some());
    }

    #[test]
    fn test_empty_metrics() {
        let m = TrainingMetrics::new();
        assert_eq!(m.first_player_win_rate(10), 0.0);
        assert_eq!(m.tie_rate(10), 0.0);
        assert_eq!(m.average_game_length(10), 0.0);
    }
}
