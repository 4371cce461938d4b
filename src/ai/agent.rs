use rand::Rng;

use super::network::{Activation, Network, OUTPUTS};
use crate::game::{Board, Player};

/// How an agent came to occupy its slot in the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Randomly initialised in generation zero.
    Seed,
    /// Unmutated copy of the agent ranked `rank` in the previous generation.
    Retained { rank: usize },
    /// Mutated clone of the agent ranked `parent_rank` in the previous generation.
    Offspring { parent_rank: usize },
}

/// One candidate network in the population.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: usize,
    network: Network,
    fitness: u32,
    origin: Origin,
}

impl Agent {
    pub fn new(id: usize, network: Network, origin: Origin) -> Self {
        Agent {
            id,
            network,
            fitness: 0,
            origin,
        }
    }

    /// Generation-zero agent with freshly initialised weights.
    pub fn random<R: Rng>(id: usize, rng: &mut R) -> Self {
        Self::new(id, Network::random(rng), Origin::Seed)
    }

    /// Slot index within the population.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn weights(&self) -> &[f64] {
        self.network.weights()
    }

    pub fn fitness(&self) -> u32 {
        self.fitness
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn reset_fitness(&mut self) {
        self.fitness = 0;
    }

    pub fn add_fitness(&mut self, points: u32) {
        self.fitness += points;
    }

    /// Score every column for `player` on the current board.
    pub fn evaluate(&self, board: &Board, player: Player, activation: Activation) -> [f64; OUTPUTS] {
        self.network
            .evaluate(&board.to_network_input(player), activation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fitness_accumulates_and_resets() {
        let mut agent = Agent::random(0, &mut StdRng::seed_from_u64(1));
        assert_eq!(agent.fitness(), 0);
        agent.add_fitness(3);
        agent.add_fitness(1);
        assert_eq!(agent.fitness(), 4);
        agent.reset_fitness();
        assert_eq!(agent.fitness(), 0);
    }

    #[test]
    fn test_clone_does_not_alias_weights() {
        let parent = Agent::random(2, &mut StdRng::seed_from_u64(9));
        let mut child = parent.clone();
        child.network.weights_mut()[0] += 1.0;
        assert_ne!(parent.weights()[0], child.weights()[0]);
        assert_eq!(parent.origin(), Origin::Seed);
    }

    #[test]
    fn test_evaluate_sees_own_perspective() {
        let agent = Agent::random(0, &mut StdRng::seed_from_u64(4));
        let mut board = Board::new();
        board.drop_piece(3, Player::One).unwrap();

        let as_one = agent.evaluate(&board, Player::One, Activation::Tanh);
        let as_two = agent.evaluate(&board, Player::Two, Activation::Tanh);
        // With tanh and no biases the network is odd, so flipping the
        // perspective negates every output.
        for (a, b) in as_one.iter().zip(as_two.iter()) {
            assert!((a + b).abs() < 1e-12);
        }
    }
}
