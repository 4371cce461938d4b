use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{Agent, Network, Origin, TOTAL_WEIGHTS};
use crate::error::TrainingError;

/// Magnitude bound applied to mutated weights when clamping is enabled.
pub const WEIGHT_BOUND: f64 = 4.0;

/// Population sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Agents per generation; must be even.
    pub agents: usize,
    /// Top-ranked agents carried over unchanged each generation.
    pub winners: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        PopulationConfig {
            agents: 20,
            winners: 10,
        }
    }
}

/// Point-mutation hyperparameters for offspring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Fraction of weights perturbed per offspring.
    pub rate: f64,
    /// Perturbation is `U(-1, 1) * scale`.
    pub scale: f64,
    /// Clamp mutated weights to `[-WEIGHT_BOUND, WEIGHT_BOUND]`.
    pub clamp: bool,
}

impl Default for MutationConfig {
    fn default() -> Self {
        MutationConfig {
            rate: 0.02,
            scale: 0.15,
            clamp: true,
        }
    }
}

impl MutationConfig {
    /// Point mutations applied to each offspring.
    pub fn mutations(&self) -> usize {
        (TOTAL_WEIGHTS as f64 * self.rate).floor() as usize
    }
}

/// Apply `config.mutations()` independent point mutations. Indices may repeat.
pub fn mutate<R: Rng>(network: &mut Network, config: &MutationConfig, rng: &mut R) {
    let weights = network.weights_mut();
    for _ in 0..config.mutations() {
        let idx = rng.random_range(0..weights.len());
        let mut value = weights[idx] + rng.random_range(-1.0f64..1.0) * config.scale;
        if config.clamp {
            value = value.clamp(-WEIGHT_BOUND, WEIGHT_BOUND);
        }
        weights[idx] = value;
    }
}

/// The agents of one generation.
#[derive(Debug, Clone)]
pub struct Population {
    generation: usize,
    agents: Vec<Agent>,
}

impl Population {
    /// Generation zero: every agent randomly initialised.
    pub fn random<R: Rng>(config: &PopulationConfig, rng: &mut R) -> Result<Self, TrainingError> {
        let mut agents = allocate(config.agents)?;
        agents.extend((0..config.agents).map(|id| Agent::random(id, rng)));
        Ok(Population {
            generation: 0,
            agents,
        })
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Build the next generation from a ranking of this one (best first).
    ///
    /// Slots `0..winners` are verbatim copies of the top-ranked agents. Every
    /// other slot is a clone of a uniformly chosen winner with
    /// `mutation.mutations()` point mutations.
    pub fn next_generation<R: Rng>(
        &self,
        ranking: &[usize],
        config: &PopulationConfig,
        mutation: &MutationConfig,
        rng: &mut R,
    ) -> Result<Population, TrainingError> {
        if ranking.len() < config.winners || config.winners == 0 {
            return Err(TrainingError::EmptyPopulation);
        }
        let survivors = &ranking[..config.winners];

        let mut agents = allocate(self.agents.len())?;
        for (rank, &slot) in survivors.iter().enumerate() {
            let network = self.agents[slot].network().clone();
            agents.push(Agent::new(rank, network, Origin::Retained { rank }));
        }
        for id in config.winners..self.agents.len() {
            let parent_rank = rng.random_range(0..config.winners);
            let mut network = self.agents[survivors[parent_rank]].network().clone();
            mutate(&mut network, mutation, rng);
            agents.push(Agent::new(id, network, Origin::Offspring { parent_rank }));
        }

        Ok(Population {
            generation: self.generation + 1,
            agents,
        })
    }
}

fn allocate(agents: usize) -> Result<Vec<Agent>, TrainingError> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(agents)
        .map_err(|source| TrainingError::Allocation { agents, source })?;
    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(agents: usize, winners: usize) -> PopulationConfig {
        PopulationConfig { agents, winners }
    }

    #[test]
    fn test_random_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let population = Population::random(&config(6, 2), &mut rng).unwrap();
        assert_eq!(population.len(), 6);
        assert_eq!(population.generation(), 0);
        for (slot, agent) in population.agents().iter().enumerate() {
            assert_eq!(agent.id(), slot);
            assert_eq!(agent.origin(), Origin::Seed);
        }
    }

    #[test]
    fn test_mutation_count() {
        assert_eq!(MutationConfig::default().mutations(), 16);
        let config = MutationConfig {
            rate: 1.0,
            ..Default::default()
        };
        assert_eq!(config.mutations(), TOTAL_WEIGHTS);
    }

    #[test]
    fn test_mutate_changes_at_most_mutations_positions() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = MutationConfig::default();
        for _ in 0..20 {
            let parent = Network::random(&mut rng);
            let mut child = parent.clone();
            mutate(&mut child, &config, &mut rng);
            let changed = parent
                .weights()
                .iter()
                .zip(child.weights())
                .filter(|(a, b)| a != b)
                .count();
            assert!(changed >= 1);
            assert!(changed <= config.mutations());
        }
    }

    #[test]
    fn test_mutate_respects_clamp() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut network = Network::from_weights(&[3.95; TOTAL_WEIGHTS]).unwrap();
        let config = MutationConfig {
            rate: 1.0,
            scale: 2.0,
            clamp: true,
        };
        for _ in 0..5 {
            mutate(&mut network, &config, &mut rng);
        }
        assert!(network
            .weights()
            .iter()
            .all(|w| (-WEIGHT_BOUND..=WEIGHT_BOUND).contains(w)));
    }

    #[test]
    fn test_mutate_without_clamp_can_exceed_bound() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut network = Network::from_weights(&[3.99; TOTAL_WEIGHTS]).unwrap();
        let config = MutationConfig {
            rate: 1.0,
            scale: 1.0,
            clamp: false,
        };
        mutate(&mut network, &config, &mut rng);
        assert!(network.weights().iter().any(|&w| w > WEIGHT_BOUND));
    }

    #[test]
    fn test_next_generation_keeps_size_and_winners() {
        let mut rng = StdRng::seed_from_u64(5);
        let cfg = config(8, 3);
        let population = Population::random(&cfg, &mut rng).unwrap();
        let ranking = vec![5, 2, 7, 0, 1, 3, 4, 6];
        let mutation = MutationConfig::default();

        let next = population
            .next_generation(&ranking, &cfg, &mutation, &mut rng)
            .unwrap();

        assert_eq!(next.len(), 8);
        assert_eq!(next.generation(), 1);

        for rank in 0..3 {
            let agent = &next.agents()[rank];
            assert_eq!(agent.origin(), Origin::Retained { rank });
            assert_eq!(agent.weights(), population.agents()[ranking[rank]].weights());
            assert_eq!(agent.fitness(), 0);
        }

        for slot in 3..8 {
            let agent = &next.agents()[slot];
            assert_eq!(agent.id(), slot);
            let Origin::Offspring { parent_rank } = agent.origin() else {
                panic!("slot {slot} should hold an offspring");
            };
            assert!(parent_rank < 3);
            let parent = population.agents()[ranking[parent_rank]].weights();
            let changed = parent
                .iter()
                .zip(agent.weights())
                .filter(|(a, b)| a != b)
                .count();
            assert!(changed <= mutation.mutations());
            assert!(changed >= 1);
        }
    }

    #[test]
    fn test_next_generation_rejects_short_ranking() {
        let mut rng = StdRng::seed_from_u64(6);
        let cfg = config(4, 2);
        let population = Population::random(&cfg, &mut rng).unwrap();
        assert!(population
            .next_generation(&[0], &cfg, &MutationConfig::default(), &mut rng)
            .is_err());
    }
}
