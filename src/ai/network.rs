//! Fixed-topology feed-forward network evaluated over a flat weight vector.
//!
//! Layout: the first `INPUTS * HIDDEN` weights connect inputs to the hidden
//! layer (`[h * INPUTS + i]`), the remaining `HIDDEN * OUTPUTS` connect the
//! hidden layer to the outputs (`[o * HIDDEN + h]`). There are no biases.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{CELLS, COLS};

/// One input per board cell.
pub const INPUTS: usize = CELLS;
/// Hidden layer width, roughly `sqrt(INPUTS * OUTPUTS)`.
pub const HIDDEN: usize = 17;
/// One output per column.
pub const OUTPUTS: usize = COLS;
pub const INPUT_HIDDEN_WEIGHTS: usize = INPUTS * HIDDEN;
pub const HIDDEN_OUTPUT_WEIGHTS: usize = HIDDEN * OUTPUTS;
pub const TOTAL_WEIGHTS: usize = INPUT_HIDDEN_WEIGHTS + HIDDEN_OUTPUT_WEIGHTS;

const LEAKY_SLOPE: f64 = 0.01;

/// Activation scheme applied to a whole network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// `tanh` on the hidden layer, linear outputs.
    #[default]
    Tanh,
    /// Leaky ReLU on both layers.
    LeakyRelu,
}

impl Activation {
    fn hidden(self, x: f64) -> f64 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::LeakyRelu => leaky_relu(x),
        }
    }

    fn output(self, x: f64) -> f64 {
        match self {
            Activation::Tanh => x,
            Activation::LeakyRelu => leaky_relu(x),
        }
    }
}

/// Network settings shared by the whole population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub activation: Activation,
}

fn leaky_relu(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        LEAKY_SLOPE * x
    }
}

/// Weights of one agent's network.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    weights: Box<[f64; TOTAL_WEIGHTS]>,
}

impl Network {
    /// All-zero network, mostly useful in tests.
    pub fn zeroed() -> Self {
        Network {
            weights: Box::new([0.0; TOTAL_WEIGHTS]),
        }
    }

    /// Draw every weight from `U(-1, 1) * sqrt(1 / fan_in)`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut network = Self::zeroed();
        let input_scale = (1.0 / INPUTS as f64).sqrt();
        let hidden_scale = (1.0 / HIDDEN as f64).sqrt();
        for (idx, w) in network.weights.iter_mut().enumerate() {
            let scale = if idx < INPUT_HIDDEN_WEIGHTS {
                input_scale
            } else {
                hidden_scale
            };
            *w = rng.random_range(-1.0f64..1.0) * scale;
        }
        network
    }

    /// Build a network from a flat weight slice. Returns `None` unless the
    /// slice holds exactly `TOTAL_WEIGHTS` values.
    pub fn from_weights(weights: &[f64]) -> Option<Self> {
        let weights: Box<[f64; TOTAL_WEIGHTS]> =
            weights.to_vec().into_boxed_slice().try_into().ok()?;
        Some(Network { weights })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights[..]
    }

    pub(crate) fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights[..]
    }

    /// Forward pass.
    pub fn evaluate(&self, input: &[f64; INPUTS], activation: Activation) -> [f64; OUTPUTS] {
        let (w1, w2) = self.weights.split_at(INPUT_HIDDEN_WEIGHTS);

        let mut hidden = [0.0; HIDDEN];
        for (h, value) in hidden.iter_mut().enumerate() {
            let row = &w1[h * INPUTS..(h + 1) * INPUTS];
            let sum: f64 = input.iter().zip(row).map(|(x, w)| x * w).sum();
            *value = activation.hidden(sum);
        }

        let mut output = [0.0; OUTPUTS];
        for (o, value) in output.iter_mut().enumerate() {
            let row = &w2[o * HIDDEN..(o + 1) * HIDDEN];
            let sum: f64 = hidden.iter().zip(row).map(|(x, w)| x * w).sum();
            *value = activation.output(sum);
        }
        output
    }
}
