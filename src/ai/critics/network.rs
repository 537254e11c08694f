use burn::backend::{Autodiff, NdArray};
use burn::prelude::*;

use crate::ai::critic::{Critic, CriticConfig, CriticStats};
use crate::ai::networks::{mean_abs_tensors, ValueNetwork};
use crate::error::TrainingError;
use crate::game::StateKey;
use crate::training::episode::TraceStep;

type InferBackend = NdArray<f32>;
type TrainBackend = Autodiff<InferBackend>;

/// TD(lambda) critic backed by the value network.
///
/// Eligibility lives per parameter, not per state: `mark_visited`
/// accumulates the current state's value gradient into the trace tensors,
/// and `learn` applies one whole-parameter update followed by one trace
/// decay per step. Skipping the trace accumulation and doing plain
/// gradient descent would be a different (weaker) algorithm.
#[derive(Debug)]
pub struct NetworkCritic {
    network: ValueNetwork<TrainBackend>,
    traces: Vec<Tensor<InferBackend, 2>>,
    learning_rate: f64,
    discount_factor: f64,
    trace_decay: f64,
}

impl NetworkCritic {
    /// Build the critic for a board with `cell_count` cells. The configured
    /// layer sequence must start at `cell_count` and end in a single output
    /// unit; anything else is a fatal setup error.
    pub fn new(config: &CriticConfig, cell_count: usize, seed: u64) -> Result<Self, TrainingError> {
        let first = config.layer_sizes.first().copied().unwrap_or(0);
        if config.layer_sizes.len() < 2 || first != cell_count {
            return Err(TrainingError::LayerMismatch {
                configured: first,
                cells: cell_count,
            });
        }
        let last = *config.layer_sizes.last().unwrap_or(&0);
        if last != 1 {
            return Err(TrainingError::BadOutputLayer(last));
        }

        let device = Default::default();
        let network = ValueNetwork::new(&config.layer_sizes, seed, &device);
        let traces = network.zero_traces();
        Ok(NetworkCritic {
            network,
            traces,
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            trace_decay: config.trace_decay,
        })
    }
}

impl Critic for NetworkCritic {
    fn value(&self, state: &StateKey) -> f64 {
        self.network.value_of(&state.to_input_vec()) as f64
    }

    fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Accumulate dV/dtheta for the current state into the traces.
    fn mark_visited(&mut self, state: &StateKey) {
        let grads = self.network.value_gradients(&state.to_input_vec());
        for (trace, grad) in self.traces.iter_mut().zip(grads) {
            *trace = trace.clone() + grad;
        }
    }

    /// One whole-parameter update and one trace decay per step; the visited
    /// list is irrelevant because traces are keyed by parameter.
    fn learn(&mut self, _visited: &[TraceStep], td_error: f64) {
        let step = (self.learning_rate * td_error) as f32;
        self.network.apply_delta(&self.traces, step);

        let decay = (self.discount_factor * self.trace_decay) as f32;
        for trace in self.traces.iter_mut() {
            *trace = trace.clone().mul_scalar(decay);
        }
    }

    fn reset_eligibility(&mut self) {
        self.traces = self.network.zero_traces();
    }

    fn stats(&self) -> CriticStats {
        CriticStats {
            mean_value_magnitude: self.network.mean_weight_magnitude() as f64,
            mean_eligibility_magnitude: mean_abs_tensors(&self.traces) as f64,
        }
    }
}
