use serde::{Deserialize, Serialize};

use crate::game::StateKey;
use crate::training::episode::TraceStep;

/// Which value-estimation strategy the critic uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriticStrategy {
    /// Exact per-state lookup table.
    Table,
    /// Feed-forward value network over the encoded state.
    Network,
}

/// Critic hyperparameters, shared by both strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticConfig {
    pub strategy: CriticStrategy,
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub trace_decay: f64,
    /// Layer widths of the value network, input through output. The input
    /// width must match the board's cell count; the output must be 1.
    pub layer_sizes: Vec<usize>,
}

impl Default for CriticConfig {
    fn default() -> Self {
        CriticConfig {
            strategy: CriticStrategy::Table,
            learning_rate: 0.1,
            discount_factor: 0.9,
            trace_decay: 0.9,
            layer_sizes: vec![16, 8, 1],
        }
    }
}

/// Aggregate magnitudes of the critic's internal state, for run reports and
/// divergence detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticStats {
    pub mean_value_magnitude: f64,
    pub mean_eligibility_magnitude: f64,
}

/// Common contract of the two value-estimation strategies.
///
/// The tabular critic keys its value and eligibility stores by state; the
/// network critic keys eligibility by parameter. Both are driven through
/// the same three-phase step: `mark_visited` for the state just acted from,
/// `td_error` between old and new state, then `learn` for the backward
/// sweep.
pub trait Critic {
    /// Estimated value of being in `state`.
    fn value(&self, state: &StateKey) -> f64;

    /// Discount applied to future state values.
    fn discount_factor(&self) -> f64;

    /// One-step TD error: `reward + gamma * V(next) - V(prev)`.
    fn td_error(&self, prev: &StateKey, next: &StateKey, reward: f64) -> f64 {
        reward + self.discount_factor() * self.value(next) - self.value(prev)
    }

    /// Refresh the eligibility of the state just acted from.
    fn mark_visited(&mut self, state: &StateKey);

    /// Backward sweep: apply the trace-weighted value update for this step
    /// and decay the traces.
    ///
    /// The tabular strategy walks `visited` and touches each recorded
    /// state; the network strategy's traces are per-parameter, so it
    /// applies one whole-parameter update regardless of the list.
    fn learn(&mut self, visited: &[TraceStep], td_error: f64);

    /// Zero every eligibility trace; called at episode start.
    fn reset_eligibility(&mut self);

    fn stats(&self) -> CriticStats;
}
