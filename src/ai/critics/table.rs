use std::collections::HashMap;

use crate::ai::critic::{Critic, CriticConfig, CriticStats};
use crate::game::StateKey;
use crate::training::episode::TraceStep;

/// Exact critic for small discrete state spaces: one value and one
/// eligibility scalar per visited state.
///
/// Unseen states read as value 0.0 without being inserted; the table grows
/// only when a state is actually updated, so its size tracks the states
/// discovered during training.
pub struct TabularCritic {
    learning_rate: f64,
    discount_factor: f64,
    trace_decay: f64,
    values: HashMap<StateKey, f64>,
    eligibility: HashMap<StateKey, f64>,
}

impl TabularCritic {
    pub fn new(config: &CriticConfig) -> Self {
        TabularCritic {
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            trace_decay: config.trace_decay,
            values: HashMap::new(),
            eligibility: HashMap::new(),
        }
    }

    /// Number of states with a stored value.
    pub fn states_discovered(&self) -> usize {
        self.values.len()
    }

    /// Current trace of a state; zero when never marked.
    pub fn eligibility(&self, state: &StateKey) -> f64 {
        self.eligibility.get(state).copied().unwrap_or(0.0)
    }
}

impl Critic for TabularCritic {
    fn value(&self, state: &StateKey) -> f64 {
        self.values.get(state).copied().unwrap_or(0.0)
    }

    fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    fn mark_visited(&mut self, state: &StateKey) {
        self.eligibility.insert(state.clone(), 1.0);
    }

    fn learn(&mut self, visited: &[TraceStep], td_error: f64) {
        let lr = self.learning_rate;
        let decay = self.discount_factor * self.trace_decay;
        for step in visited {
            if let Some(trace) = self.eligibility.get_mut(&step.state) {
                let t = *trace;
                *trace = t * decay;
                if t != 0.0 {
                    *self.values.entry(step.state.clone()).or_insert(0.0) += lr * td_error * t;
                }
            }
        }
    }

    fn reset_eligibility(&mut self) {
        self.eligibility.clear();
    }

    fn stats(&self) -> CriticStats {
        CriticStats {
            mean_value_magnitude: mean_abs(self.values.values()),
            mean_eligibility_magnitude: mean_abs(self.eligibility.values()),
        }
    }
}

fn mean_abs<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v.abs();
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
