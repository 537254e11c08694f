use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{Action, StateKey};
use crate::training::episode::TraceStep;

/// Actor hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub trace_decay: f64,
    /// Initial exploration rate.
    pub epsilon: f64,
    /// Multiplicative decay applied to epsilon once per episode.
    pub epsilon_decay: f64,
}

impl Default for ActorConfig {
    fn default() -> Self {
        ActorConfig {
            learning_rate: 0.1,
            discount_factor: 0.9,
            trace_decay: 0.9,
            epsilon: 0.9,
            epsilon_decay: 0.99,
        }
    }
}

/// The policy side of the actor-critic pair.
///
/// Desirabilities and eligibility traces are keyed by (state, action).
/// Unseen pairs read as zero without being inserted; the policy table grows
/// only when a pair is actually updated.
pub struct Actor {
    config: ActorConfig,
    policy: HashMap<(StateKey, Action), f64>,
    eligibility: HashMap<(StateKey, Action), f64>,
    epsilon: f64,
    rng: StdRng,
    random_actions: u64,
    greedy_actions: u64,
}

impl Actor {
    pub fn new(config: ActorConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let epsilon = config.epsilon;
        Actor {
            config,
            policy: HashMap::new(),
            eligibility: HashMap::new(),
            epsilon,
            rng,
            random_actions: 0,
            greedy_actions: 0,
        }
    }

    /// Desirability of performing `action` in `state`; zero when unseen.
    pub fn desirability(&self, state: &StateKey, action: &Action) -> f64 {
        self.policy
            .get(&(state.clone(), *action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Current eligibility trace of a pair; zero when never marked.
    pub fn eligibility(&self, state: &StateKey, action: &Action) -> f64 {
        self.eligibility
            .get(&(state.clone(), *action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Epsilon-greedy selection over `legal`. Returns `None` when no action
    /// is available — the terminal sentinel; callers check the board status
    /// before trusting an action is coming.
    ///
    /// Greedy ties break by enumeration order (first maximum wins), keeping
    /// selection deterministic for a given seed.
    pub fn select_action(&mut self, state: &StateKey, legal: &[Action]) -> Option<Action> {
        if legal.is_empty() {
            return None;
        }

        if self.rng.random::<f64>() < self.epsilon {
            self.random_actions += 1;
            let idx = self.rng.random_range(0..legal.len());
            return Some(legal[idx]);
        }

        self.greedy_actions += 1;
        let mut best = legal[0];
        let mut best_value = self.desirability(state, &legal[0]);
        for &action in &legal[1..] {
            let value = self.desirability(state, &action);
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        Some(best)
    }

    /// Set the trace of the just-taken pair to 1 (replacing, not
    /// accumulating).
    pub fn mark_visited(&mut self, state: &StateKey, action: &Action) {
        self.eligibility.insert((state.clone(), *action), 1.0);
    }

    /// Backward sweep over the episode's recorded pairs: bump each pair's
    /// desirability by `lr * td_error * trace`, then decay its trace.
    pub fn learn(&mut self, visited: &[TraceStep], td_error: f64) {
        let lr = self.config.learning_rate;
        let decay = self.config.discount_factor * self.config.trace_decay;
        for step in visited {
            let key = (step.state.clone(), step.action);
            if let Some(trace) = self.eligibility.get_mut(&key) {
                let t = *trace;
                *trace = t * decay;
                if t != 0.0 {
                    *self.policy.entry(key).or_insert(0.0) += lr * td_error * t;
                }
            }
        }
    }

    pub fn reset_eligibility(&mut self) {
        self.eligibility.clear();
    }

    /// Decay epsilon multiplicatively; called once per episode.
    pub fn decay_epsilon(&mut self) {
        self.epsilon *= self.config.epsilon_decay;
    }

    /// Drop exploration entirely; the run driver calls this for the final
    /// episode so it demonstrates the greedy policy.
    pub fn force_greedy(&mut self) {
        self.epsilon = 0.0;
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn random_actions(&self) -> u64 {
        self.random_actions
    }

    pub fn greedy_actions(&self) -> u64 {
        self.greedy_actions
    }

    pub fn policy_size(&self) -> usize {
        self.policy.len()
    }

    pub fn mean_policy_magnitude(&self) -> f64 {
        mean_abs(self.policy.values())
    }

    pub fn mean_eligibility_magnitude(&self) -> f64 {
        mean_abs(self.eligibility.values())
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
