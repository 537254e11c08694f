use serde::{Deserialize, Serialize};

use crate::ai::{Critic, Learner};
use crate::game::{BoardStatus, Environment};
use crate::training::episode::{EpisodeRecord, RunReport, TraceStep};
use crate::training::metrics::{RunSummary, TrainingMetrics};

/// Trainer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_episodes: usize,
    /// Progress line every N episodes.
    pub log_interval: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_episodes: 500,
            log_interval: 50,
        }
    }
}

/// Drives the actor-critic loop over a fixed number of episodes.
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer { config }
    }

    /// Run the full training loop and collect every episode's trace.
    pub fn train(&self, env: &mut Environment, learner: &mut Learner) -> RunReport {
        let mut metrics = TrainingMetrics::new();
        let mut episodes = Vec::with_capacity(self.config.num_episodes);

        println!(
            "Starting training for {} episodes on a {} cell board...",
            self.config.num_episodes,
            env.board().cell_count()
        );

        for episode in 1..=self.config.num_episodes {
            // The last episode demonstrates the greedy target policy.
            if episode == self.config.num_episodes {
                learner.actor.force_greedy();
            }

            let record = self.run_episode(env, learner, &mut metrics);
            metrics.record_episode(record.final_pegs, record.solved());

            if episode % self.config.log_interval == 0 {
                let window = self.config.log_interval;
                println!(
                    "Episode {}/{} | eps: {:.3} | pegs: {} | avg_pegs({}): {:.2} | solve_rate({}): {:.1}% | mean |td|: {:.3}",
                    episode,
                    self.config.num_episodes,
                    learner.actor.epsilon(),
                    record.final_pegs,
                    window,
                    metrics.average_pegs(window),
                    window,
                    metrics.solve_rate(window) * 100.0,
                    metrics.mean_abs_td(window),
                );
            }

            learner.actor.decay_epsilon();
            episodes.push(record);
        }

        let summary = self.summarize(learner, &metrics, &episodes);
        println!("Training complete. Best final peg count: {}", summary.best_final_pegs);

        RunReport { episodes, summary }
    }

    /// One episode: reset everything, then step until the board is terminal.
    ///
    /// Per step, in order: apply the chosen action, pick the next action
    /// from the new state, refresh both eligibilities for the state just
    /// acted from, compute the TD error, sweep the pairs recorded so far,
    /// and only then append the current pair to the trace. A pair's first
    /// update therefore lands on the following step, with its trace still
    /// fresh.
    fn run_episode(
        &self,
        env: &mut Environment,
        learner: &mut Learner,
        metrics: &mut TrainingMetrics,
    ) -> EpisodeRecord {
        env.reset();
        learner.actor.reset_eligibility();
        learner.critic.reset_eligibility();

        let mut trace: Vec<TraceStep> = Vec::new();
        let mut state = env.encode();
        let mut action = learner.actor.select_action(&state, &env.legal_actions());

        while env.status() == BoardStatus::Neutral {
            let current = action.expect("neutral board must offer a legal action");

            let (new_state, reward) = env.step(&current);
            let new_action = learner.actor.select_action(&new_state, &env.legal_actions());

            learner.actor.mark_visited(&state, &current);
            learner.critic.mark_visited(&state);

            let td_error = learner.critic.td_error(&state, &new_state, reward);
            metrics.record_td_error(td_error);

            learner.critic.learn(&trace, td_error);
            learner.actor.learn(&trace, td_error);

            trace.push(TraceStep {
                state,
                action: current,
            });

            state = new_state;
            action = new_action;
        }

        EpisodeRecord {
            steps: trace,
            final_pegs: env.peg_count(),
            outcome: env.status(),
        }
    }

    fn summarize(
        &self,
        learner: &Learner,
        metrics: &TrainingMetrics,
        episodes: &[EpisodeRecord],
    ) -> RunSummary {
        let critic_stats = learner.critic.stats();
        RunSummary {
            episodes: metrics.total_episodes(),
            solves: metrics.solves(),
            best_final_pegs: metrics.best_pegs().unwrap_or(0),
            final_episode_pegs: episodes.last().map(|r| r.final_pegs).unwrap_or(0),
            random_actions: learner.actor.random_actions(),
            greedy_actions: learner.actor.greedy_actions(),
            final_epsilon: learner.actor.epsilon(),
            mean_abs_td_error: metrics.mean_abs_td(usize::MAX),
            actor_policy_magnitude: learner.actor.mean_policy_magnitude(),
            actor_eligibility_magnitude: learner.actor.mean_eligibility_magnitude(),
            critic_value_magnitude: critic_stats.mean_value_magnitude,
            critic_eligibility_magnitude: critic_stats.mean_eligibility_magnitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ActorConfig, CriticConfig, CriticStrategy, Learner};
    use crate::game::{Board, BoardConfig, BoardShape, RewardConfig};

    fn env_from(shape: BoardShape, size: usize, holes: Vec<(usize, usize)>) -> Environment {
        let board = Board::new(&BoardConfig { shape, size, holes }).unwrap();
        Environment::new(board, RewardConfig::default())
    }

    /// Diamond board where only the listed cells hold pegs.
    fn sparse_env(size: usize, pegs: &[(usize, usize)]) -> Environment {
        let holes = (0..size)
            .flat_map(|r| (0..size).map(move |c| (r, c)))
            .filter(|p| !pegs.contains(p))
            .collect();
        env_from(BoardShape::Diamond, size, holes)
    }

    fn table_learner(env: &Environment, seed: u64) -> Learner {
        Learner::new(
            ActorConfig::default(),
            CriticConfig::default(),
            env.board(),
            Some(seed),
        )
        .unwrap()
    }

    fn trainer(num_episodes: usize) -> Trainer {
        Trainer::new(TrainerConfig {
            num_episodes,
            log_interval: num_episodes.max(1),
        })
    }

    #[test]
    fn test_one_jump_board_solves_in_a_single_step() {
        let mut env = sparse_env(3, &[(0, 1), (0, 2)]);
        let mut learner = table_learner(&env, 1);

        let report = trainer(1).train(&mut env, &mut learner);

        assert_eq!(report.episodes.len(), 1);
        let record = &report.episodes[0];
        assert_eq!(record.steps.len(), 1);
        assert_eq!(record.final_pegs, 1);
        assert!(record.solved());
        assert_eq!(report.summary.solves, 1);
    }

    #[test]
    fn test_stuck_board_records_a_loss_without_steps() {
        let mut env = sparse_env(3, &[(0, 0), (2, 2)]);
        let mut learner = table_learner(&env, 2);

        let report = trainer(1).train(&mut env, &mut learner);

        let record = &report.episodes[0];
        assert!(record.steps.is_empty());
        assert_eq!(record.final_pegs, 2);
        assert_eq!(record.outcome, BoardStatus::Loss);
        assert_eq!(report.summary.solves, 0);
    }

    #[test]
    fn test_final_episode_is_forced_greedy() {
        let mut env = env_from(BoardShape::Diamond, 4, vec![(2, 1)]);
        let mut learner = table_learner(&env, 3);

        let report = trainer(10).train(&mut env, &mut learner);
        assert_eq!(report.summary.final_epsilon, 0.0);
        assert_eq!(report.episodes.len(), 10);
    }

    #[test]
    fn test_same_seed_reproduces_the_run() {
        let run = |seed| {
            let mut env = env_from(BoardShape::Diamond, 4, vec![(2, 1)]);
            let mut learner = table_learner(&env, seed);
            trainer(60).train(&mut env, &mut learner).peg_history()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_learning_trend_on_small_solvable_board() {
        let mut env = env_from(BoardShape::Diamond, 4, vec![(2, 1)]);
        let mut learner = table_learner(&env, 9);

        let report = trainer(500).train(&mut env, &mut learner);
        let history = report.peg_history();

        let first: f64 =
            history[..150].iter().sum::<usize>() as f64 / 150.0;
        let last: f64 =
            history[history.len() - 150..].iter().sum::<usize>() as f64 / 150.0;
        assert!(
            last <= first + 0.5,
            "moving average should not increase: first {first:.2}, last {last:.2}"
        );
    }

    #[test]
    fn test_network_critic_run_stays_finite() {
        let board = Board::new(&BoardConfig {
            shape: BoardShape::Diamond,
            size: 3,
            holes: vec![(0, 0)],
        })
        .unwrap();
        let mut env = Environment::new(
            board,
            RewardConfig {
                win_reward: 50.0,
                loss_penalty: 1.0,
            },
        );
        let critic_config = CriticConfig {
            strategy: CriticStrategy::Network,
            learning_rate: 0.0005,
            layer_sizes: vec![9, 6, 1],
            ..CriticConfig::default()
        };
        let mut learner = Learner::new(
            ActorConfig::default(),
            critic_config,
            env.board(),
            Some(4),
        )
        .unwrap();

        let report = trainer(20).train(&mut env, &mut learner);
        assert_eq!(report.episodes.len(), 20);
        assert!(!report.episodes[0].steps.is_empty());
        assert!(report.summary.critic_value_magnitude.is_finite());
        assert!(report.summary.mean_abs_td_error.is_finite());
    }

    #[test]
    fn test_exploration_counters_populate_summary() {
        let mut env = env_from(BoardShape::Diamond, 4, vec![(2, 1)]);
        let mut learner = table_learner(&env, 5);

        let report = trainer(50).train(&mut env, &mut learner);
        let summary = &report.summary;
        assert!(summary.random_actions + summary.greedy_actions > 0);
        assert!(summary.episodes == 50);
    }
}
