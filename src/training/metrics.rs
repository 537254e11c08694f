use std::collections::VecDeque;
use std::fmt;

/// Rolling-window tracker for training progress.
///
/// Windows are capped so a long run keeps constant memory; lifetime
/// counters (episodes, solves, best result) are never capped.
pub struct TrainingMetrics {
    final_pegs: VecDeque<usize>,
    td_errors: VecDeque<f64>,
    capacity: usize,
    total_episodes: usize,
    solves: usize,
    best_pegs: Option<usize>,
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            final_pegs: VecDeque::with_capacity(capacity),
            td_errors: VecDeque::with_capacity(capacity),
            capacity,
            total_episodes: 0,
            solves: 0,
            best_pegs: None,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    pub fn record_episode(&mut self, final_pegs: usize, solved: bool) {
        self.total_episodes += 1;
        if solved {
            self.solves += 1;
        }
        self.best_pegs = Some(match self.best_pegs {
            Some(best) => best.min(final_pegs),
            None => final_pegs,
        });
        self.final_pegs.push_back(final_pegs);
        if self.final_pegs.len() > self.capacity {
            self.final_pegs.pop_front();
        }
    }

    pub fn record_td_error(&mut self, td_error: f64) {
        self.td_errors.push_back(td_error);
        if self.td_errors.len() > self.capacity {
            self.td_errors.pop_front();
        }
    }

    /// Mean final peg count over the last N episodes.
    pub fn average_pegs(&self, last_n: usize) -> f64 {
        let n = self.final_pegs.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let sum: usize = self.final_pegs.iter().rev().take(n).sum();
        sum as f64 / n as f64
    }

    /// Fraction of the last N episodes that ended with a single peg.
    pub fn solve_rate(&self, last_n: usize) -> f64 {
        let n = self.final_pegs.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let solved = self
            .final_pegs
            .iter()
            .rev()
            .take(n)
            .filter(|&&pegs| pegs == 1)
            .count();
        solved as f64 / n as f64
    }

    /// Mean absolute TD error over the last N recorded steps.
    pub fn mean_abs_td(&self, last_n: usize) -> f64 {
        let n = self.td_errors.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let sum: f64 = self.td_errors.iter().rev().take(n).map(|td| td.abs()).sum();
        sum / n as f64
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn solves(&self) -> usize {
        self.solves
    }

    /// Best (lowest) final peg count seen so far.
    pub fn best_pegs(&self) -> Option<usize> {
        self.best_pegs
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// End-of-run statistics exposed for observability.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub episodes: usize,
    pub solves: usize,
    pub best_final_pegs: usize,
    pub final_episode_pegs: usize,
    pub random_actions: u64,
    pub greedy_actions: u64,
    pub final_epsilon: f64,
    pub mean_abs_td_error: f64,
    pub actor_policy_magnitude: f64,
    pub actor_eligibility_magnitude: f64,
    pub critic_value_magnitude: f64,
    pub critic_eligibility_magnitude: f64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run summary")?;
        writeln!(f, "  episodes:        {}", self.episodes)?;
        writeln!(
            f,
            "  solves:          {} ({:.1}%)",
            self.solves,
            100.0 * self.solves as f64 / self.episodes.max(1) as f64
        )?;
        writeln!(f, "  best pegs:       {}", self.best_final_pegs)?;
        writeln!(f, "  final ep pegs:   {}", self.final_episode_pegs)?;
        writeln!(
            f,
            "  actions:         {} random / {} greedy",
            self.random_actions, self.greedy_actions
        )?;
        writeln!(f, "  final epsilon:   {:.4}", self.final_epsilon)?;
        writeln!(f, "  mean |td|:       {:.4}", self.mean_abs_td_error)?;
        writeln!(
            f,
            "  actor |policy|:  {:.4}  |trace|: {:.4}",
            self.actor_policy_magnitude, self.actor_eligibility_magnitude
        )?;
        write!(
            f,
            "  critic |value|:  {:.4}  |trace|: {:.4}",
            self.critic_value_magnitude, self.critic_eligibility_magnitude
        )
    }
}
