use crate::game::{Action, BoardStatus, StateKey};

use super::metrics::RunSummary;

/// One visited (state, action) pair of an episode, in visitation order.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    /// State the action was taken from.
    pub state: StateKey,
    pub action: Action,
}

/// Everything one episode leaves behind: the ordered jump sequence and the
/// terminal outcome. Consumed by external visualizers and plotting.
#[derive(Debug, Clone)]
pub struct EpisodeRecord {
    pub steps: Vec<TraceStep>,
    pub final_pegs: usize,
    pub outcome: BoardStatus,
}

impl EpisodeRecord {
    pub fn solved(&self) -> bool {
        self.outcome == BoardStatus::Win
    }
}

/// Output of a full training run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub episodes: Vec<EpisodeRecord>,
    pub summary: RunSummary,
}

impl RunReport {
    /// Final peg count per episode, in episode order (the learning curve).
    pub fn peg_history(&self) -> Vec<usize> {
        self.episodes.iter().map(|r| r.final_pegs).collect()
    }

    /// The last episode of the run — played greedily, since the trainer
    /// forces epsilon to zero for it.
    pub fn final_episode(&self) -> Option<&EpisodeRecord> {
        self.episodes.last()
    }
}
