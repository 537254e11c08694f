use serde::{Deserialize, Serialize};

use super::action::Action;
use super::board::Board;
use super::state::{BoardStatus, StateKey};

/// Reward constants, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Reward for reaching a single-peg board.
    pub win_reward: f64,
    /// Scale of the loss penalty; the penalty grows with the square of the
    /// pegs left stranded.
    pub loss_penalty: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        RewardConfig {
            win_reward: 500.0,
            loss_penalty: 1.0,
        }
    }
}

/// The playable world: a board plus the reward function over its states.
///
/// `step` is the single environment transition — it mutates the board and
/// reports the new encoded state and the reward of being in it. Rewards are
/// sparse: only terminal states pay out.
pub struct Environment {
    board: Board,
    reward: RewardConfig,
}

impl Environment {
    pub fn new(board: Board, reward: RewardConfig) -> Self {
        Environment { board, reward }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Apply `action` and return the resulting encoded state and reward.
    pub fn step(&mut self, action: &Action) -> (StateKey, f64) {
        self.board.apply(action);
        (self.board.encode(), self.reward())
    }

    /// Reward of the current board state: `win_reward` on a win, a negative
    /// penalty quadratic in the remaining pegs on a loss, zero otherwise.
    pub fn reward(&self) -> f64 {
        match self.board.status() {
            BoardStatus::Win => self.reward.win_reward,
            BoardStatus::Loss => {
                let pegs = self.board.peg_count() as f64;
                -self.reward.loss_penalty * pegs * pegs
            }
            BoardStatus::Neutral => 0.0,
        }
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        self.board.legal_actions()
    }

    pub fn status(&self) -> BoardStatus {
        self.board.status()
    }

    pub fn encode(&self) -> StateKey {
        self.board.encode()
    }

    pub fn peg_count(&self) -> usize {
        self.board.peg_count()
    }

    pub fn reset(&mut self) {
        self.board.reset();
    }
}
