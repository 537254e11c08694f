//! Core Peg Solitaire logic: board representation with its neighbor graph,
//! jump actions, state encoding, and the environment step/reward machinery.

mod action;
mod board;
mod sim;
mod state;

pub use action::Action;
pub use board::{Board, BoardConfig, BoardShape, Coord, Direction};
pub use sim::{Environment, RewardConfig};
pub use state::{BoardStatus, StateKey};
