//! # RL Peg Solitaire
//!
//! Peg Solitaire solved by an eligibility-trace Actor-Critic (TD(λ))
//! learner. The critic comes in two interchangeable strategies — an exact
//! lookup table and a feed-forward value network (via the Burn ML
//! framework) with per-parameter eligibility traces.
//!
//! ## Modules
//!
//! - [`game`] — Board state machine: neighbor graph, legal jumps, encoding,
//!   environment step and reward
//! - [`ai`] — Actor, Critic trait and its two strategies, value network,
//!   learner context
//! - [`training`] — Episode-driving trainer, episode records, metrics and
//!   run summary
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod training;
