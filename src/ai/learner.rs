use rand::Rng;

use crate::ai::actor::{Actor, ActorConfig};
use crate::ai::critic::{Critic, CriticConfig, CriticStrategy};
use crate::ai::critics::{NetworkCritic, TabularCritic};
use crate::error::TrainingError;
use crate::game::Board;

/// Owner of all mutable learning state for one training run.
///
/// The actor and critic live here and are threaded through the training
/// loop explicitly — nothing is process-global, so concurrent runs (and
/// tests) stay isolated.
pub struct Learner {
    pub actor: Actor,
    pub critic: Box<dyn Critic>,
}

impl Learner {
    /// Build the actor and the configured critic strategy for `board`.
    ///
    /// With a seed, actor exploration and network initialization each get a
    /// deterministic stream derived from it; without one, both draw from OS
    /// entropy.
    pub fn new(
        actor_config: ActorConfig,
        critic_config: CriticConfig,
        board: &Board,
        seed: Option<u64>,
    ) -> Result<Self, TrainingError> {
        let actor = Actor::new(actor_config, seed.map(|s| derive_seed(s, 0)));

        let critic: Box<dyn Critic> = match critic_config.strategy {
            CriticStrategy::Table => Box::new(TabularCritic::new(&critic_config)),
            CriticStrategy::Network => {
                let net_seed = seed
                    .map(|s| derive_seed(s, 1))
                    .unwrap_or_else(|| rand::rng().random());
                Box::new(NetworkCritic::new(
                    &critic_config,
                    board.cell_count(),
                    net_seed,
                )?)
            }
        };

        Ok(Learner { actor, critic })
    }
}

/// Derive a deterministic per-component seed from the run seed.
fn derive_seed(base: u64, stream: u64) -> u64 {
    // FNV-1a-inspired mixing for well-distributed component seeds.
    let mut hash = base ^ 0x517cc1b727220a95;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= stream;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= stream >> 32;
    hash
}
