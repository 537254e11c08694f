mod actor;
mod critic;
pub mod critics;
mod learner;
pub mod networks;

pub use actor::{Actor, ActorConfig};
pub use critic::{Critic, CriticConfig, CriticStats, CriticStrategy};
pub use critics::{NetworkCritic, TabularCritic};
pub use learner::Learner;
