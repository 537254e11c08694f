use std::path::Path;

use crate::ai::{ActorConfig, CriticConfig, CriticStrategy};
use crate::error::ConfigError;
use crate::game::{BoardConfig, RewardConfig};
use crate::training::TrainerConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Run seed; omitted means OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub board: BoardConfig,
    pub reward: RewardConfig,
    pub actor: ActorConfig,
    pub critic: CriticConfig,
    pub training: TrainerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            board: BoardConfig::default(),
            reward: RewardConfig::default(),
            actor: ActorConfig::default(),
            critic: CriticConfig::default(),
            training: TrainerConfig::default(),
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!(
                "Warning: config file '{}' not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.size < 2 {
            return Err(ConfigError::Validation("board.size must be >= 2".into()));
        }

        if self.actor.learning_rate <= 0.0 {
            return Err(ConfigError::Validation(
                "actor.learning_rate must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.actor.discount_factor) {
            return Err(ConfigError::Validation(
                "actor.discount_factor must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.actor.trace_decay) {
            return Err(ConfigError::Validation(
                "actor.trace_decay must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.actor.epsilon) {
            return Err(ConfigError::Validation(
                "actor.epsilon must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.actor.epsilon_decay) {
            return Err(ConfigError::Validation(
                "actor.epsilon_decay must be in [0, 1]".into(),
            ));
        }

        if self.critic.learning_rate <= 0.0 {
            return Err(ConfigError::Validation(
                "critic.learning_rate must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.critic.discount_factor) {
            return Err(ConfigError::Validation(
                "critic.discount_factor must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.critic.trace_decay) {
            return Err(ConfigError::Validation(
                "critic.trace_decay must be in [0, 1]".into(),
            ));
        }
        if self.critic.strategy == CriticStrategy::Network {
            if self.critic.layer_sizes.len() < 2 {
                return Err(ConfigError::Validation(
                    "critic.layer_sizes needs at least input and output widths".into(),
                ));
            }
            if self.critic.layer_sizes.last() != Some(&1) {
                return Err(ConfigError::Validation(
                    "critic.layer_sizes must end in a single output unit".into(),
                ));
            }
        }

        if self.reward.win_reward <= 0.0 {
            return Err(ConfigError::Validation(
                "reward.win_reward must be > 0".into(),
            ));
        }
        if self.reward.loss_penalty <= 0.0 {
            return Err(ConfigError::Validation(
                "reward.loss_penalty must be > 0".into(),
            ));
        }

        if self.training.num_episodes == 0 {
            return Err(ConfigError::Validation(
                "training.num_episodes must be > 0".into(),
            ));
        }
        if self.training.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
