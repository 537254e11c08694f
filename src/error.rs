use std::path::PathBuf;

/// Errors raised while constructing a board.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("hole coordinate ({row},{col}) is not a cell on the board")]
    InvalidHole { row: usize, col: usize },
}

/// Errors raised when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors raised while setting up or running a training run.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("board setup failed: {0}")]
    Board(#[from] BoardError),

    #[error(
        "value network input layer is {configured} wide but the board has {cells} cells"
    )]
    LayerMismatch { configured: usize, cells: usize },

    #[error("value network must end in a single output unit, got {0}")]
    BadOutputLayer(usize),
}
