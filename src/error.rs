use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Attack {attack} failed: {reason}")]
    AttackFailed { attack: String, reason: String },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EstimatorError>;

impl EstimatorError {
    /// Shorthand used by cost models that give up on a parameter set.
    pub fn attack_failed(attack: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AttackFailed {
            attack: attack.into(),
            reason: reason.into(),
        }
    }
}
