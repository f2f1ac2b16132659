use thiserror::Error;

/// A result type for SMBO errors
pub type Result<T> = std::result::Result<T, SmboError>;

/// An error for sequential model-based optimization
#[derive(Error, Debug)]
pub enum SmboError {
    /// When the search space or a point of it is malformed
    #[error("Space error: {0}")]
    SpaceError(#[from] smbox_doe::DoeError),
    /// When configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfigurationError(String),
    /// When the objective function fails or returns a non finite value
    #[error("Objective evaluation failure at {point}: {reason}")]
    ObjectiveEvaluationFailure {
        /// evaluated point
        point: String,
        /// failure cause
        reason: String,
    },
    /// When a surrogate model cannot be fitted on the observations
    #[error("Surrogate fit error: {0}")]
    SurrogateFitError(String),
    /// When GP computation fails
    #[error("GP error")]
    GpError(#[from] smbox_gp::GpError),
    /// When an Argmin framework is raised
    #[error(transparent)]
    ArgminError(#[from] argmin::core::Error),
    /// When IO fails
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    /// When json (de)serialization fails
    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),
}
