use thiserror::Error;

/// A result type for search space and design operations
pub type Result<T> = std::result::Result<T, DoeError>;

/// An error raised when building or using a search space
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DoeError {
    /// When a dimension is malformed or the space is empty
    #[error("Invalid space: {0}")]
    InvalidSpaceError(String),
    /// When a point does not belong to the space
    #[error("Invalid point: {0}")]
    InvalidPointError(String),
}
