//! Error types for filter construction and compilation.

use thiserror::Error;

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur when building or compiling a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Bad operator, too few children, or an unsupported filter target.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
