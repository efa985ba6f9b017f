//! Error types for CarePulse

use thiserror::Error;

/// CarePulse shared error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Resource identifier rejected
    #[error("invalid resource id: {0}")]
    InvalidResourceId(String),

    /// Region code rejected
    #[error("invalid region: {0}")]
    InvalidRegion(String),
}

/// Result type for CarePulse shared operations
pub type CommonResult<T> = Result<T, CommonError>;
