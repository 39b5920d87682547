//! Policy error types.

use thiserror::Error;

/// Errors that can occur when selecting or invoking a policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("unknown policy: {0}")]
    UnknownPolicy(String),

    #[error("policy already registered: {0}")]
    AlreadyRegistered(String),

    #[error("{policy} policy does not support {operation}")]
    Unsupported {
        policy: &'static str,
        operation: &'static str,
    },
}

pub type PolicyResult<T> = Result<T, PolicyError>;
