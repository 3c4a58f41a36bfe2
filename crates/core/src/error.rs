//! Failures raised by pure domain logic.
//!
//! Everything here is deterministic: the same state and command always produce
//! the same error. Lock poisoning and rendering problems are reported by the
//! crates that own those resources.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value could not be accepted as given (unknown status name, etc.).
    #[error("invalid value: {0}")]
    Validation(String),

    /// State and command disagree in a way that indicates a programming error.
    #[error("broken invariant: {0}")]
    InvariantViolation(String),

    #[error("malformed id: {0}")]
    InvalidId(String),

    /// The command targets something that was never created.
    #[error("{kind} {id} does not exist")]
    NotFound { kind: &'static str, id: String },

    /// Creating something that already exists.
    #[error("{0} already exists")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(kind: &'static str, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
