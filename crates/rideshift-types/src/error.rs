use thiserror::Error;

/// Errors raised by domain validation and state machine transitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A required field is missing or malformed
    #[error("{0}")]
    Validation(String),

    /// A numeric field is outside its allowed range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    /// The action is not legal from the record's current state
    #[error("{0}")]
    InvalidState(String),

    /// An orthogonal precondition of the action does not hold
    #[error("{0}")]
    Precondition(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn unknown_action(raw: &str, expected: &[&str]) -> Self {
        Self::Validation(format!(
            "invalid action '{}'; expected one of: {}",
            raw,
            expected.join(", ")
        ))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
