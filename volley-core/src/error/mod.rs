use thiserror::Error;

/// Failure produced by a single fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network failure, timeout, or server-side error; a later attempt may succeed.
    #[error("transient fetch failure: {0}")]
    Transient(String),
    /// Client-side or decode error; retrying is futile.
    #[error("permanent fetch failure: {0}")]
    Permanent(String),
}

/// Coarse classification used by kind-matching recovery strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    Transient,
    Permanent,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Transient(_) => FetchErrorKind::Transient,
            FetchError::Permanent(_) => FetchErrorKind::Permanent,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FetchError::Transient(m) | FetchError::Permanent(m) => m,
        }
    }
}
