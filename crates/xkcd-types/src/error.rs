//! The cross-cutting domain error taxonomy (see design §7). Individual
//! crates layer their own lower-level `Error` types (transport, database,
//! remote-HTTP) on top of this and convert into it at their boundary.

use thiserror::Error;

/// Errors that carry meaning all the way out to the HTTP gateway.
///
/// `Transient` failures (retried fetch/normalize attempts) never reach this
/// type; they are absorbed inside the ingestion worker loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("update already in progress")]
    UpdateInProgress,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("concurrency limit reached")]
    Overloaded,

    #[error("phrase exceeds maximum length")]
    ResourceExhausted,

    #[error("upstream error: {0}")]
    Upstream(String),
}

impl DomainError {
    pub fn upstream(err: impl std::fmt::Display) -> Self {
        DomainError::Upstream(err.to_string())
    }
}
