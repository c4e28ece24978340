//! Error taxonomy for the ingestion engine. `UpdateInProgress` is surfaced to
//! callers via a distinct gRPC status code rather than string-matched error
//! text, so the gateway can branch on `tonic::Code` instead of parsing
//! messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("update already in progress")]
    UpdateInProgress,

    #[error("concurrency must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("remote corpus request failed: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("normalizer request failed: {0}")]
    Normalizer(#[from] tonic::Status),

    #[error("normalizer connection failed: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("event bus error: {0}")]
    EventBus(String),
}

impl From<Error> for tonic::Status {
    fn from(err: Error) -> Self {
        match err {
            Error::UpdateInProgress => tonic::Status::already_exists(err.to_string()),
            Error::Normalizer(status) => status,
            other => tonic::Status::internal(other.to_string()),
        }
    }
}
