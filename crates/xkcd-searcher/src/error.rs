use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

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
            Error::Normalizer(status) => status,
            other => tonic::Status::internal(other.to_string()),
        }
    }
}
