//! Translation from [`DomainError`] to HTTP responses (design §4.3, §7).
//! This is the single place domain errors become status codes; handlers
//! never construct a `StatusCode` themselves.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use xkcd_types::error::DomainError;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::UpdateInProgress => StatusCode::ACCEPTED,
            DomainError::InvalidCredentials | DomainError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            DomainError::BadRequest(_) | DomainError::ResourceExhausted => StatusCode::BAD_REQUEST,
            DomainError::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if matches!(self.0, DomainError::Upstream(_)) {
            tracing::error!(error = %self.0, "request failed");
            return (status, "internal error".to_string()).into_response();
        }

        (status, self.0.to_string()).into_response()
    }
}

/// Maps a downstream gRPC status to a [`DomainError`] without string-matching
/// the message: `AlreadyExists` is how the ingester signals
/// [`DomainError::UpdateInProgress`], `ResourceExhausted` passes through from
/// the normalizer unchanged, everything else is an opaque upstream failure.
pub fn status_to_domain(status: tonic::Status) -> DomainError {
    match status.code() {
        tonic::Code::AlreadyExists => DomainError::UpdateInProgress,
        tonic::Code::ResourceExhausted => DomainError::ResourceExhausted,
        _ => DomainError::upstream(status.message()),
    }
}
