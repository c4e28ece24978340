//! Admission control (design §4.3, §5): a non-blocking concurrency-cap
//! semaphore that fails fast with 503, and a token-bucket rate limiter that
//! waits up to a configured deadline before failing with 500.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::{Mutex, Semaphore};
use xkcd_types::error::DomainError;

use crate::auth::Authenticator;
use crate::error::ApiError;

/// Gates admin-only routes (`Update`, `Drop`) on a verified bearer token
/// (design §4.3). A missing or unparseable `Authorization` header yields the
/// same 401 as an invalid token, never a distinct "missing header" status.
pub async fn require_admin(
    State(auth): State<Arc<Authenticator>>,
    headers: HeaderMap,
    req: Request,
    next: Next,
) -> Response {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(header) = header else {
        return ApiError(DomainError::InvalidToken("missing Authorization header".to_string())).into_response();
    };

    match auth.verify(header) {
        Ok(_claims) => next.run(req).await,
        Err(err) => ApiError(err).into_response(),
    }
}

/// Non-blocking capacity cap. `try_acquire` never waits; a full semaphore
/// means the request is rejected outright rather than queued.
pub async fn concurrency_cap(
    State(semaphore): State<Arc<Semaphore>>,
    req: Request,
    next: Next,
) -> Response {
    match semaphore.try_acquire() {
        Ok(_permit) => next.run(req).await,
        Err(_) => ApiError(DomainError::Overloaded).into_response(),
    }
}

/// A global token bucket: rate `R` tokens/second, burst capacity 1.
pub struct RateLimiter {
    rate_per_sec: f64,
    wait_timeout: Duration,
    bucket: Mutex<Bucket>,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(rate_per_sec: f64, wait_timeout: Duration) -> Self {
        Self {
            rate_per_sec,
            wait_timeout,
            bucket: Mutex::new(Bucket { tokens: 1.0, last_refill: Instant::now() }),
        }
    }

    /// Waits until a token is available, up to `wait_timeout`. Returns
    /// [`DomainError::Upstream`] on deadline expiry (design §4.3: 500, not
    /// 503 — the rate limiter and the concurrency cap are distinct failure
    /// modes).
    pub async fn acquire(&self) -> Result<(), DomainError> {
        let deadline = Instant::now() + self.wait_timeout;
        loop {
            {
                let mut bucket = self.bucket.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
                bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec).min(1.0);
                bucket.last_refill = now;
                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                return Err(DomainError::upstream("rate limit wait timed out"));
            }
            let poll_interval = Duration::from_secs_f64((1.0 / self.rate_per_sec.max(0.001)).clamp(0.001, 0.05));
            tokio::time::sleep(poll_interval).await;
        }
    }
}

pub async fn rate_limit(State(limiter): State<Arc<RateLimiter>>, req: Request, next: Next) -> Response {
    match limiter.acquire().await {
        Ok(()) => next.run(req).await,
        Err(err) => ApiError(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn burst_of_one_then_blocks() {
        let limiter = RateLimiter::new(1.0, Duration::from_millis(10));
        limiter.acquire().await.unwrap();
        assert!(limiter.acquire().await.is_err());
    }

    #[tokio::test]
    async fn refills_over_time() {
        let limiter = RateLimiter::new(1000.0, Duration::from_millis(200));
        limiter.acquire().await.unwrap();
        assert!(limiter.acquire().await.is_ok());
    }
}
