//! The bounded-attempt, cancellation-aware retry loop used for every
//! fetch-from-a-dependency call in the ingestion worker (design §4.1, §9:
//! "retry/backoff is an explicit loop of bounded attempts ... not
//! exceptions-in-exceptions").

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Total attempts (including the first) before a retried operation is
/// abandoned.
pub const MAX_ATTEMPTS: usize = 10;

/// Fixed backoff between attempts.
pub const BACKOFF: Duration = Duration::from_secs(1);

/// Outcome of a retried operation once it stops.
pub enum Outcome<T, E> {
    /// Succeeded within the attempt budget.
    Ok(T),
    /// Exhausted every attempt; carries the last error observed.
    Exhausted(E),
    /// The cancellation token fired mid-attempt or mid-backoff.
    Cancelled,
}

/// Calls `op` up to [`MAX_ATTEMPTS`] times with a fixed [`BACKOFF`] between
/// attempts, aborting early if `cancel` fires during the call or the sleep.
/// `on_retry` is invoked with the zero-based attempt index and the error
/// after every failed-but-not-final attempt, so callers can log with their
/// own structured fields (e.g. comic id).
pub async fn retry<T, E, F, Fut>(
    cancel: &CancellationToken,
    mut op: F,
    mut on_retry: impl FnMut(usize, &E),
) -> Outcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last_err = None;
    for attempt in 0..MAX_ATTEMPTS {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Outcome::Cancelled,
            res = op() => res,
        };

        match result {
            Ok(value) => return Outcome::Ok(value),
            Err(err) => {
                let is_last = attempt + 1 == MAX_ATTEMPTS;
                if !is_last {
                    on_retry(attempt, &err);
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Outcome::Cancelled,
                        _ = tokio::time::sleep(BACKOFF) => {}
                    }
                }
                last_err = Some(err);
            }
        }
    }
    // Safe: the loop always runs at least once, so `last_err` is populated
    // by the time we fall through.
    Outcome::Exhausted(last_err.expect("retry loop ran at least once"))
}
