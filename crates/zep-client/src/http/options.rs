/*
[INPUT]:  Caller deadline and cancellation token
[OUTPUT]: Guarded futures that stop early on deadline or cancel
[POS]:    HTTP layer - per-call cancellation for every network operation
[UPDATE]: When adding per-call knobs
*/

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::{Result, ZepError};

/// Per-call deadline and cancellation.
///
/// Transport timeouts are configured on the handles; these bound a single call
/// from the caller's side. The default imposes nothing.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub deadline: Option<Instant>,
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Drive `fut` unless the deadline passes or the token fires first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let bounded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(ZepError::DeadlineExceeded),
                },
                None => fut.await,
            }
        };

        match &self.cancel {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(ZepError::Cancelled);
                }
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(ZepError::Cancelled),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        }
    }
}
