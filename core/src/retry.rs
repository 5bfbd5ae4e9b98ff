//! Bounded retry for request dispatch.

use crate::{Context, Result};
use bytes::Bytes;
use std::time::Duration;
use tokio::time::Instant;

/// RetryPolicy bounds the dispatch of a single logical request.
///
/// A dispatch is attempted up to `max_attempts` times within a
/// `total_timeout` budget, with a fixed `delay` between attempts. Every
/// transport error is retried uniformly; a completed HTTP exchange is
/// returned on the spot no matter its status code, since an error status is
/// an application-level outcome for the caller to interpret.
///
/// The budget is checked only after a failed attempt, so a slow attempt may
/// overrun the total budget by up to one delay plus one attempt's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    total_timeout: Duration,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            total_timeout: Duration::from_secs(5),
            delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with explicit bounds.
    pub fn new(max_attempts: u32, total_timeout: Duration, delay: Duration) -> Self {
        Self {
            // An attempt budget of zero would never dispatch at all.
            max_attempts: max_attempts.max(1),
            total_timeout,
            delay,
        }
    }

    /// Set the maximum number of attempts, including the first.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the total elapsed-time budget across all attempts.
    pub fn with_total_timeout(mut self, total_timeout: Duration) -> Self {
        self.total_timeout = total_timeout;
        self
    }

    /// Set the fixed delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Dispatch the request, retrying transport failures until it succeeds
    /// or the attempt budget is exhausted.
    ///
    /// Each attempt sends a freshly rebuilt request sharing the same `Bytes`
    /// body, so a retried request never goes out with a consumed body. On
    /// exhaustion the last observed error is returned.
    pub async fn dispatch(
        &self,
        ctx: &Context,
        req: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        let deadline = Instant::now() + self.total_timeout;
        let mut attempt = 1u32;

        loop {
            match ctx.http_send(rebuild_request(&parts, body.clone())).await {
                Ok(resp) => return Ok(resp),
                Err(err) => {
                    if attempt >= self.max_attempts || Instant::now() > deadline {
                        return Err(err);
                    }

                    log::debug!(
                        "attempt {attempt}/{} failed, retrying in {:?}: {err}",
                        self.max_attempts,
                        self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn rebuild_request(parts: &http::request::Parts, body: Bytes) -> http::Request<Bytes> {
    let mut req = http::Request::new(body);
    *req.method_mut() = parts.method.clone();
    *req.uri_mut() = parts.uri.clone();
    *req.version_mut() = parts.version;
    *req.headers_mut() = parts.headers.clone();
    req
}
