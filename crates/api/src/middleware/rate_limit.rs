//! Per-client fixed-window rate limiting for the `/api` routes.
//!
//! Clients are keyed by peer IP from [`ConnectInfo`]. Requests without
//! connection info (in-process tests) share one bucket.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use dashmap::DashMap;
use tokio::time::Instant;

use crate::error::AppError;
use crate::state::AppState;

/// Expired windows are swept once this many clients are tracked.
const SWEEP_AT: usize = 10_000;

struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    /// `max_requests == 0` disables limiting.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// Count one request from `client`.
    ///
    /// Over the limit, returns how long until the client's window resets.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        if self.max_requests == 0 {
            return Ok(());
        }
        if self.windows.len() >= SWEEP_AT {
            self.sweep();
        }

        let now = Instant::now();
        let mut window = self
            .windows
            .entry(client.to_string())
            .or_insert_with(|| Window {
                started: now,
                count: 0,
            });
        let elapsed = now.duration_since(window.started);
        if elapsed >= self.window {
            *window = Window {
                started: now,
                count: 0,
            };
        } else if window.count >= self.max_requests {
            return Err(self.window - elapsed);
        }
        window.count += 1;
        Ok(())
    }

    /// Forget clients whose window has expired.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into())
}

/// Reject requests over the configured rate with 429 and `Retry-After`.
pub async fn enforce(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_key(&request);
    if let Err(retry_after) = state.rate_limiter.check(&client) {
        let retry_after_secs = retry_after.as_secs().max(1);
        tracing::warn!(client = %client, retry_after_secs, "Rate limit exceeded");
        return Err(AppError::RateLimited { retry_after_secs });
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(900);

    #[tokio::test(start_paused = true)]
    async fn limit_applies_per_client_until_the_window_resets() {
        let limiter = RateLimiter::new(2, WINDOW);

        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        assert_eq!(limiter.check("10.0.0.1"), Err(WINDOW));
        assert!(limiter.check("10.0.0.2").is_ok());

        tokio::time::advance(Duration::from_secs(600)).await;
        assert_eq!(limiter.check("10.0.0.1"), Err(Duration::from_secs(300)));

        tokio::time::advance(Duration::from_secs(300)).await;
        assert!(limiter.check("10.0.0.1").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_forgets_expired_clients() {
        let limiter = RateLimiter::new(5, WINDOW);
        limiter.check("a").unwrap();
        tokio::time::advance(Duration::from_secs(1000)).await;
        limiter.check("b").unwrap();

        limiter.sweep();
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn zero_disables_limiting() {
        let limiter = RateLimiter::new(0, WINDOW);
        for _ in 0..1000 {
            assert!(limiter.check("a").is_ok());
        }
        assert_eq!(limiter.tracked_clients(), 0);
    }
}
