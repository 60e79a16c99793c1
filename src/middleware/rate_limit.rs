use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Bucket for requests whose peer address is unknown, e.g. when the router
/// is driven without `into_make_service_with_connect_info`.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

#[derive(Debug)]
struct WindowState {
    start: Instant,
    count: u32,
}

#[derive(Debug)]
struct Windows {
    clients: HashMap<IpAddr, WindowState>,
    last_sweep: Instant,
}

/// Fixed-window limiter counting each client IP separately.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    state: Arc<Mutex<Windows>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            state: Arc::new(Mutex::new(Windows {
                clients: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    fn allow(&self, client: IpAddr) -> bool {
        self.allow_at(client, Instant::now())
    }

    fn allow_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Expired windows are dropped once per window length.
        if now.saturating_duration_since(guard.last_sweep) >= self.window {
            let window = self.window;
            guard
                .clients
                .retain(|_, state| now.saturating_duration_since(state.start) < window);
            guard.last_sweep = now;
        }

        let state = guard.clients.entry(client).or_insert(WindowState {
            start: now,
            count: 0,
        });
        if now.saturating_duration_since(state.start) >= self.window {
            state.start = now;
            state.count = 0;
        }
        if state.count < self.max_requests {
            state.count += 1;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clients
            .len()
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(UNKNOWN_CLIENT, |ConnectInfo(addr)| addr.ip());

    if !limiter.allow(client) {
        tracing::warn!(%client, path = %req.uri().path(), "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many requests, please try again later." })),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT_A: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const CLIENT_B: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    #[test]
    fn blocks_after_max_within_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(limiter.allow_at(CLIENT_A, t0));
        assert!(limiter.allow_at(CLIENT_A, t0 + Duration::from_secs(1)));
        assert!(!limiter.allow_at(CLIENT_A, t0 + Duration::from_secs(2)));
    }

    #[test]
    fn clients_have_separate_windows() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(limiter.allow_at(CLIENT_A, t0));
        assert!(!limiter.allow_at(CLIENT_A, t0));
        assert!(limiter.allow_at(CLIENT_B, t0));
    }

    #[test]
    fn window_reset_restores_capacity() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let t0 = Instant::now();
        assert!(limiter.allow_at(CLIENT_A, t0));
        assert!(!limiter.allow_at(CLIENT_A, t0 + Duration::from_secs(5)));
        assert!(limiter.allow_at(CLIENT_A, t0 + Duration::from_secs(11)));
    }

    #[test]
    fn expired_clients_are_swept() {
        let limiter = RateLimiter::new(5, Duration::from_secs(10));
        let t0 = Instant::now();
        assert!(limiter.allow_at(CLIENT_A, t0));
        assert!(limiter.allow_at(CLIENT_B, t0 + Duration::from_secs(1)));
        assert_eq!(limiter.tracked_clients(), 2);

        assert!(limiter.allow_at(CLIENT_B, t0 + Duration::from_secs(10)));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn zero_limit_still_allows_one() {
        let limiter = RateLimiter::new(0, Duration::from_secs(10));
        assert!(limiter.allow_at(CLIENT_A, Instant::now()));
    }
}
