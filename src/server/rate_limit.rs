//! Per-client request rate limiting
//!
//! Each client IP gets its own token bucket. A client that runs out is
//! answered with 429 until its bucket refills; other clients are unaffected.

use crate::server::errors::ApiError;
use crate::server::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

type KeyedLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Token-bucket limiter keyed by client IP
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<KeyedLimiter>,
    requests_per_minute: u32,
}

impl ClientRateLimiter {
    /// Creates a limiter allowing `requests_per_minute` per client
    ///
    /// A zero rate is raised to one request per minute.
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(rpm))),
            requests_per_minute: rpm.get(),
        }
    }

    /// Takes one token from `client`'s bucket
    pub fn check(&self, client: IpAddr) -> Result<(), ApiError> {
        self.limiter
            .check_key(&client)
            .map_err(|_| ApiError::TooManyRequests)
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}

/// Middleware rejecting clients that exceed their quota
///
/// Requests served without connection info share a single bucket.
pub async fn limit_by_client(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if let Err(e) = state.limiter.check(client) {
        tracing::warn!(%client, "Rate limit exceeded");
        return Err(e);
    }

    Ok(next.run(request).await)
}
