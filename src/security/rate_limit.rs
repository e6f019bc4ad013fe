//! Per-client token-bucket admission control.
//!
//! Buckets live in a sharded map. Lookup-or-create, refill and consume all
//! happen while the caller holds the write lock of the key's shard, so a
//! bucket is never observed mid-refill and the last token cannot be spent
//! twice. The eviction sweep takes the same shard locks.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::LimiterConfig;
use crate::error::AppError;
use crate::observability::metrics;

/// Key used when the peer address is unknown.
const UNKNOWN_CLIENT: &str = "unknown";

struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn full(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_refill: now,
        }
    }

    fn try_acquire(&mut self, now: Instant, capacity: f64, refill_rate: f64) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        // A caller holding an older timestamp must not rewind the clock, or
        // the same interval would be credited twice.
        self.last_refill = self.last_refill.max(now);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Token buckets keyed by client.
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    enabled: bool,
    rps: f64,
    burst: f64,
    idle_ttl: Duration,
    eviction_interval: Duration,
    trust_forwarded_for: bool,
}

impl RateLimiter {
    pub fn new(config: &LimiterConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            enabled: config.enabled,
            rps: config.rps,
            burst: f64::from(config.burst),
            idle_ttl: config.idle_ttl(),
            eviction_interval: config.eviction_interval(),
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn trust_forwarded_for(&self) -> bool {
        self.trust_forwarded_for
    }

    /// Spend one token for `key` if one is available.
    pub fn admit(&self, key: &str) -> bool {
        self.admit_at(key, Instant::now())
    }

    /// [`admit`](Self::admit) with an explicit monotonic timestamp.
    pub fn admit_at(&self, key: &str, now: Instant) -> bool {
        if !self.enabled {
            return true;
        }

        // Fast path avoids allocating the key for known clients.
        if let Some(mut bucket) = self.buckets.get_mut(key) {
            return bucket.try_acquire(now, self.burst, self.rps);
        }

        let mut bucket = self
            .buckets
            .entry(key.to_owned())
            .or_insert_with(|| TokenBucket::full(self.burst, now));
        bucket.try_acquire(now, self.burst, self.rps)
    }

    /// Number of clients currently holding a bucket.
    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    /// Drop buckets idle for longer than the TTL. Returns how many went.
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    pub fn evict_idle_at(&self, now: Instant) -> usize {
        let mut evicted = 0;
        self.buckets.retain(|_, bucket| {
            let keep = now.saturating_duration_since(bucket.last_refill) < self.idle_ttl;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// Sweep idle buckets every eviction interval until shutdown.
    pub async fn run_eviction(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        if !self.enabled {
            tracing::info!("Rate limiter disabled, eviction loop not started");
            return;
        }

        tracing::info!(
            interval_secs = self.eviction_interval.as_secs(),
            idle_ttl_secs = self.idle_ttl.as_secs(),
            "Bucket eviction starting"
        );

        let mut ticker = time::interval(self.eviction_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let evicted = self.evict_idle();
                    let remaining = self.tracked_clients();
                    if evicted > 0 {
                        tracing::debug!(evicted, remaining, "Evicted idle clients");
                        metrics::record_evicted(evicted);
                    }
                    metrics::record_tracked_clients(remaining);
                }
                _ = shutdown.recv() => {
                    tracing::info!("Bucket eviction received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

/// Key identifying the caller: the peer IP, or the forwarded client IP when
/// the service sits behind a trusted proxy.
pub fn client_key(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        if let Some(ip) = forwarded_ip(request.headers()) {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .or_else(|| header_str(headers, "x-real-ip").and_then(|v| v.trim().parse().ok()))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Admission control middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if !limiter.is_enabled() {
        return next.run(request).await;
    }

    let key = client_key(&request, limiter.trust_forwarded_for());

    if limiter.admit(&key) {
        metrics::record_admission(true);
        next.run(request).await
    } else {
        tracing::warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
        metrics::record_admission(false);
        AppError::RateLimited.into_response()
    }
}
