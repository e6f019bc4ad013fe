//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-client token bucket; 429 on exhaustion)
//!     → handlers
//!
//! Background:
//!     → rate_limit.rs eviction loop (drops idle buckets on an interval)
//! ```
//!
//! # Design Decisions
//! - Admission is decided before any handler or store work happens
//! - Rejection is a normal outcome, never queued or retried
//! - Bucket refill uses the monotonic clock

pub mod rate_limit;

pub use rate_limit::{client_key, rate_limit_middleware, RateLimiter};
