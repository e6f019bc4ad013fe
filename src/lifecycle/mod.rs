//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!         → HTTP server stops accepting and drains
//!         → bucket eviction loop exits
//! ```

pub mod shutdown;

pub use shutdown::{wait_for_signal, Shutdown};
