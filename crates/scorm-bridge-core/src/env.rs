//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples the locator's retry loop from real
//! timers. This enables:
//!
//! - Deterministic Simulation: a virtual clock records every sleep and
//!   advances instantly, so a ten-attempt retry budget runs in microseconds.
//!
//! - Production Runtime: a Tokio (or browser timer) implementation sleeps for
//!   real without any change to the locator.
//!
//! # Invariants
//!
//! - Monotonicity: `env.now()` must never go backwards
//! - Isolation: Implementations must not share global state

use std::time::{Duration, Instant};

/// Abstract environment providing time and async sleeping.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Returns the current time.
    ///
    /// # Invariants
    ///
    /// - Monotonicity: Subsequent calls must return times >= previous calls.
    fn now(&self) -> Instant;

    /// Sleeps for the specified duration.
    ///
    /// This is the ONLY async method in the trait. Protocol state machines
    /// never call it; only the locator's retry driver does.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}
