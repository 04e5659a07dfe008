//! Virtual-clock environment.
//!
//! `SimEnv` never parks a task: `sleep` records the requested duration,
//! advances the virtual clock by it, and returns a ready future. Clones share
//! the same clock, so a test can hand one clone to the code under test and
//! inspect the other.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use scorm_bridge_core::Environment;

#[derive(Debug)]
struct Clock {
    origin: Instant,
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

/// Simulated environment with a shared virtual clock.
#[derive(Debug, Clone)]
pub struct SimEnv {
    clock: Arc<Mutex<Clock>>,
}

impl SimEnv {
    /// Create an environment whose clock starts now.
    pub fn new() -> Self {
        let clock = Clock { origin: Instant::now(), elapsed: Duration::ZERO, sleeps: Vec::new() };
        Self { clock: Arc::new(Mutex::new(clock)) }
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.clock().elapsed
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.clock().sleeps.clone()
    }

    /// Advance the clock without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.clock().elapsed += duration;
    }

    fn clock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SimEnv {
    fn now(&self) -> Instant {
        let clock = self.clock();
        clock.origin + clock.elapsed
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        let mut clock = self.clock();
        clock.elapsed += duration;
        clock.sleeps.push(duration);
        std::future::ready(())
    }
}
