use super::clock::Clock;
use super::waiter::{HybridWaiter, WaitReport};

/// Turns "previous frame time + desired interval" into a precise wait.
///
/// No validation is done on the interval: zero or negative intervals put the
/// deadline in the past and the call returns immediately.
#[derive(Debug, Clone, Default)]
pub struct FrameThrottle {
    waiter: HybridWaiter,
}

impl FrameThrottle {
    pub fn new(waiter: HybridWaiter) -> Self {
        Self { waiter }
    }

    /// Waits until `previous + interval` and returns the reached timestamp.
    pub fn throttle<C: Clock + ?Sized>(&mut self, clock: &C, previous: f64, interval: f64) -> f64 {
        self.waiter.wait_until(clock, previous + interval)
    }

    pub fn waiter(&self) -> &HybridWaiter {
        &self.waiter
    }

    pub fn last_report(&self) -> WaitReport {
        self.waiter.last_report()
    }
}
