use std::time::Duration;

use super::clock::Clock;
use super::estimator::{EstimatorConfig, SleepEstimator};

/// Tunables for [`HybridWaiter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaiterConfig {
    /// Subtracted from every deadline; finishing this early is acceptable.
    pub safety_margin: Duration,

    /// The minimal sleep request issued during the sleep phase.
    pub sleep_quantum: Duration,

    /// Pause hints issued per spin-phase iteration.
    pub pauses_per_spin: u32,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            safety_margin: Duration::from_micros(1),
            sleep_quantum: Duration::from_millis(1),
            pauses_per_spin: 16,
        }
    }
}

/// Counters describing the most recent [`HybridWaiter::wait_until`] call.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct WaitReport {
    pub sleeps: u32,
    pub spins: u32,
}

/// Waits for a deadline by sleeping while the estimator says there is room
/// for another minimal sleep, then spinning through the remaining tail.
///
/// Each sleep is timed and fed back into the estimator, so the switch-over
/// point tracks the platform's actual sleep granularity.
#[derive(Debug, Clone)]
pub struct HybridWaiter {
    config: WaiterConfig,
    estimator: SleepEstimator,
    last: WaitReport,
}

impl HybridWaiter {
    pub fn new() -> Self {
        Self::with_config(WaiterConfig::default(), EstimatorConfig::default())
    }

    pub fn with_config(config: WaiterConfig, estimator: EstimatorConfig) -> Self {
        Self {
            config,
            estimator: SleepEstimator::with_config(estimator),
            last: WaitReport::default(),
        }
    }

    /// Blocks until `deadline` (seconds on `clock`) minus the safety margin,
    /// returning the timestamp actually reached.
    ///
    /// A deadline already in the past returns immediately with the current time.
    pub fn wait_until<C: Clock + ?Sized>(&mut self, clock: &C, deadline: f64) -> f64 {
        let deadline = deadline - self.config.safety_margin.as_secs_f64();
        let mut report = WaitReport::default();
        let mut now = clock.now();

        while now + self.estimator.current_estimate() < deadline {
            let before = now;
            clock.sleep(self.config.sleep_quantum);
            now = clock.now();
            self.estimator.observe(now - before);
            report.sleeps += 1;
        }

        while now < deadline {
            clock.relax(self.config.pauses_per_spin);
            now = clock.now();
            report.spins += 1;
        }

        self.last = report;
        now
    }

    pub fn estimator(&self) -> &SleepEstimator {
        &self.estimator
    }

    pub fn last_report(&self) -> WaitReport {
        self.last
    }

    pub fn config(&self) -> &WaiterConfig {
        &self.config
    }
}

impl Default for HybridWaiter {
    fn default() -> Self {
        Self::new()
    }
}
