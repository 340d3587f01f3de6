/// Tunables for [`SleepEstimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// Prior for both the mean and the estimate, in seconds.
    pub initial: f64,

    /// How many standard deviations the estimate sits above the mean.
    pub sigma_factor: f64,

    /// Upper bound of the estimate, in seconds.
    ///
    /// Bounds how much CPU the waiter burns spinning when the platform's
    /// sleep turns erratic.
    pub cap: f64,

    /// Sample count after which observations are ignored.
    pub freeze_after: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            initial: 1e-3,
            sigma_factor: 1.5,
            cap: 2e-3,
            freeze_after: 1_000_000,
        }
    }
}

/// Online model of how long one minimal sleep request really takes.
///
/// Mean and variance are tracked with Welford's single-pass update, so no
/// sample history is kept. The published estimate is
/// `mean + sigma_factor * stddev`, clamped to `[0, cap]`.
///
/// `sample_count` starts at 1 (the prior counts as a sample), which keeps the
/// variance denominator `sample_count - 1` positive after the first update.
#[derive(Debug, Clone)]
pub struct SleepEstimator {
    config: EstimatorConfig,
    estimate: f64,
    mean: f64,
    sum_squared_delta: f64,
    sample_count: u64,
}

impl SleepEstimator {
    pub fn new() -> Self {
        Self::with_config(EstimatorConfig::default())
    }

    pub fn with_config(config: EstimatorConfig) -> Self {
        Self {
            config,
            estimate: config.initial.clamp(0.0, config.cap.max(0.0)),
            mean: config.initial,
            sum_squared_delta: 0.0,
            sample_count: 1,
        }
    }

    /// Folds one measured sleep duration (seconds) into the statistics.
    pub fn observe(&mut self, actual: f64) {
        if self.is_frozen() {
            return;
        }

        self.sample_count += 1;
        if self.is_frozen() {
            log::debug!(
                "sleep estimator frozen after {} samples (estimate {:.6}s)",
                self.sample_count,
                self.estimate
            );
        }

        let n = self.sample_count as f64;
        let delta = actual - self.mean;
        self.mean += delta / n;
        self.sum_squared_delta += delta * (actual - self.mean);

        self.estimate = (self.mean + self.config.sigma_factor * self.std_dev())
            .clamp(0.0, self.config.cap.max(0.0));
    }

    /// Conservative duration of one minimal sleep, in seconds.
    #[inline]
    pub fn current_estimate(&self) -> f64 {
        self.estimate
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation. Zero until the first observation.
    pub fn std_dev(&self) -> f64 {
        if self.sample_count < 2 {
            return 0.0;
        }
        (self.sum_squared_delta.max(0.0) / (self.sample_count - 1) as f64).sqrt()
    }

    pub fn sum_squared_delta(&self) -> f64 {
        self.sum_squared_delta
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn is_frozen(&self) -> bool {
        self.sample_count >= self.config.freeze_after
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }
}

impl Default for SleepEstimator {
    fn default() -> Self {
        Self::new()
    }
}
