use std::fmt;
use std::time::Duration;

use crate::time::{EstimatorConfig, WaiterConfig};

/// Operating mode, fixed for the lifetime of a runtime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RunMode {
    /// Headless: coarse minimum-interval gate, then the precise throttle.
    Dedicated,
    /// Windowed: focus/minimize aware idle sleeps, then the precise throttle.
    #[default]
    Interactive,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Dedicated => f.write_str("dedicated"),
            RunMode::Interactive => f.write_str("interactive"),
        }
    }
}

/// Precise-wait tunables.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PacingConfig {
    pub estimator: EstimatorConfig,
    pub waiter: WaiterConfig,
}

/// Coarse power-saving sleeps. None of these affect timing correctness: the
/// throttle always measures true elapsed time afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleConfig {
    /// Issued when the session has no input focus or is paused.
    pub unfocused_sleep: Duration,

    /// Issued when the session is minimized.
    pub minimized_sleep: Duration,

    /// Issued repeatedly by the dedicated-mode gate until the minimum tic
    /// interval has passed.
    pub gate_sleep: Duration,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            unfocused_sleep: Duration::from_millis(16),
            minimized_sleep: Duration::from_millis(32),
            gate_sleep: Duration::from_millis(16),
        }
    }
}

/// Main loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuntimeConfig {
    pub mode: RunMode,
    pub pacing: PacingConfig,
    pub idle: IdleConfig,
}

impl RuntimeConfig {
    pub fn dedicated() -> Self {
        Self {
            mode: RunMode::Dedicated,
            ..Self::default()
        }
    }

    pub fn interactive() -> Self {
        Self {
            mode: RunMode::Interactive,
            ..Self::default()
        }
    }

    /// Rejects tunables the loop cannot work with.
    ///
    /// Zero durations are accepted (a zero gate sleep degrades into a
    /// yielding busy loop, a zero pause count into a bare clock poll).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.pacing.estimator;

        check_seconds("estimator.initial", e.initial)?;
        check_seconds("estimator.cap", e.cap)?;
        check_seconds("estimator.sigma_factor", e.sigma_factor)?;
        if e.freeze_after < 2 {
            return Err(ConfigError::new(
                "estimator.freeze_after",
                format!("must be at least 2, got {}", e.freeze_after),
            ));
        }

        if self.pacing.waiter.sleep_quantum.is_zero() {
            return Err(ConfigError::new(
                "waiter.sleep_quantum",
                "must be non-zero",
            ));
        }

        Ok(())
    }
}

fn check_seconds(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::new(field, format!("must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(ConfigError::new(field, format!("must not be negative, got {value}")));
    }
    Ok(())
}

/// An invalid runtime configuration value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: &'static str, msg: impl Into<String>) -> Self {
        Self {
            field,
            message: msg.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid runtime config `{}`: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}
