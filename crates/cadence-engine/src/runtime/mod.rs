//! Main loop.
//!
//! Owns the loop state and the precise throttle, applies the idle or
//! dedicated-mode gating policy, and drives `core::App` once per frame.

mod config;
mod runtime;
mod state;

pub use config::{ConfigError, IdleConfig, PacingConfig, RunMode, RuntimeConfig};
pub use runtime::Runtime;
pub use state::LoopState;
