//! Cadence engine crate.
//!
//! Decides *when* the next frame may begin, never what a frame does:
//! - `time`: clock source, sleep-overshoot estimator, hybrid waiter, throttle
//! - `runtime`: the main loop in dedicated or interactive mode
//! - `core`: the frame callback contract
//! - `window`: a non-blocking winit session for interactive hosts

pub mod core;
pub mod runtime;
pub mod time;
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub mod window;

pub mod logging;
