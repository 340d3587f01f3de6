//! Time subsystem.
//!
//! Everything between "the previous frame ended" and "the next frame may
//! begin", layered leaves first:
//! - `Clock`: monotonic timestamps, blocking sleep, pause hints
//! - `SleepEstimator`: online estimate of what one minimal sleep really costs
//! - `HybridWaiter`: sleeps while the estimate leaves room, spins the tail
//! - `FrameThrottle`: previous timestamp + interval -> precise wait
//!
//! All timestamps are `f64` seconds on the clock's own origin.

mod clock;
mod estimator;
mod frame_time;
mod throttle;
mod waiter;

pub use clock::{Clock, ManualClock, SystemClock};
pub use estimator::{EstimatorConfig, SleepEstimator};
pub use frame_time::FrameTime;
pub use throttle::FrameThrottle;
pub use waiter::{HybridWaiter, WaitReport, WaiterConfig};
