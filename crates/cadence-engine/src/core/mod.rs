//! Core engine-facing contracts.
//!
//! Defines the narrow interface between the pacing loop and the code that
//! runs each frame. The loop never looks inside a frame; a frame never
//! decides when it runs.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
