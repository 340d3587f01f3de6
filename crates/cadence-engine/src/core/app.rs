use anyhow::Result;

use super::ctx::FrameCtx;

/// Control directive returned by the frame callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Contract between the main loop and whatever a frame actually does.
///
/// The loop only decides *when* a frame may begin. Everything else (input,
/// simulation, rendering) lives behind `on_frame`.
///
/// All queries are polled once per iteration, so implementations may change
/// their answers between frames.
pub trait App {
    /// Desired seconds per frame.
    fn frame_interval(&self) -> f64;

    /// Lower bound on the time between frames in dedicated mode.
    ///
    /// Enforced with coarse sleeps before the precise throttle runs.
    fn min_tic_interval(&self) -> f64 {
        0.0
    }

    /// `false` when the session has lost input focus or is paused.
    /// Interactive mode only.
    fn has_input_focus_or_unpaused(&self) -> bool {
        true
    }

    /// Interactive mode only.
    fn is_minimized(&self) -> bool {
        false
    }

    /// Runs one frame.
    ///
    /// An `Err` is treated as fatal: the loop stops and hands it back to the
    /// caller untouched.
    fn on_frame(&mut self, ctx: &mut FrameCtx) -> Result<AppControl>;
}
