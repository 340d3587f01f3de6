use crate::runtime::RunMode;
use crate::time::FrameTime;

/// Per-frame context passed to `core::App::on_frame`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameCtx {
    pub time: FrameTime,

    /// Set while the session is minimized; expensive rendering should be skipped.
    pub skip_render: bool,

    pub mode: RunMode,
}

impl FrameCtx {
    /// Seconds since the previous frame.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.time.dt
    }
}
