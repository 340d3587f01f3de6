/// Mutable state of the main loop, updated once per iteration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoopState {
    /// Timestamp reached by the previous frame's throttle (or the loop start).
    pub previous_frame_time: f64,

    /// Whether the most recent frame was told to skip rendering.
    pub skip_render: bool,

    /// Number of frames run so far (wraps).
    pub frame_index: u64,
}

impl LoopState {
    pub(crate) fn starting_at(t: f64) -> Self {
        Self {
            previous_frame_time: t,
            skip_render: false,
            frame_index: 0,
        }
    }

    /// Records a completed frame reaching timestamp `now`.
    pub(crate) fn advance(&mut self, now: f64) {
        self.previous_frame_time = now;
        self.frame_index = self.frame_index.wrapping_add(1);
    }
}
