/// Frame timing snapshot handed to the frame callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds elapsed between the previous frame's timestamp and this one.
    pub dt: f64,

    /// Timestamp the throttle reached for this frame.
    pub now: f64,

    /// Monotonic frame counter (wraps).
    pub frame_index: u64,
}

