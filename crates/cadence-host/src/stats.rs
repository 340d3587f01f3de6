use std::fmt;

use cadence_engine::time::FrameTime;

/// Aggregate over one reporting window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameSummary {
    pub frames: u32,
    pub skipped: u32,
    pub fps: f64,
    pub mean_dt: f64,
    pub min_dt: f64,
    pub max_dt: f64,
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} fps, dt mean {:.3}ms min {:.3}ms max {:.3}ms, {} of {} renders skipped",
            self.fps,
            self.mean_dt * 1e3,
            self.min_dt * 1e3,
            self.max_dt * 1e3,
            self.skipped,
            self.frames
        )
    }
}

/// Rolling frame statistics, summarized once per `period` seconds.
#[derive(Debug, Clone)]
pub struct FrameStats {
    period: f64,
    window_start: Option<f64>,
    frames: u32,
    skipped: u32,
    sum_dt: f64,
    min_dt: f64,
    max_dt: f64,
}

impl FrameStats {
    pub fn new(period: f64) -> Self {
        Self {
            period,
            window_start: None,
            frames: 0,
            skipped: 0,
            sum_dt: 0.0,
            min_dt: f64::INFINITY,
            max_dt: 0.0,
        }
    }

    /// Records a frame; returns a summary when the window is complete.
    pub fn record(&mut self, time: &FrameTime, skipped_render: bool) -> Option<FrameSummary> {
        let start = *self.window_start.get_or_insert(time.now - time.dt);

        self.frames += 1;
        if skipped_render {
            self.skipped += 1;
        }
        self.sum_dt += time.dt;
        self.min_dt = self.min_dt.min(time.dt);
        self.max_dt = self.max_dt.max(time.dt);

        let span = time.now - start;
        if span < self.period {
            return None;
        }

        let summary = FrameSummary {
            frames: self.frames,
            skipped: self.skipped,
            fps: self.frames as f64 / span,
            mean_dt: self.sum_dt / self.frames as f64,
            min_dt: self.min_dt,
            max_dt: self.max_dt,
        };

        *self = Self {
            window_start: Some(time.now),
            ..Self::new(self.period)
        };

        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(i: u64, dt: f64) -> FrameTime {
        FrameTime {
            dt,
            now: (i + 1) as f64 * dt,
            frame_index: i,
        }
    }

    #[test]
    fn summarizes_once_per_period() {
        let mut stats = FrameStats::new(1.0);
        let mut summaries = Vec::new();
        for i in 0..100 {
            // 1/32 s is exact in binary, so window boundaries land exactly.
            if let Some(s) = stats.record(&frame(i, 0.03125), i % 4 == 0) {
                summaries.push(s);
            }
        }
        assert_eq!(summaries.len(), 3);
        let first = summaries[0];
        assert_eq!(first.frames, 32);
        assert_eq!(first.skipped, 8);
        assert!((first.fps - 32.0).abs() < 1e-9);
        assert!((first.mean_dt - 0.03125).abs() < 1e-12);
    }

    #[test]
    fn tracks_extremes() {
        let mut stats = FrameStats::new(0.05);
        stats.record(&FrameTime { dt: 0.01, now: 0.01, frame_index: 0 }, false);
        stats.record(&FrameTime { dt: 0.03, now: 0.04, frame_index: 1 }, false);
        let s = stats
            .record(&FrameTime { dt: 0.02, now: 0.06, frame_index: 2 }, false)
            .unwrap();
        assert_eq!(s.min_dt, 0.01);
        assert_eq!(s.max_dt, 0.03);
        assert_eq!(s.frames, 3);
    }

    #[test]
    fn display_is_in_milliseconds() {
        let s = FrameSummary {
            frames: 60,
            skipped: 0,
            fps: 60.0,
            mean_dt: 0.016667,
            min_dt: 0.0166,
            max_dt: 0.0167,
        };
        assert_eq!(
            s.to_string(),
            "60.0 fps, dt mean 16.667ms min 16.600ms max 16.700ms, 0 of 60 renders skipped"
        );
    }
}
