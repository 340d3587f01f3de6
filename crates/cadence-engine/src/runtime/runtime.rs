use anyhow::{Context, Result};

use crate::core::{App, AppControl, FrameCtx};
use crate::time::{Clock, FrameThrottle, FrameTime, HybridWaiter, SystemClock};

use super::config::{RunMode, RuntimeConfig};
use super::state::LoopState;

/// The pacing main loop.
///
/// Each iteration:
/// - dedicated mode: coarse sleeps until `min_tic_interval` has passed
/// - interactive mode: idle sleeps while unfocused/paused or minimized
/// - precise throttle to `previous + frame_interval`
/// - `App::on_frame` with the measured elapsed time
///
/// The coarse sleeps (idle and gate) never feed the sleep estimator; only the
/// throttle's own minimal sleeps do.
pub struct Runtime<C: Clock> {
    clock: C,
    config: RuntimeConfig,
    throttle: FrameThrottle,
    state: LoopState,
    unfocused: bool,
}

impl Runtime<SystemClock> {
    /// Validates `config` and runs `app` on the system clock until it exits.
    pub fn run_system<A>(config: RuntimeConfig, app: &mut A) -> Result<()>
    where
        A: App + ?Sized,
    {
        config.validate().context("refusing to start main loop")?;
        Runtime::new(SystemClock::new(), config).run(app)
    }
}

impl<C: Clock> Runtime<C> {
    /// Creates a runtime whose first frame is measured from "now".
    pub fn new(clock: C, config: RuntimeConfig) -> Self {
        let waiter = HybridWaiter::with_config(config.pacing.waiter, config.pacing.estimator);
        let start = clock.now();

        Self {
            clock,
            config,
            throttle: FrameThrottle::new(waiter),
            state: LoopState::starting_at(start),
            unfocused: false,
        }
    }

    pub fn mode(&self) -> RunMode {
        self.config.mode
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn throttle(&self) -> &FrameThrottle {
        &self.throttle
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Re-anchors the previous-frame timestamp to the current time.
    ///
    /// Useful after a long intentional stall so the next frame does not see
    /// the stall as elapsed time.
    pub fn reset(&mut self) {
        self.state.previous_frame_time = self.clock.now();
    }

    /// Runs until the app returns `AppControl::Exit` or fails.
    pub fn run<A>(&mut self, app: &mut A) -> Result<()>
    where
        A: App + ?Sized,
    {
        self.run_while(app, |_| true)
    }

    /// Runs while `keep_running` returns `true`, checked before every frame.
    pub fn run_while<A, P>(&mut self, app: &mut A, mut keep_running: P) -> Result<()>
    where
        A: App + ?Sized,
        P: FnMut(&LoopState) -> bool,
    {
        log::info!(
            "main loop starting in {} mode (frame interval {:.6}s)",
            self.config.mode,
            app.frame_interval()
        );

        while keep_running(&self.state) {
            if self.step(app)? == AppControl::Exit {
                log::info!("app requested exit after {} frames", self.state.frame_index);
                break;
            }
        }

        Ok(())
    }

    /// Runs exactly one iteration of the loop.
    pub fn step<A>(&mut self, app: &mut A) -> Result<AppControl>
    where
        A: App + ?Sized,
    {
        let previous = self.state.previous_frame_time;

        match self.config.mode {
            RunMode::Dedicated => self.gate(app.min_tic_interval()),
            RunMode::Interactive => self.apply_idle_policy(app),
        }

        let now = self.throttle.throttle(&self.clock, previous, app.frame_interval());

        let report = self.throttle.last_report();
        log::trace!(
            "frame {}: dt {:.6}s ({} sleeps, {} spins, estimate {:.6}s)",
            self.state.frame_index,
            now - previous,
            report.sleeps,
            report.spins,
            self.throttle.waiter().estimator().current_estimate()
        );

        let mut ctx = FrameCtx {
            time: FrameTime {
                dt: now - previous,
                now,
                frame_index: self.state.frame_index,
            },
            skip_render: self.state.skip_render,
            mode: self.config.mode,
        };

        let control = app.on_frame(&mut ctx)?;
        self.state.advance(now);

        Ok(control)
    }

    /// Coarse admission gate for dedicated mode.
    fn gate(&self, min_tic_interval: f64) {
        let previous = self.state.previous_frame_time;
        while self.clock.now() - previous < min_tic_interval {
            self.clock.sleep(self.config.idle.gate_sleep);
        }
    }

    /// Power-saving sleeps for interactive mode.
    fn apply_idle_policy<A>(&mut self, app: &A)
    where
        A: App + ?Sized,
    {
        let idle = self.config.idle;

        let unfocused = !app.has_input_focus_or_unpaused();
        if unfocused != self.unfocused {
            if unfocused {
                log::debug!("input focus lost or paused; idling between frames");
            } else {
                log::debug!("input focus regained");
            }
            self.unfocused = unfocused;
        }
        if unfocused {
            self.clock.sleep(idle.unfocused_sleep);
        }

        let minimized = app.is_minimized();
        if minimized != self.state.skip_render {
            if minimized {
                log::debug!("minimized; skipping render");
            } else {
                log::debug!("restored; rendering resumed");
            }
        }
        if minimized {
            self.clock.sleep(idle.minimized_sleep);
        }
        self.state.skip_render = minimized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;
    use std::time::Duration;

    const MARGIN: f64 = 1e-6 + 1e-9;

    /// Scripted app recording every frame it is handed.
    struct Recorder<'c> {
        clock: &'c ManualClock,
        interval: f64,
        min_tic: f64,
        focused: bool,
        minimized: bool,
        work: f64,
        frames: Vec<FrameCtx>,
        exit_after: Option<usize>,
        fail_at: Option<usize>,
    }

    impl<'c> Recorder<'c> {
        fn new(clock: &'c ManualClock, interval: f64) -> Self {
            Self {
                clock,
                interval,
                min_tic: 0.0,
                focused: true,
                minimized: false,
                work: 0.0,
                frames: Vec::new(),
                exit_after: None,
                fail_at: None,
            }
        }
    }

    impl App for Recorder<'_> {
        fn frame_interval(&self) -> f64 {
            self.interval
        }

        fn min_tic_interval(&self) -> f64 {
            self.min_tic
        }

        fn has_input_focus_or_unpaused(&self) -> bool {
            self.focused
        }

        fn is_minimized(&self) -> bool {
            self.minimized
        }

        fn on_frame(&mut self, ctx: &mut FrameCtx) -> Result<AppControl> {
            if self.fail_at == Some(self.frames.len()) {
                anyhow::bail!("host error at frame {}", self.frames.len());
            }
            self.frames.push(*ctx);
            self.clock.advance(self.work);
            if self.exit_after == Some(self.frames.len()) {
                return Ok(AppControl::Exit);
            }
            Ok(AppControl::Continue)
        }
    }

    fn frames_left(n: u64) -> impl FnMut(&LoopState) -> bool {
        move |s| s.frame_index < n
    }

    // ── dedicated mode ────────────────────────────────────────────────────

    #[test]
    fn dedicated_gate_and_throttle_both_hold() {
        let clock = ManualClock::new().with_overshoot(0.0003);
        let mut app = Recorder::new(&clock, 0.1);
        app.min_tic = 0.05;

        let mut rt = Runtime::new(&clock, RuntimeConfig::dedicated());
        rt.run_while(&mut app, frames_left(25)).unwrap();

        assert_eq!(app.frames.len(), 25);
        for f in &app.frames {
            assert!(f.elapsed() >= 0.05, "gate let through {}", f.elapsed());
            assert!(f.elapsed() >= 0.1 - MARGIN, "throttle let through {}", f.elapsed());
            assert!(!f.skip_render);
            assert_eq!(f.mode, RunMode::Dedicated);
        }
        assert!(clock.sleeps_of(Duration::from_millis(16)) > 0);
    }

    #[test]
    fn dedicated_gate_dominates_short_interval() {
        let clock = ManualClock::new();
        let mut app = Recorder::new(&clock, 0.01);
        app.min_tic = 0.05;

        let mut rt = Runtime::new(&clock, RuntimeConfig::dedicated());
        rt.run_while(&mut app, frames_left(10)).unwrap();

        for f in &app.frames {
            assert!(f.elapsed() >= 0.05);
            // 16 ms gate sleeps: 4 of them cover 50 ms.
            assert!(f.elapsed() < 0.05 + 0.016 + 1e-9);
        }
    }

    #[test]
    fn dedicated_mode_ignores_focus_and_minimize() {
        let clock = ManualClock::new();
        let mut app = Recorder::new(&clock, 0.02);
        app.focused = false;
        app.minimized = true;

        let mut rt = Runtime::new(&clock, RuntimeConfig::dedicated());
        rt.run_while(&mut app, frames_left(5)).unwrap();

        assert_eq!(clock.sleeps_of(Duration::from_millis(32)), 0);
        assert!(app.frames.iter().all(|f| !f.skip_render));
    }

    #[test]
    fn gate_sleeps_do_not_feed_the_estimator() {
        let clock = ManualClock::new();
        let mut app = Recorder::new(&clock, 0.0);
        app.min_tic = 0.05;

        let mut rt = Runtime::new(&clock, RuntimeConfig::dedicated());
        rt.run_while(&mut app, frames_left(5)).unwrap();

        // Interval 0 means the throttle never sleeps.
        assert_eq!(rt.throttle().waiter().estimator().sample_count(), 1);
        assert!(clock.sleeps_of(Duration::from_millis(16)) >= 5 * 4);
    }

    // ── interactive mode ──────────────────────────────────────────────────

    #[test]
    fn minimized_skips_render_every_frame_without_starving() {
        let clock = ManualClock::new().with_overshoot(0.0002);
        let mut app = Recorder::new(&clock, 1.0 / 60.0);
        app.minimized = true;

        let mut rt = Runtime::new(&clock, RuntimeConfig::interactive());
        rt.run_while(&mut app, frames_left(10)).unwrap();

        assert_eq!(app.frames.len(), 10);
        assert!(app.frames.iter().all(|f| f.skip_render));
        assert_eq!(clock.sleeps_of(Duration::from_millis(32)), 10);
        assert!(rt.state().skip_render);
    }

    #[test]
    fn restoring_clears_skip_render() {
        let clock = ManualClock::new();
        let mut app = Recorder::new(&clock, 1.0 / 60.0);
        let mut rt = Runtime::new(&clock, RuntimeConfig::interactive());

        app.minimized = true;
        rt.step(&mut app).unwrap();
        app.minimized = false;
        rt.step(&mut app).unwrap();

        assert!(app.frames[0].skip_render);
        assert!(!app.frames[1].skip_render);
        assert!(!rt.state().skip_render);
    }

    #[test]
    fn unfocused_sleeps_but_still_renders() {
        let clock = ManualClock::new();
        let mut app = Recorder::new(&clock, 1.0 / 60.0);
        app.focused = false;

        let mut rt = Runtime::new(&clock, RuntimeConfig::interactive());
        rt.run_while(&mut app, frames_left(6)).unwrap();

        assert_eq!(clock.sleeps_of(Duration::from_millis(16)), 6);
        assert_eq!(clock.sleeps_of(Duration::from_millis(32)), 0);
        assert!(app.frames.iter().all(|f| !f.skip_render));
    }

    #[test]
    fn unfocused_and_minimized_sleep_both() {
        let clock = ManualClock::new();
        let mut app = Recorder::new(&clock, 1.0 / 60.0);
        app.focused = false;
        app.minimized = true;

        let mut rt = Runtime::new(&clock, RuntimeConfig::interactive());
        rt.run_while(&mut app, frames_left(3)).unwrap();

        assert_eq!(clock.sleeps_of(Duration::from_millis(16)), 3);
        assert_eq!(clock.sleeps_of(Duration::from_millis(32)), 3);
        // Idle sleeps already cover the interval, elapsed reflects them.
        for f in &app.frames {
            assert!(f.elapsed() >= 0.048 - 1e-9);
        }
    }

    #[test]
    fn focused_session_has_no_idle_sleeps() {
        let clock = ManualClock::new().with_overshoot(0.0001);
        let mut app = Recorder::new(&clock, 1.0 / 60.0);

        let mut rt = Runtime::new(&clock, RuntimeConfig::interactive());
        rt.run_while(&mut app, frames_left(30)).unwrap();

        assert_eq!(clock.sleeps_of(Duration::from_millis(16)), 0);
        assert_eq!(clock.sleeps_of(Duration::from_millis(32)), 0);
        for f in &app.frames {
            assert!(f.elapsed() >= 1.0 / 60.0 - MARGIN);
            assert!(f.elapsed() < 1.0 / 60.0 + 1e-5);
        }
    }

    // ── shared behavior ───────────────────────────────────────────────────

    #[test]
    fn slow_frames_are_not_throttled_further() {
        let clock = ManualClock::new();
        let mut app = Recorder::new(&clock, 0.01);
        app.work = 0.025;

        let mut rt = Runtime::new(&clock, RuntimeConfig::interactive());
        rt.run_while(&mut app, frames_left(4)).unwrap();

        // First frame is throttled normally, later ones see the 25 ms of work.
        assert!(app.frames[0].elapsed() >= 0.01 - MARGIN);
        for f in &app.frames[1..] {
            assert!((f.elapsed() - 0.025).abs() < 1e-9, "elapsed {}", f.elapsed());
        }
    }

    #[test]
    fn frame_interval_is_reread_every_iteration() {
        let clock = ManualClock::new();
        let mut app = Recorder::new(&clock, 0.01);
        let mut rt = Runtime::new(&clock, RuntimeConfig::interactive());

        rt.run_while(&mut app, frames_left(3)).unwrap();
        app.interval = 0.05;
        rt.run_while(&mut app, frames_left(6)).unwrap();

        assert_eq!(app.frames.len(), 6);
        assert!(app.frames[2].elapsed() < 0.02);
        assert!(app.frames[3].elapsed() >= 0.05 - MARGIN);
    }

    #[test]
    fn timestamps_and_indices_chain() {
        let clock = ManualClock::new().starting_at(10.0).with_overshoot(0.0002);
        let mut app = Recorder::new(&clock, 0.02);
        let mut rt = Runtime::new(&clock, RuntimeConfig::interactive());
        rt.run_while(&mut app, frames_left(8)).unwrap();

        let mut previous = 10.0;
        for (i, f) in app.frames.iter().enumerate() {
            assert_eq!(f.time.frame_index, i as u64);
            assert!((f.time.now - previous - f.elapsed()).abs() < 1e-12);
            assert!(f.time.now >= previous);
            previous = f.time.now;
        }
        assert_eq!(rt.state().previous_frame_time, previous);
        assert_eq!(rt.state().frame_index, 8);
    }

    #[test]
    fn exit_control_stops_the_loop() {
        let clock = ManualClock::new();
        let mut app = Recorder::new(&clock, 0.01);
        app.exit_after = Some(4);

        let mut rt = Runtime::new(&clock, RuntimeConfig::interactive());
        rt.run(&mut app).unwrap();

        assert_eq!(app.frames.len(), 4);
        assert_eq!(rt.state().frame_index, 4);
    }

    #[test]
    fn app_errors_propagate_untouched() {
        let clock = ManualClock::new();
        let mut app = Recorder::new(&clock, 0.01);
        app.fail_at = Some(2);

        let mut rt = Runtime::new(&clock, RuntimeConfig::dedicated());
        let err = rt.run(&mut app).unwrap_err();

        assert_eq!(err.to_string(), "host error at frame 2");
        assert_eq!(app.frames.len(), 2);
        assert_eq!(rt.state().frame_index, 2);
    }

    #[test]
    fn reset_reanchors_previous_frame_time() {
        let clock = ManualClock::new();
        let mut rt = Runtime::new(&clock, RuntimeConfig::interactive());
        clock.advance(3.0);
        rt.reset();
        assert_eq!(rt.state().previous_frame_time, 3.0);
    }

    #[test]
    fn run_system_rejects_invalid_config() {
        struct Never;
        impl App for Never {
            fn frame_interval(&self) -> f64 {
                0.01
            }
            fn on_frame(&mut self, _ctx: &mut FrameCtx) -> Result<AppControl> {
                panic!("loop must not start");
            }
        }

        let mut cfg = RuntimeConfig::default();
        cfg.pacing.estimator.cap = -1.0;
        let err = Runtime::run_system(cfg, &mut Never).unwrap_err();
        assert!(format!("{err:#}").contains("estimator.cap"));
    }
}
