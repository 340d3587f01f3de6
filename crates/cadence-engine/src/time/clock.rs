use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

/// Monotonic time source plus the two ways of passing time on it.
///
/// Timestamps are seconds since an arbitrary, per-clock origin. They never
/// decrease between calls.
pub trait Clock {
    /// Current monotonic timestamp in seconds.
    fn now(&self) -> f64;

    /// Blocking OS sleep request. The actual duration is at least `duration`
    /// and usually somewhat more.
    fn sleep(&self, duration: Duration);

    /// Issues `pauses` CPU pause hints. Never blocks.
    fn relax(&self, pauses: u32) {
        for _ in 0..pauses {
            std::hint::spin_loop();
        }
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }

    fn relax(&self, pauses: u32) {
        (**self).relax(pauses)
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }

    fn relax(&self, pauses: u32) {
        (**self).relax(pauses)
    }
}

/// Wall clock backed by `Instant` and `thread::sleep`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic simulated clock.
///
/// Time only moves when the code under test asks it to:
/// - `sleep(d)` advances by `d + overshoot`
/// - `relax(n)` advances by `spin_step`, whatever `n` is (`n` is recorded)
/// - `advance(s)` moves time forward explicitly (e.g. to model frame work)
///
/// Every sleep request is recorded, which lets callers tell precise-wait
/// sleeps apart from idle sleeps.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<f64>,
    overshoot: f64,
    spin_step: f64,
    sleeps: RefCell<Vec<Duration>>,
    relaxes: Cell<u64>,
    last_pauses: Cell<Option<u32>>,
}

impl ManualClock {
    /// Starts at t = 0 with exact sleeps and a 0.1 µs spin step.
    pub fn new() -> Self {
        Self {
            now: Cell::new(0.0),
            overshoot: 0.0,
            spin_step: 1e-7,
            sleeps: RefCell::new(Vec::new()),
            relaxes: Cell::new(0),
            last_pauses: Cell::new(None),
        }
    }

    /// Every sleep takes `overshoot` seconds longer than requested.
    pub fn with_overshoot(mut self, overshoot: f64) -> Self {
        self.overshoot = overshoot.max(0.0);
        self
    }

    /// Time consumed by one `relax` call. Must be positive or spin loops stall.
    pub fn with_spin_step(mut self, spin_step: f64) -> Self {
        debug_assert!(spin_step > 0.0);
        self.spin_step = spin_step;
        self
    }

    pub fn starting_at(self, t: f64) -> Self {
        self.now.set(t);
        self
    }

    /// Moves time forward by `seconds`. Negative values are ignored.
    pub fn advance(&self, seconds: f64) {
        if seconds > 0.0 {
            self.now.set(self.now.get() + seconds);
        }
    }

    /// All sleep requests issued so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    /// Number of sleep requests equal to `duration`.
    pub fn sleeps_of(&self, duration: Duration) -> usize {
        self.sleeps.borrow().iter().filter(|d| **d == duration).count()
    }

    pub fn relax_count(&self) -> u64 {
        self.relaxes.get()
    }

    /// Pause count passed to the most recent `relax`.
    pub fn last_pauses(&self) -> Option<u32> {
        self.last_pauses.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration.as_secs_f64() + self.overshoot);
    }

    fn relax(&self, pauses: u32) {
        self.relaxes.set(self.relaxes.get() + 1);
        self.last_pauses.set(Some(pauses));
        self.advance(self.spin_step);
    }
}
