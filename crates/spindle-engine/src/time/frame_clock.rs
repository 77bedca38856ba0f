use std::time::{Duration, Instant};

/// Timing for one update tick.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    pub now: Instant,
    /// Ticks taken before this one.
    pub frame_index: u64,
}

/// Wall-clock delta source for the update step.
///
/// Deltas are clamped so a debugger pause or a minimized window does not fling
/// the camera across the scene on the next tick.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub const DEFAULT_MIN_DT: Duration = Duration::from_micros(100);
    pub const DEFAULT_MAX_DT: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_clamps(Self::DEFAULT_MIN_DT, Self::DEFAULT_MAX_DT)
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self::starting_at(Instant::now(), dt_min, dt_max)
    }

    fn starting_at(last: Instant, dt_min: Duration, dt_max: Duration) -> Self {
        Self { last, frame_index: 0, dt_min, dt_max }
    }

    /// Moves the baseline to now, so the next delta excludes any stall
    /// (initialization, resize drain).
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Ticks at `now`, returning the clamped delta since the previous tick or
    /// reset.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime { dt: dt.as_secs_f32(), now, frame_index: self.frame_index };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
