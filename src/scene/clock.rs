use std::time::Instant;

/// Source of elapsed seconds since the scene started.
pub trait TimeSource {
    fn elapsed(&mut self) -> f32;
}

/// Wall-clock time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TimeSource for WallClock {
    fn elapsed(&mut self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Hand-driven time for tests and scripted runs.
///
/// Each read returns the current time and then moves it forward by
/// `auto_advance`, so a loop sees 0, dt, 2·dt, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f32,
    auto_advance: f32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticking(frame_time: f32) -> Self {
        Self {
            now: 0.0,
            auto_advance: frame_time,
        }
    }

    pub fn advance(&mut self, seconds: f32) {
        self.now += seconds;
    }

    pub fn set(&mut self, seconds: f32) {
        self.now = seconds;
    }
}

impl TimeSource for ManualClock {
    fn elapsed(&mut self) -> f32 {
        let now = self.now;
        self.now += self.auto_advance;
        now
    }
}

/// Turns successive elapsed-time readings into per-frame deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    previous_elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous reading. Never negative: a reading earlier
    /// than the previous one yields 0 and is otherwise ignored.
    pub fn delta(&mut self, elapsed: f32) -> f32 {
        let delta = (elapsed - self.previous_elapsed).max(0.0);
        self.previous_elapsed = self.previous_elapsed.max(elapsed);
        delta
    }

    pub fn previous_elapsed(&self) -> f32 {
        self.previous_elapsed
    }
}
