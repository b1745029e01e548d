use web_time::{Duration, Instant};

/// Sketch clock: absolute time, clamped frame delta, optional frame cap,
/// and a smoothed FPS readout.
pub struct FrameClock {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Longest delta handed out, in seconds
    max_delta: f32,
    start: Instant,
    last_frame: Option<Instant>,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameClock {
    /// Create a clock with the given FPS target (0 = unlimited) and delta
    /// clamp in seconds.
    pub fn new(target_fps: u32, max_delta: f32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            max_delta,
            start: Instant::now(),
            last_frame: None,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Returns true if enough time has passed since the last frame to
    /// render another.
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame
            .is_none_or(|last| last.elapsed() >= self.min_frame_duration)
    }

    /// Mark the start of a frame at the current instant. Returns
    /// `(time, dt)` in seconds.
    pub fn tick(&mut self) -> (f32, f32) {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) with an explicit timestamp. The first frame
    /// has `dt = 0`.
    pub fn tick_at(&mut self, now: Instant) -> (f32, f32) {
        let elapsed = self
            .last_frame
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last_frame = Some(now);

        if elapsed > 0.0 {
            let instant_fps = 1.0 / elapsed;
            self.smoothed_fps =
                self.smoothed_fps * (1.0 - self.smoothing) + instant_fps * self.smoothing;
        }

        let time = now.saturating_duration_since(self.start).as_secs_f32();
        (time, elapsed.min(self.max_delta))
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}
