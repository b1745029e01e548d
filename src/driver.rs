//! Per-tick orchestration of the render passes.
//!
//! The driver owns the ping-pong index and a [`FrameBackend`]; each call to
//! [`FrameDriver::tick`] runs noise update, seed, spread, swap, and present
//! in that order.

use glam::Vec2;

use crate::options::Options;
use crate::params::{Blob, SeedParams, SpreadParams};

/// Operations a renderer must provide for one animation tick.
///
/// Buffer slots are `0` and `1`; the driver guarantees `read != write`.
pub trait FrameBackend {
    /// Error returned by [`present`](Self::present).
    type Error;

    /// Size of the offscreen buffers in pixels.
    fn resolution(&self) -> Vec2;

    /// Advance the flow field by `dt` seconds.
    fn update_noise(&mut self, dt: f32);

    /// Draw the blob layer into the seed buffer.
    fn render_seed(&mut self, params: &SeedParams<'_>);

    /// Read buffer `read` and the seed buffer, write buffer `write`.
    fn render_spread(&mut self, params: &SpreadParams, read: usize, write: usize);

    /// Show buffer `slot` on the output.
    ///
    /// # Errors
    ///
    /// Backend-specific presentation failure.
    fn present(&mut self, slot: usize) -> Result<(), Self::Error>;
}

/// Lifecycle of a [`FrameDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Created; no tick has run yet.
    Idle,
    /// At least one tick has run.
    Running {
        /// Ticks completed so far.
        frames: u64,
    },
}

/// Index of the ping-pong buffer currently holding the latest result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PingPong {
    current: usize,
}

impl PingPong {
    /// Slot the next spread pass reads.
    pub fn read_slot(self) -> usize {
        self.current
    }

    /// Slot the next spread pass writes.
    pub fn write_slot(self) -> usize {
        1 - self.current
    }

    /// Flip read and write.
    pub fn swap(&mut self) {
        self.current = self.write_slot();
    }
}

/// Drives a [`FrameBackend`] once per animation tick.
pub struct FrameDriver<B> {
    backend: B,
    state: DriverState,
    ping_pong: PingPong,
    blobs: Vec<Blob>,
    tint: [f32; 3],
    spread: SpreadParams,
}

impl<B: FrameBackend> FrameDriver<B> {
    /// Wrap `backend`, taking blob layout and spread tuning from `options`.
    pub fn new(backend: B, options: &Options) -> Self {
        let spread = &options.spread;
        let resolution = backend.resolution();
        Self {
            backend,
            state: DriverState::Idle,
            ping_pong: PingPong::default(),
            blobs: options.seed.blobs.clone(),
            tint: options.seed.tint,
            spread: SpreadParams {
                resolution,
                dt: 0.0,
                flow_scale: spread.flow_scale,
                blur_radius: spread.blur_radius,
                decay_rate: spread.decay_rate,
                decay_floor: spread.decay_floor,
            },
        }
    }

    /// Run one frame at absolute `time` seconds, `dt` seconds after the
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns the backend's presentation error. The ping-pong swap has
    /// already happened by then, so the next tick continues from the
    /// freshly written buffer.
    pub fn tick(&mut self, time: f32, dt: f32) -> Result<(), B::Error> {
        let resolution = self.backend.resolution();
        log::trace!("tick t={time:.3} dt={dt:.4}");

        self.backend.update_noise(dt);
        self.backend.render_seed(&SeedParams {
            resolution,
            time,
            tint: self.tint,
            blobs: &self.blobs,
        });

        let spread = SpreadParams {
            resolution,
            dt,
            ..self.spread
        };
        self.backend.render_spread(
            &spread,
            self.ping_pong.read_slot(),
            self.ping_pong.write_slot(),
        );
        self.ping_pong.swap();

        self.state = match self.state {
            DriverState::Idle => {
                log::debug!("first frame at {}x{}", resolution.x, resolution.y);
                DriverState::Running { frames: 1 }
            }
            DriverState::Running { frames } => DriverState::Running { frames: frames + 1 },
        };

        self.backend.present(self.ping_pong.read_slot())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Current ping-pong index.
    pub fn ping_pong(&self) -> PingPong {
        self.ping_pong
    }

    /// Shared access to the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend, e.g. to resize the surface.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consume the driver, returning the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::CpuBackend;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Noise(f32),
        Seed { time: f32, blobs: usize },
        Spread { dt: f32, read: usize, write: usize },
        Present(usize),
    }

    /// Records every backend call in order.
    struct Recorder {
        calls: Vec<Call>,
        fail_present: bool,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                fail_present: false,
            }
        }
    }

    impl FrameBackend for Recorder {
        type Error = &'static str;

        fn resolution(&self) -> Vec2 {
            Vec2::new(32.0, 16.0)
        }

        fn update_noise(&mut self, dt: f32) {
            self.calls.push(Call::Noise(dt));
        }

        fn render_seed(&mut self, params: &SeedParams<'_>) {
            assert_eq!(params.resolution, Vec2::new(32.0, 16.0));
            self.calls.push(Call::Seed {
                time: params.time,
                blobs: params.blobs.len(),
            });
        }

        fn render_spread(&mut self, params: &SpreadParams, read: usize, write: usize) {
            self.calls.push(Call::Spread {
                dt: params.dt,
                read,
                write,
            });
        }

        fn present(&mut self, slot: usize) -> Result<(), Self::Error> {
            self.calls.push(Call::Present(slot));
            if self.fail_present {
                Err("lost")
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn tick_runs_passes_in_order() {
        let mut driver = FrameDriver::new(Recorder::new(), &Options::default());
        driver.tick(1.5, 0.25).unwrap();

        assert_eq!(
            driver.backend().calls,
            vec![
                Call::Noise(0.25),
                Call::Seed { time: 1.5, blobs: 4 },
                Call::Spread { dt: 0.25, read: 0, write: 1 },
                Call::Present(1),
            ]
        );
    }

    #[test]
    fn ping_pong_alternates_every_tick() {
        let mut driver = FrameDriver::new(Recorder::new(), &Options::default());
        let mut expected = 0;
        for frame in 0..10 {
            assert_eq!(driver.ping_pong().read_slot(), expected);
            driver.tick(frame as f32, 0.016).unwrap();
            expected = 1 - expected;
        }

        let spreads: Vec<(usize, usize)> = driver
            .backend()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Spread { read, write, .. } => Some((*read, *write)),
                _ => None,
            })
            .collect();
        for (i, (read, write)) in spreads.iter().enumerate() {
            assert_eq!(*read, i % 2);
            assert_eq!(*write, 1 - i % 2);
        }
    }

    #[test]
    fn presents_the_buffer_just_written() {
        let mut driver = FrameDriver::new(Recorder::new(), &Options::default());
        for frame in 0..4 {
            driver.tick(frame as f32, 0.1).unwrap();
        }
        let calls = &driver.backend().calls;
        for pair in calls.windows(2) {
            if let [Call::Spread { write, .. }, Call::Present(slot)] = pair {
                assert_eq!(write, slot);
            }
        }
    }

    #[test]
    fn state_moves_from_idle_to_running() {
        let mut driver = FrameDriver::new(Recorder::new(), &Options::default());
        assert_eq!(driver.state(), DriverState::Idle);
        driver.tick(0.0, 0.0).unwrap();
        assert_eq!(driver.state(), DriverState::Running { frames: 1 });
        driver.tick(0.1, 0.1).unwrap();
        assert_eq!(driver.state(), DriverState::Running { frames: 2 });
    }

    #[test]
    fn present_error_still_swaps() {
        let mut recorder = Recorder::new();
        recorder.fail_present = true;
        let mut driver = FrameDriver::new(recorder, &Options::default());

        assert_eq!(driver.tick(0.0, 0.0), Err("lost"));
        assert_eq!(driver.ping_pong().read_slot(), 1);
        assert!(matches!(driver.state(), DriverState::Running { .. }));
    }

    #[test]
    fn ping_pong_swap_flips() {
        let mut pp = PingPong::default();
        assert_eq!((pp.read_slot(), pp.write_slot()), (0, 1));
        pp.swap();
        assert_eq!((pp.read_slot(), pp.write_slot()), (1, 0));
        pp.swap();
        assert_eq!(pp, PingPong::default());
    }

    #[test]
    fn first_tick_inks_the_first_blob() {
        let options = Options::default();
        let mut driver = FrameDriver::new(CpuBackend::new(16, 16, &options), &options);
        driver.tick(0.0, 0.0).unwrap();

        let backend = driver.backend();
        assert_eq!(backend.presented_slot(), Some(1));
        let presented = backend.presented().unwrap();
        // texel (8, 6) sits next to the first blob's center (0, 0.1)
        assert!(presented.alpha(8, 6) > presented.alpha(0, 0));
        assert_eq!(presented.alpha(0, 0), 0.0);
        assert!(backend.frame().get(8, 6)[0] > 0.25);
    }

    #[test]
    fn ink_stays_bounded_and_evolves_gradually() {
        // The blobs keep orbiting, so the total ink has no fixed point; it
        // must stay bounded and change slowly from tick to tick.
        let options = Options::default();
        let mut driver = FrameDriver::new(CpuBackend::new(16, 16, &options), &options);
        let dt = 1.0 / 60.0;
        let mut totals = Vec::with_capacity(100);
        for frame in 0..100 {
            driver.tick(frame as f32 * dt, dt).unwrap();
            totals.push(driver.backend().presented().unwrap().alpha_sum());
        }

        let presented = driver.backend().presented().unwrap();
        assert!(presented
            .texels()
            .iter()
            .all(|t| t[3].is_finite() && (0.0..=1.0).contains(&t[3])));
        let total = totals[99];
        assert!(total > 0.0, "{total}");
        assert!(total < 256.0, "{total}");

        let late = &totals[89..];
        for pair in late.windows(2) {
            let change = (pair[1] - pair[0]).abs() / pair[0];
            assert!(change < 0.05, "{pair:?}");
        }
        let window_change = (late[10] - late[0]).abs() / late[0];
        assert!(window_change < 0.25, "{} -> {}", late[0], late[10]);
    }

    #[test]
    fn custom_spread_options_reach_the_backend() {
        let mut options = Options::default();
        options.spread.decay_floor = 0.0;
        options.spread.decay_rate = 0.0;
        options.seed.blobs.truncate(1);
        options.seed.blobs[0].radius = 1e-4;

        let mut backend = CpuBackend::new(8, 8, &options);
        *backend.buffer_mut(0) = crate::raster::Image::filled(8, 8, [1.0, 1.0, 1.0, 0.25]);
        let mut driver = FrameDriver::new(backend, &options);
        driver.tick(0.0, 1.0).unwrap();

        // no decay and a seed blob too small to touch any texel center
        let presented = driver.backend().presented().unwrap();
        assert!((presented.alpha(2, 5) - 0.25).abs() < 1e-6);
    }
}
