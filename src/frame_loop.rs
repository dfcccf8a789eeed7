use std::time::{Duration, Instant};

/// Paces the main loop to the live FPS cap and tracks frame statistics.
///
/// `pace` blocks until the next frame slot opens, then returns the delta
/// time for the frame about to run. A cap change takes effect on the next
/// call, not retroactively.
pub struct FrameClock {
    cap: f32,
    last_frame: Instant,
    elapsed: f32,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl FrameClock {
    pub fn new(cap: f32) -> Self {
        Self {
            cap,
            last_frame: Instant::now(),
            elapsed: 0.0,
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    pub fn set_cap(&mut self, cap: f32) {
        self.cap = cap;
    }

    /// Elapsed seconds since the clock started, fed to the scene shader.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Measured frame rate, updated about once a second.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Block until the next frame slot, then account for the new frame and
    /// return its delta time in seconds.
    pub fn pace(&mut self) -> f32 {
        let period = Duration::from_secs_f32(1.0 / self.cap.max(1.0));

        // Sleep so consecutive frames start at least one period apart.
        let target = self.last_frame + period;
        let now = Instant::now();
        if now < target {
            std::thread::sleep(target - now);
        }

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().clamp(0.0, 0.1);
        self.last_frame = now;
        self.elapsed += dt;

        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        dt
    }
}
