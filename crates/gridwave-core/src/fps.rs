use std::time::{Duration, Instant};

/// Frames-per-second meter over one-second wall-clock windows.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    fps: u32,
    window: Duration,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    /// Uses a custom measurement window instead of one second.
    pub fn with_window(window: Duration) -> Self {
        debug_assert!(!window.is_zero());
        Self { window_start: None, frames: 0, fps: 0, window }
    }

    /// Last computed value; zero until the first window closes.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Counts one frame at `now`.
    ///
    /// The first call only opens the window. Returns the new FPS value when a
    /// window closes, after which the frame count restarts.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return None;
        };
        self.frames += 1;

        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.window {
            return None;
        }

        self.fps = (self.frames as f32 / elapsed.as_secs_f32()).round() as u32;
        self.frames = 0;
        self.window_start = Some(now);
        Some(self.fps)
    }
}
