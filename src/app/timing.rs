//! Frame timing and the window-title FPS readout.

use std::time::{Duration, Instant};

const SAMPLE_WINDOW: Duration = Duration::from_millis(500);

pub struct FrameTiming {
    window_start: Instant,
    frames_in_window: u32,
}

impl FrameTiming {
    pub fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames_in_window: 0,
        }
    }

    /// Counts one frame. Returns the averaged FPS once per sample
    /// window, None otherwise.
    pub fn tick(&mut self) -> Option<f32> {
        self.frames_in_window += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed < SAMPLE_WINDOW {
            return None;
        }
        let fps = self.frames_in_window as f32 / elapsed.as_secs_f32();
        self.window_start = Instant::now();
        self.frames_in_window = 0;
        Some(fps)
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}
