//! Frame timing
//!
//! Turns wall-clock timestamps into simulation deltas. A single slow or
//! backgrounded frame is capped so the worm cannot tunnel through food or its
//! own body in one step.

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameClock {
    last_time: Option<f64>,
    max_delta_ms: f64,
    /// Ring of recent timestamps; `None` until the slot is first written
    frame_times: [Option<f64>; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl FrameClock {
    /// A negative (or NaN) `max_delta_ms` is treated as 0
    pub fn new(max_delta_ms: f64) -> Self {
        let max_delta_ms = if max_delta_ms >= 0.0 {
            max_delta_ms
        } else {
            log::warn!("Invalid max frame delta {max_delta_ms} ms, using 0");
            0.0
        };
        Self {
            last_time: None,
            max_delta_ms,
            frame_times: [None; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Milliseconds to simulate for a frame stamped `now_ms`
    ///
    /// The first frame after construction or `reset` yields 0. Clocks that run
    /// backwards yield 0 as well.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_time {
            Some(last) => (now_ms - last).max(0.0).min(self.max_delta_ms),
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.record_frame(now_ms);
        delta
    }

    fn record_frame(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = Some(now_ms);
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample sits where the next one will be written
        if let Some(oldest) = self.frame_times[self.frame_index] {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    /// Forget the last timestamp (after a pause in frame delivery)
    pub fn reset(&mut self) {
        self.last_time = None;
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn max_delta_ms(&self) -> f64 {
        self.max_delta_ms
    }
}
