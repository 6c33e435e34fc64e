use std::time::{Duration, Instant};

const FPS_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Frame timing for the scheduler.
///
/// Hands out the wall-clock delta since the previous frame and counts frames
/// between once-per-second samples to produce an integer FPS reading.
#[derive(Debug)]
pub(crate) struct FrameClock {
    last_frame: Instant,
    fps: u32,
    frames_since_sample: u32,
    last_sample: Instant,
}

impl FrameClock {
    pub(crate) fn new(now: Instant) -> Self {
        Self {
            last_frame: now,
            fps: 0,
            frames_since_sample: 0,
            last_sample: now,
        }
    }

    /// Registers one frame at `now` and returns the time since the last one.
    ///
    /// An `Instant` earlier than the previous frame yields a zero delta.
    pub(crate) fn tick(&mut self, now: Instant) -> Duration {
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = self.last_frame.max(now);

        self.frames_since_sample += 1;
        if now.saturating_duration_since(self.last_sample) >= FPS_SAMPLE_INTERVAL {
            self.fps = self.frames_since_sample;
            self.frames_since_sample = 0;
            self.last_sample = now;
            log::debug!("fps: {}", self.fps);
        }

        delta
    }

    /// Frames counted during the last full sample interval.
    pub(crate) fn fps(&self) -> u32 {
        self.fps
    }
}
