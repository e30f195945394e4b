//! Frame loop bookkeeping
//!
//! - [`CancellationToken`] stops the loop; it is checked at the top of each frame
//! - [`FrameClock`] measures frame times and a rolling frame rate

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag that stops the frame loop once set
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop; idempotent
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Frame timing
pub struct FrameClock {
    last_frame: Instant,
    window_start: Instant,
    window_frames: u32,
    fps: f32,
    total_frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Frame rate is averaged over windows of this length
    const FPS_WINDOW: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            window_start: now,
            window_frames: 0,
            fps: 0.0,
            total_frames: 0,
        }
    }

    /// Record a frame at `now`, returning the time since the previous one
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.total_frames += 1;
        self.window_frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= Self::FPS_WINDOW {
            self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
        }
        dt
    }

    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Frames per second over the last full window
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shared_between_clones() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_fps_over_one_second() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        clock.window_start = start;
        clock.last_frame = start;
        for i in 1..=60u64 {
            clock.tick_at(start + Duration::from_millis(i * 1000 / 60));
        }
        assert!((clock.fps() - 60.0).abs() < 1.0, "fps {}", clock.fps());
        assert_eq!(clock.total_frames(), 60);
    }

    #[test]
    fn test_tick_returns_delta() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        clock.last_frame = start;
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert_eq!(dt, Duration::from_millis(16));
    }
}
