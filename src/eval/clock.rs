use std::time::{Duration, Instant};

use crate::foundation::core::Progress;

/// Wall-clock state of one run, created on its first tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationClock {
    start: Instant,
    duration: Duration,
}

/// Time sample handed to a reveal strategy for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Time since the clock started (saturating at zero).
    pub elapsed: Duration,
    /// `clamp(elapsed / duration, 0, 1)`.
    pub progress: Progress,
}

impl FrameTime {
    /// Sample at an explicit elapsed time, without a wall clock.
    pub fn at(elapsed: Duration, duration: Duration) -> Self {
        Self {
            elapsed,
            progress: Progress::from_elapsed(elapsed, duration),
        }
    }
}

impl AnimationClock {
    /// Start a clock at `start` running for `duration`.
    pub fn new(start: Instant, duration: Duration) -> Self {
        Self { start, duration }
    }

    /// Instant the clock started.
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Total run duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Elapsed time at `now`; timestamps before `start` read as zero.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    /// `clamp((now - start) / duration, 0, 1)`.
    pub fn progress(&self, now: Instant) -> Progress {
        Progress::from_elapsed(self.elapsed(now), self.duration)
    }

    /// Sample elapsed time and progress together.
    pub fn sample(&self, now: Instant) -> FrameTime {
        FrameTime::at(self.elapsed(now), self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_linear_and_clamped() {
        let t0 = Instant::now();
        let clock = AnimationClock::new(t0, Duration::from_millis(1000));
        assert_eq!(clock.progress(t0).get(), 0.0);
        assert_eq!(clock.progress(t0 + Duration::from_millis(250)).get(), 0.25);
        assert_eq!(clock.progress(t0 + Duration::from_millis(2500)).get(), 1.0);
    }

    #[test]
    fn timestamps_before_start_read_as_zero() {
        let t0 = Instant::now() + Duration::from_secs(5);
        let clock = AnimationClock::new(t0, Duration::from_millis(100));
        let early = t0 - Duration::from_secs(1);
        assert_eq!(clock.elapsed(early), Duration::ZERO);
        assert_eq!(clock.sample(early).progress.get(), 0.0);
    }
}
