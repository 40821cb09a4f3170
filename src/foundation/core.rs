use std::time::Duration;

use crate::foundation::error::{RevealError, RevealResult};

/// Pixel dimensions of an image, frame or surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by the canvas.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Return `true` when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Length in bytes of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.area() as usize).saturating_mul(4)
    }
}

/// Absolute 0-based tick index within one run.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Identifier of one animation run. A restart always allocates a fresh id.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RunId(pub u64);

/// Tag attached to every painted frame so surfaces can tell runs apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameStamp {
    /// Run that produced the frame.
    pub run: RunId,
    /// Tick index within the run.
    pub frame: FrameIndex,
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> RevealResult<Self> {
        if den == 0 {
            return Err(RevealError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(RevealError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Wall-clock offset of frame `frame` from the start of a run.
    pub fn frame_offset(self, frame: FrameIndex) -> Duration {
        Duration::from_secs_f64((frame.0 as f64) * f64::from(self.den) / f64::from(self.num))
    }
}

/// Normalized elapsed time in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Progress(f64);

impl Progress {
    /// Progress at the start of a run.
    pub const START: Self = Self(0.0);
    /// Progress of a finished run.
    pub const END: Self = Self(1.0);

    /// Clamp `value` into `[0, 1]`. NaN maps to 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// `clamp(elapsed / duration, 0, 1)`. A zero duration is immediately complete.
    pub fn from_elapsed(elapsed: Duration, duration: Duration) -> Self {
        if duration.is_zero() {
            return Self::END;
        }
        Self::new(elapsed.as_secs_f64() / duration.as_secs_f64())
    }

    /// Raw value in `[0, 1]`.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Return `true` once progress has reached 1.0.
    pub fn is_complete(self) -> bool {
        self.0 >= 1.0
    }
}

/// Small deterministic PRNG (SplitMix64) used for cohort shuffles.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Seed a new generator.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the wall clock, so consecutive runs shuffle differently.
    pub fn from_entropy() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos ^ (u64::from(std::process::id()) << 32))
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        // Multiply-shift keeps the bias negligible for image-sized bounds.
        ((u128::from(self.next_u64()) * bound as u128) >> 64) as usize
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_and_handles_zero_duration() {
        let d = Duration::from_millis(1000);
        assert_eq!(Progress::from_elapsed(Duration::ZERO, d).get(), 0.0);
        assert_eq!(Progress::from_elapsed(Duration::from_millis(500), d).get(), 0.5);
        assert_eq!(Progress::from_elapsed(Duration::from_millis(5000), d).get(), 1.0);
        assert!(Progress::from_elapsed(Duration::ZERO, Duration::ZERO).is_complete());
        assert_eq!(Progress::new(f64::NAN), Progress::START);
        assert_eq!(Progress::new(-3.0), Progress::START);
    }

    #[test]
    fn fps_validates_and_offsets_frames() {
        assert!(Fps::new(0, 1).is_err());
        assert!(Fps::new(30, 0).is_err());
        let fps = Fps::new(50, 1).unwrap();
        assert_eq!(fps.frame_offset(FrameIndex(25)), Duration::from_millis(500));
    }

    #[test]
    fn canvas_area_and_emptiness() {
        assert_eq!(Canvas::new(3, 2).area(), 6);
        assert_eq!(Canvas::new(3, 2).rgba_len(), 24);
        assert!(Canvas::new(0, 2).is_empty());
        assert!(!Canvas::new(1, 1).is_empty());
    }

    #[test]
    fn rng_is_deterministic() {
        let mut a = Rng64::new(123);
        let mut b = Rng64::new(123);
        for _ in 0..10 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = Rng64::new(7);
        let mut v: Vec<u32> = (0..100).collect();
        rng.shuffle(&mut v);
        assert_ne!(v, (0..100).collect::<Vec<_>>());
        let mut sorted = v.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());
    }
}
