use std::time::Duration;

use crate::assets::pixels::PixelBuffer;
use crate::eval::clock::FrameTime;
use crate::foundation::core::{Canvas, Rng64};
use crate::foundation::error::{RevealError, RevealResult};
use crate::render::frame::FrameRGBA;
use crate::reveal::control::ControlMap;
use crate::reveal::scatter::ScatterDelay;
use crate::reveal::schedule::RevealSchedule;
use crate::reveal::sweep::SweepReveal;
use crate::reveal::threshold::{DEFAULT_FADE_WINDOW, ThresholdFade};

/// Per-frame reveal algorithm.
///
/// Strategies own their subject and schedule; `render_into` fully overwrites `out`.
pub trait RevealStrategy: Send {
    /// Which algorithm this is.
    fn mode(&self) -> RevealMode;
    /// The image being revealed (already at surface size).
    fn subject(&self) -> &PixelBuffer;
    /// Render the frame for `at` into `out`.
    fn render_into(&mut self, at: FrameTime, out: &mut FrameRGBA);
    /// Render the terminal frame: the unmodified subject.
    fn render_final(&self, out: &mut FrameRGBA) {
        out.copy_from(self.subject());
    }
}

/// Algorithm actually driving a run (includes the fallback).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealMode {
    /// Threshold scan with a fade band.
    ThresholdFade,
    /// Shuffled per-cohort delays.
    ScatterDelay,
    /// Left-to-right fallback sweep.
    Sweep,
}

/// Strategy requested by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// See [`ThresholdFade`].
    #[default]
    ThresholdFade,
    /// See [`ScatterDelay`].
    ScatterDelay,
}

/// Options for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealOpts {
    /// Requested strategy.
    pub strategy: StrategyKind,
    /// Total run duration.
    pub duration: Duration,
    /// Fade band for [`StrategyKind::ThresholdFade`], in normalized progress.
    pub fade_window: f64,
    /// Shuffle seed for [`StrategyKind::ScatterDelay`]. `None` seeds from the wall clock.
    pub seed: Option<u64>,
}

impl Default for RevealOpts {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::ThresholdFade,
            duration: Duration::from_millis(3000),
            fade_window: DEFAULT_FADE_WINDOW,
            seed: None,
        }
    }
}

impl RevealOpts {
    /// Reject options no run can use.
    pub fn validate(&self) -> RevealResult<()> {
        if self.duration.is_zero() {
            return Err(RevealError::validation("duration must be > 0"));
        }
        if !(self.fade_window > 0.0 && self.fade_window <= 1.0) {
            return Err(RevealError::validation("fade_window must be in (0, 1]"));
        }
        Ok(())
    }
}

/// Build the strategy for a run from the two image inputs.
///
/// Never fails: any unreadable input drops to [`SweepReveal`]. An unreadable subject sweeps a
/// transparent image, so the run still completes on schedule.
pub fn prepare_strategy(
    subject: RevealResult<PixelBuffer>,
    control: RevealResult<PixelBuffer>,
    canvas: Canvas,
    opts: &RevealOpts,
) -> Box<dyn RevealStrategy> {
    let subject = match subject.and_then(|s| s.resized(canvas)) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "subject pixels unreadable, falling back to sweep");
            return Box::new(SweepReveal::new(PixelBuffer::transparent(canvas)));
        }
    };

    let map = match control.and_then(|c| ControlMap::new(c, canvas)) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, "control map unreadable, falling back to sweep");
            return Box::new(SweepReveal::new(subject));
        }
    };

    match opts.strategy {
        StrategyKind::ThresholdFade => {
            let schedule = RevealSchedule::threshold_scan(&subject, &map);
            Box::new(ThresholdFade::new(subject, schedule, opts.fade_window))
        }
        StrategyKind::ScatterDelay => {
            let mut rng = opts.seed.map(Rng64::new).unwrap_or_else(Rng64::from_entropy);
            let schedule = RevealSchedule::scatter(&subject, &map, &mut rng);
            Box::new(ScatterDelay::new(subject, schedule, opts.duration))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_raw(w, h, vec![255u8; (w * h * 4) as usize]).unwrap()
    }

    #[test]
    fn opts_validation() {
        assert!(RevealOpts::default().validate().is_ok());
        let zero = RevealOpts {
            duration: Duration::ZERO,
            ..RevealOpts::default()
        };
        assert!(zero.validate().is_err());
        let wide = RevealOpts {
            fade_window: 1.5,
            ..RevealOpts::default()
        };
        assert!(wide.validate().is_err());
    }

    #[test]
    fn picks_requested_strategy() {
        let canvas = Canvas::new(2, 2);
        let s = prepare_strategy(Ok(px(2, 2)), Ok(px(2, 2)), canvas, &RevealOpts::default());
        assert_eq!(s.mode(), RevealMode::ThresholdFade);

        let opts = RevealOpts {
            strategy: StrategyKind::ScatterDelay,
            seed: Some(1),
            ..RevealOpts::default()
        };
        let s = prepare_strategy(Ok(px(2, 2)), Ok(px(2, 2)), canvas, &opts);
        assert_eq!(s.mode(), RevealMode::ScatterDelay);
    }

    #[test]
    fn unreadable_inputs_fall_back_to_sweep() {
        let canvas = Canvas::new(2, 2);
        let opts = RevealOpts::default();

        let s = prepare_strategy(
            Ok(px(2, 2)),
            Err(RevealError::decode("bad map")),
            canvas,
            &opts,
        );
        assert_eq!(s.mode(), RevealMode::Sweep);
        assert_eq!(s.subject(), &px(2, 2));

        let s = prepare_strategy(Ok(px(2, 2)), Ok(px(0, 0)), canvas, &opts);
        assert_eq!(s.mode(), RevealMode::Sweep);

        let s = prepare_strategy(
            Err(RevealError::decode("bad subject")),
            Ok(px(2, 2)),
            canvas,
            &opts,
        );
        assert_eq!(s.mode(), RevealMode::Sweep);
        assert_eq!(s.subject(), &PixelBuffer::transparent(canvas));
    }

    #[test]
    fn subject_is_resampled_to_canvas() {
        let s = prepare_strategy(
            Ok(px(1, 1)),
            Ok(px(1, 1)),
            Canvas::new(3, 2),
            &RevealOpts::default(),
        );
        assert_eq!(s.subject().canvas(), Canvas::new(3, 2));
    }
}
