use std::time::{Duration, Instant};

use crate::assets::pixels::PixelBuffer;
use crate::eval::clock::FrameTime;
use crate::foundation::core::{Canvas, FrameIndex, Fps};
use crate::foundation::error::{RevealError, RevealResult};
use crate::render::frame::FrameRGBA;
use crate::render::surface::RenderSurface;
use crate::reveal::strategy::{RevealOpts, prepare_strategy};
use crate::session::animator::{Animator, TickOutcome};

/// Summary of a fixed-rate drive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveStats {
    /// Ticks issued, including ones that painted nothing.
    pub ticks: u64,
    /// Frames painted to the surface.
    pub frames_painted: u64,
    /// Whether the run reached its terminal frame.
    pub completed: bool,
}

/// Tick `animator` at a fixed rate on a synthetic clock until its run finishes.
///
/// Tick `i` is stamped `origin + i / fps`, standing in for a display refresh. Stops after
/// `max_ticks` so a run stuck in loading cannot spin forever.
#[tracing::instrument(skip(animator))]
pub fn drive_fixed_rate<S: RenderSurface>(
    animator: &mut Animator<S>,
    fps: Fps,
    origin: Instant,
    max_ticks: u64,
) -> RevealResult<DriveStats> {
    let mut stats = DriveStats::default();
    for i in 0..max_ticks {
        let now = origin + fps.frame_offset(FrameIndex(i));
        let outcome = animator.tick(now)?;
        stats.ticks += 1;
        match outcome {
            TickOutcome::Painted { .. } => stats.frames_painted += 1,
            TickOutcome::Completed { .. } => {
                stats.frames_painted += 1;
                stats.completed = true;
                break;
            }
            TickOutcome::Waiting => {}
            TickOutcome::Idle | TickOutcome::Cancelled => break,
        }
    }
    tracing::debug!(?stats, "drive finished");
    Ok(stats)
}

/// Upper bound on ticks needed to finish a run of `duration` at `fps` (plus the terminal tick).
pub fn ticks_for(duration: Duration, fps: Fps) -> u64 {
    (duration.as_secs_f64() * fps.as_f64()).ceil() as u64 + 2
}

/// Render the single frame a run would show `elapsed` after its first tick.
///
/// Scatter runs are monotonic, so sampling one instant from a fresh schedule gives the same
/// pixels a ticking run would.
pub fn render_at(
    subject: RevealResult<PixelBuffer>,
    control: RevealResult<PixelBuffer>,
    canvas: Canvas,
    opts: &RevealOpts,
    elapsed: Duration,
) -> RevealResult<FrameRGBA> {
    opts.validate()?;
    if canvas.is_empty() {
        return Err(RevealError::surface_unavailable(format!(
            "canvas is {}x{}",
            canvas.width, canvas.height
        )));
    }
    let mut strategy = prepare_strategy(subject, control, canvas, opts);
    let mut out = FrameRGBA::transparent(canvas);
    let at = FrameTime::at(elapsed, opts.duration);
    if at.progress.is_complete() {
        strategy.render_final(&mut out);
    } else {
        strategy.render_into(at, &mut out);
    }
    Ok(out)
}
