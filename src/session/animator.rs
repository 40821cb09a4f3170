use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::assets::pixels::PixelBuffer;
use crate::eval::clock::AnimationClock;
use crate::foundation::core::{Canvas, FrameIndex, FrameStamp, Progress, RunId};
use crate::foundation::error::{RevealError, RevealResult};
use crate::render::frame::FrameRGBA;
use crate::render::surface::RenderSurface;
use crate::reveal::strategy::{RevealMode, RevealOpts, RevealStrategy, prepare_strategy};

/// Lifecycle of the animator's current run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// No run has been started.
    Idle,
    /// Waiting for the subject and/or control image.
    Loading,
    /// Ticking with the requested strategy.
    Running,
    /// Ticking with the left-to-right sweep after a pixel-read failure.
    FallbackRunning,
    /// Final frame painted; no further ticks.
    Complete,
    /// Stopped by a cancel; no final frame is painted.
    Cancelled,
}

impl RunState {
    /// Return `true` for states only a new run can leave.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }
}

/// What a single [`Animator::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Nothing to do: no run, or the run already finished.
    Idle,
    /// Still waiting for images; nothing painted.
    Waiting,
    /// Painted an in-progress frame.
    Painted {
        /// Tick index within the run.
        frame: FrameIndex,
        /// Progress the frame was rendered at.
        progress: Progress,
    },
    /// Painted the terminal frame; the run is now [`RunState::Complete`].
    Completed {
        /// Tick index within the run.
        frame: FrameIndex,
    },
    /// The run was cancelled since the last tick; nothing painted.
    Cancelled,
}

/// Cancellation handle for one run.
///
/// Clone and send it wherever teardown happens. Cancelling only stops future ticks; it never
/// jumps to the final frame.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    run: RunId,
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// The run this handle controls.
    pub fn run(&self) -> RunId {
        self.run
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Return `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Join point for the two image decodes; fires when both have arrived.
#[derive(Debug, Default)]
pub struct RunLoader {
    subject: Option<RevealResult<PixelBuffer>>,
    control: Option<RevealResult<PixelBuffer>>,
}

impl RunLoader {
    /// Number of images received so far (0..=2).
    pub fn loaded(&self) -> usize {
        usize::from(self.subject.is_some()) + usize::from(self.control.is_some())
    }

    /// Return `true` once both images have arrived.
    pub fn is_ready(&self) -> bool {
        self.loaded() == 2
    }

    fn take(&mut self) -> Option<(RevealResult<PixelBuffer>, RevealResult<PixelBuffer>)> {
        if !self.is_ready() {
            return None;
        }
        Some((self.subject.take()?, self.control.take()?))
    }
}

struct ActiveRun {
    strategy: Box<dyn RevealStrategy>,
    clock: Option<AnimationClock>,
    frame: FrameRGBA,
    ticks: u64,
}

enum Phase {
    Loading(RunLoader),
    Active(ActiveRun),
    Complete,
    Cancelled,
}

struct RevealRun {
    id: RunId,
    opts: RevealOpts,
    canvas: Canvas,
    cancel: Arc<AtomicBool>,
    phase: Phase,
}

impl RevealRun {
    fn state(&self) -> RunState {
        match &self.phase {
            Phase::Loading(_) => RunState::Loading,
            Phase::Active(a) if a.strategy.mode() == RevealMode::Sweep => {
                RunState::FallbackRunning
            }
            Phase::Active(_) => RunState::Running,
            Phase::Complete => RunState::Complete,
            Phase::Cancelled => RunState::Cancelled,
        }
    }

    fn enter(&mut self, phase: Phase) {
        let from = self.state();
        self.phase = phase;
        tracing::debug!(run = self.id.0, ?from, to = ?self.state(), "run state change");
    }

    fn activate_if_ready(&mut self) {
        let Phase::Loading(loader) = &mut self.phase else {
            return;
        };
        let Some((subject, control)) = loader.take() else {
            return;
        };
        let strategy = prepare_strategy(subject, control, self.canvas, &self.opts);
        let frame = FrameRGBA::transparent(self.canvas);
        self.enter(Phase::Active(ActiveRun {
            strategy,
            clock: None,
            frame,
            ticks: 0,
        }));
    }
}

/// Drives reveal runs onto one render surface.
///
/// The host calls [`tick`](Self::tick) once per display refresh. At most one run exists at a
/// time: starting a new run cancels and drops the previous one before anything else touches the
/// surface, so frames from two runs never interleave.
pub struct Animator<S> {
    surface: S,
    run: Option<RevealRun>,
    next_run: u64,
}

impl<S: RenderSurface> Animator<S> {
    /// Create an idle animator painting to `surface`.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            run: None,
            next_run: 0,
        }
    }

    /// Begin a run whose images will arrive later via [`supply_subject`](Self::supply_subject)
    /// and [`supply_control`](Self::supply_control).
    ///
    /// Fails with [`RevealError::SurfaceUnavailable`] when the surface has no drawable area; in
    /// that case no run exists afterwards.
    #[tracing::instrument(skip_all, fields(strategy = ?opts.strategy))]
    pub fn load(&mut self, opts: RevealOpts) -> RevealResult<CancelHandle> {
        self.discard_current();
        opts.validate()?;

        let canvas = self
            .surface
            .canvas()
            .ok_or_else(|| RevealError::surface_unavailable("surface has no drawable context"))?;
        if canvas.is_empty() {
            return Err(RevealError::surface_unavailable(format!(
                "surface is {}x{}",
                canvas.width, canvas.height
            )));
        }

        let id = RunId(self.next_run);
        self.next_run += 1;
        self.surface.clear(id)?;

        let flag = Arc::new(AtomicBool::new(false));
        self.run = Some(RevealRun {
            id,
            opts,
            canvas,
            cancel: Arc::clone(&flag),
            phase: Phase::Loading(RunLoader::default()),
        });
        tracing::debug!(run = id.0, "run loading");
        Ok(CancelHandle { run: id, flag })
    }

    /// Start a run with both images already decoded (or failed).
    ///
    /// Decode failures are not errors here: they switch the run to the sweep fallback.
    pub fn start(
        &mut self,
        subject: RevealResult<PixelBuffer>,
        control: RevealResult<PixelBuffer>,
        opts: RevealOpts,
    ) -> RevealResult<CancelHandle> {
        let handle = self.load(opts)?;
        self.supply_subject(handle.run(), subject);
        self.supply_control(handle.run(), control);
        Ok(handle)
    }

    /// Deliver the subject image for `run`. Images for stale runs are dropped.
    pub fn supply_subject(&mut self, run: RunId, image: RevealResult<PixelBuffer>) -> RunState {
        self.supply(run, |loader| loader.subject = Some(image))
    }

    /// Deliver the control image for `run`. Images for stale runs are dropped.
    pub fn supply_control(&mut self, run: RunId, image: RevealResult<PixelBuffer>) -> RunState {
        self.supply(run, |loader| loader.control = Some(image))
    }

    fn supply(&mut self, run: RunId, put: impl FnOnce(&mut RunLoader)) -> RunState {
        let Some(current) = self.run.as_mut() else {
            tracing::debug!(run = run.0, "dropping image: no run");
            return RunState::Idle;
        };
        if current.id != run || current.cancel.load(Ordering::Acquire) {
            tracing::debug!(run = run.0, current = current.id.0, "dropping image for stale run");
            return current.state();
        }
        if !matches!(current.phase, Phase::Loading(_)) {
            tracing::debug!(run = run.0, "dropping image: run is past loading");
            return current.state();
        }
        if let Phase::Loading(loader) = &mut current.phase {
            put(loader);
        }
        current.activate_if_ready();
        current.state()
    }

    /// Cancel the current run, if any. Nothing further is painted for it.
    pub fn cancel(&mut self) {
        if let Some(run) = self.run.as_mut() {
            run.cancel.store(true, Ordering::Release);
            if !run.state().is_terminal() {
                run.enter(Phase::Cancelled);
            }
        }
    }

    /// Advance the current run to `now` and paint one frame if it is ticking.
    pub fn tick(&mut self, now: Instant) -> RevealResult<TickOutcome> {
        let Self { surface, run, .. } = self;
        let Some(run) = run.as_mut() else {
            return Ok(TickOutcome::Idle);
        };

        if run.cancel.load(Ordering::Acquire) && !run.state().is_terminal() {
            run.enter(Phase::Cancelled);
            return Ok(TickOutcome::Cancelled);
        }

        let outcome = match &mut run.phase {
            Phase::Loading(_) => return Ok(TickOutcome::Waiting),
            Phase::Complete | Phase::Cancelled => return Ok(TickOutcome::Idle),
            Phase::Active(active) => {
                let duration = run.opts.duration;
                let clock = *active
                    .clock
                    .get_or_insert_with(|| AnimationClock::new(now, duration));
                let at = clock.sample(now);
                let frame = FrameIndex(active.ticks);
                let stamp = FrameStamp { run: run.id, frame };

                if at.progress.is_complete() {
                    active.strategy.render_final(&mut active.frame);
                    surface.paint(stamp, &active.frame)?;
                    active.ticks += 1;
                    TickOutcome::Completed { frame }
                } else {
                    active.strategy.render_into(at, &mut active.frame);
                    surface.paint(stamp, &active.frame)?;
                    active.ticks += 1;
                    TickOutcome::Painted {
                        frame,
                        progress: at.progress,
                    }
                }
            }
        };

        if let TickOutcome::Completed { .. } = outcome {
            run.enter(Phase::Complete);
        }
        Ok(outcome)
    }

    /// State of the current run ([`RunState::Idle`] when none was started).
    pub fn state(&self) -> RunState {
        self.run.as_ref().map_or(RunState::Idle, RevealRun::state)
    }

    /// Id of the current run.
    pub fn run_id(&self) -> Option<RunId> {
        self.run.as_ref().map(|r| r.id)
    }

    /// Algorithm driving the current run, once it is ticking.
    pub fn mode(&self) -> Option<RevealMode> {
        match &self.run.as_ref()?.phase {
            Phase::Active(a) => Some(a.strategy.mode()),
            _ => None,
        }
    }

    /// Borrow the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutably borrow the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Drop any run and return the surface.
    pub fn into_surface(mut self) -> S {
        self.discard_current();
        self.surface
    }

    fn discard_current(&mut self) {
        if let Some(mut prev) = self.run.take() {
            prev.cancel.store(true, Ordering::Release);
            if !prev.state().is_terminal() {
                prev.enter(Phase::Cancelled);
            }
            tracing::debug!(run = prev.id.0, "discarded previous run");
        }
    }
}
