//! Pixel-reveal animation engine.
//!
//! Turns a subject image and a grayscale control map into a timed reveal: each subject pixel
//! appears when the run's progress passes the threshold its control-map pixel assigns. The
//! public API is host-driven:
//!
//! - Create an [`Animator`] over a [`RenderSurface`]
//! - [`Animator::start`] (or [`Animator::load`] plus the `supply_*` calls) with [`RevealOpts`]
//! - Call [`Animator::tick`] once per display refresh until the run completes
//!
//! The crate also carries the small pure helpers of the event site the reveal runs on: a
//! days-until [`Countdown`] and RSVP guest-list reconciliation in [`guests`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod countdown;
mod foundation;

pub(crate) mod eval;
pub(crate) mod reveal;
/// RSVP guest-list parsing, party lookup and cell diffs.
pub mod guests;
/// Frame buffers and render surfaces.
pub mod render;
/// Run lifecycle and drivers.
pub mod session;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameStamp, Progress, Rng64, RunId};
pub use crate::foundation::error::{RevealError, RevealResult};

pub use crate::assets::decode::{decode_image, load_image};
pub use crate::assets::pixels::PixelBuffer;
pub use crate::config::RevealConfig;
pub use crate::countdown::{Countdown, days_until, parse_event_date};
pub use crate::eval::clock::{AnimationClock, FrameTime};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::surface::{InMemorySurface, PngSequenceSurface, RenderSurface};
pub use crate::reveal::control::{ControlMap, threshold_from_red};
pub use crate::reveal::scatter::ScatterDelay;
pub use crate::reveal::schedule::{COHORT_COUNT, RevealEntry, RevealSchedule};
pub use crate::reveal::strategy::{
    RevealMode, RevealOpts, RevealStrategy, StrategyKind, prepare_strategy,
};
pub use crate::reveal::sweep::{SweepReveal, visible_columns};
pub use crate::reveal::threshold::{DEFAULT_FADE_WINDOW, ThresholdFade, faded_alpha};
pub use crate::session::animator::{Animator, CancelHandle, RunLoader, RunState, TickOutcome};
pub use crate::session::driver::{DriveStats, drive_fixed_rate, render_at, ticks_for};
