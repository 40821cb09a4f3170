//! Reveal algorithms.
//!
//! A control image's red channel assigns every visible subject pixel a threshold in `[0, 1]`.
//! [`ThresholdFade`](threshold::ThresholdFade) and [`ScatterDelay`](scatter::ScatterDelay) turn
//! those thresholds into frames; [`SweepReveal`](sweep::SweepReveal) is the fallback when the
//! control map cannot be read.

pub mod control;
pub mod scatter;
pub mod schedule;
pub mod strategy;
pub mod sweep;
pub mod threshold;
