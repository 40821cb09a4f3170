//! Run lifecycle: the animator state machine and the drivers that tick it.

/// Animator, run states and cancellation.
pub mod animator;
/// Fixed-rate and single-instant drivers.
pub mod driver;
