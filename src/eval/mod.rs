//! Time evaluation for runs.

pub mod clock;
