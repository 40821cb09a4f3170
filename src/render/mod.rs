//! Frame buffers and the surfaces they are painted to.

/// Per-tick frame buffer.
pub mod frame;
/// Render surface contract and built-in surfaces.
pub mod surface;
