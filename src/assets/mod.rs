//! Image inputs: decoding and the immutable pixel buffers runs are built from.

pub mod decode;
pub mod pixels;
