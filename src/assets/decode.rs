use std::path::Path;

use anyhow::Context;

use crate::{
    assets::pixels::PixelBuffer,
    foundation::error::{RevealError, RevealResult},
};

/// Decode an encoded image (PNG, JPEG, ...) into straight-alpha RGBA8.
///
/// Decode failures come back as [`RevealError::Decode`] so callers can route them into the sweep
/// fallback instead of aborting.
pub fn decode_image(bytes: &[u8]) -> RevealResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| RevealError::decode(format!("decode image from memory: {e}")))?;
    Ok(PixelBuffer::from_rgba_image(dyn_img.to_rgba8()))
}

/// Read and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> RevealResult<PixelBuffer> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| match e {
        RevealError::Decode(msg) => RevealError::decode(format!("{}: {msg}", path.display())),
        other => other,
    })
}
