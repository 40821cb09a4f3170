use crate::assets::pixels::PixelBuffer;
use crate::foundation::core::Canvas;

/// A rendered frame as straight-alpha RGBA8 bytes.
///
/// Rebuilt on every tick and handed to a [`RenderSurface`](crate::RenderSurface); surfaces copy
/// what they need to keep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Fully transparent frame.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.rgba_len()],
        }
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Overwrite with the full contents of `src`. Sizes must match.
    pub fn copy_from(&mut self, src: &PixelBuffer) {
        debug_assert_eq!(self.canvas(), src.canvas());
        self.data.clear();
        self.data.extend_from_slice(src.as_bytes());
    }

    /// Reset every byte to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// RGBA at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Alpha at `(x, y)`.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y)[3]
    }

    /// Byte-for-byte equality with a source buffer.
    pub fn matches(&self, src: &PixelBuffer) -> bool {
        self.canvas() == src.canvas() && self.data == src.as_bytes()
    }
}
