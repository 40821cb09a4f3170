use std::sync::Arc;

use image::imageops::FilterType;

use crate::foundation::core::Canvas;
use crate::foundation::error::{RevealError, RevealResult};

/// Immutable straight-alpha RGBA8 grid with random pixel access.
///
/// Cloning is cheap: the pixel bytes are shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 bytes, validating that they cover `width * height` pixels.
    pub fn from_raw(width: u32, height: u32, rgba8: Vec<u8>) -> RevealResult<Self> {
        let expected = Canvas::new(width, height).rgba_len();
        if rgba8.len() != expected {
            return Err(RevealError::decode(format!(
                "pixel data for {width}x{height} must be {expected} bytes, got {}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// Take ownership of a decoded `image` buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            rgba8: Arc::new(img.into_raw()),
        }
    }

    /// Fully transparent buffer of the given size.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            rgba8: Arc::new(vec![0u8; canvas.rgba_len()]),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba8
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// RGBA at `(x, y)`. Out-of-range coordinates read as transparent.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = self.offset(x, y);
        [
            self.rgba8[i],
            self.rgba8[i + 1],
            self.rgba8[i + 2],
            self.rgba8[i + 3],
        ]
    }

    /// Red channel at `(x, y)`.
    pub fn red(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y)[0]
    }

    /// Alpha channel at `(x, y)`.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y)[3]
    }

    /// Resample to `target` (triangle filter). Returns a cheap clone when sizes already match.
    pub fn resized(&self, target: Canvas) -> RevealResult<Self> {
        if self.canvas() == target {
            return Ok(self.clone());
        }
        if target.is_empty() || self.canvas().is_empty() {
            return Ok(Self::transparent(target));
        }
        let img =
            image::RgbaImage::from_raw(self.width, self.height, self.rgba8.as_ref().clone())
                .ok_or_else(|| RevealError::decode("pixel buffer length mismatch"))?;
        let out = image::imageops::resize(&img, target.width, target.height, FilterType::Triangle);
        Ok(Self::from_rgba_image(out))
    }

    /// Copy into an `image` buffer, e.g. for PNG output.
    pub fn to_rgba_image(&self) -> RevealResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.rgba8.as_ref().clone())
            .ok_or_else(|| RevealError::decode("pixel buffer length mismatch"))
    }
}
