use crate::assets::pixels::PixelBuffer;
use crate::eval::clock::FrameTime;
use crate::render::frame::FrameRGBA;
use crate::reveal::strategy::{RevealMode, RevealStrategy};

/// Left-to-right fallback: at progress `p` only the left `floor(width * p)` columns are drawn.
///
/// Needs no per-pixel inspection, so it works when the control image (or the subject's pixel
/// data) could not be read.
#[derive(Debug)]
pub struct SweepReveal {
    subject: PixelBuffer,
}

impl SweepReveal {
    /// Sweep over `subject`.
    pub fn new(subject: PixelBuffer) -> Self {
        Self { subject }
    }
}

/// Number of columns visible at progress `p`.
pub fn visible_columns(width: u32, p: f64) -> u32 {
    ((f64::from(width) * p).floor() as u32).min(width)
}

impl RevealStrategy for SweepReveal {
    fn mode(&self) -> RevealMode {
        RevealMode::Sweep
    }

    fn subject(&self) -> &PixelBuffer {
        &self.subject
    }

    fn render_into(&mut self, at: FrameTime, out: &mut FrameRGBA) {
        out.clear();
        let cols = visible_columns(self.subject.width(), at.progress.get()) as usize;
        if cols == 0 {
            return;
        }
        let row_bytes = self.subject.width() as usize * 4;
        let src = self.subject.as_bytes();
        for y in 0..self.subject.height() as usize {
            let start = y * row_bytes;
            out.data[start..start + cols * 4].copy_from_slice(&src[start..start + cols * 4]);
        }
    }
}
