use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, FrameStamp, RunId};
use crate::foundation::error::{RevealError, RevealResult};
use crate::render::frame::FrameRGBA;

/// Paint target for reveal frames.
///
/// Each `paint` replaces whatever the surface showed before; there is no blending across frames.
pub trait RenderSurface {
    /// Drawable size, or `None` when the surface has no drawable context.
    fn canvas(&self) -> Option<Canvas>;
    /// Replace the surface contents with `frame`.
    fn paint(&mut self, stamp: FrameStamp, frame: &FrameRGBA) -> RevealResult<()>;
    /// Clear the surface to transparent. Called once when `run` takes over the surface.
    fn clear(&mut self, run: RunId) -> RevealResult<()>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn canvas(&self) -> Option<Canvas> {
        (**self).canvas()
    }

    fn paint(&mut self, stamp: FrameStamp, frame: &FrameRGBA) -> RevealResult<()> {
        (**self).paint(stamp, frame)
    }

    fn clear(&mut self, run: RunId) -> RevealResult<()> {
        (**self).clear(run)
    }
}

/// In-memory surface for tests and debugging. Keeps every painted frame.
#[derive(Debug)]
pub struct InMemorySurface {
    canvas: Option<Canvas>,
    frames: Vec<(FrameStamp, FrameRGBA)>,
    clears: Vec<RunId>,
    shown: Option<FrameRGBA>,
}

impl InMemorySurface {
    /// Create a surface of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas: Some(canvas),
            frames: Vec::new(),
            clears: Vec::new(),
            shown: None,
        }
    }

    /// A surface without a drawable context.
    pub fn detached() -> Self {
        Self {
            canvas: None,
            frames: Vec::new(),
            clears: Vec::new(),
            shown: None,
        }
    }

    /// Painted frames in paint order.
    pub fn frames(&self) -> &[(FrameStamp, FrameRGBA)] {
        &self.frames
    }

    /// What the surface currently shows: the last paint, or a transparent frame after a clear.
    ///
    /// `None` until the surface is first cleared or painted.
    pub fn current(&self) -> Option<&FrameRGBA> {
        self.shown.as_ref()
    }

    /// Runs that cleared the surface, in order.
    pub fn clears(&self) -> &[RunId] {
        &self.clears
    }
}

impl RenderSurface for InMemorySurface {
    fn canvas(&self) -> Option<Canvas> {
        self.canvas
    }

    fn paint(&mut self, stamp: FrameStamp, frame: &FrameRGBA) -> RevealResult<()> {
        self.frames.push((stamp, frame.clone()));
        self.shown = Some(frame.clone());
        Ok(())
    }

    fn clear(&mut self, run: RunId) -> RevealResult<()> {
        self.clears.push(run);
        self.shown = self.canvas.map(FrameRGBA::transparent);
        Ok(())
    }
}

/// Writes each painted frame as `frame_NNNNN.png` into a directory.
#[derive(Debug)]
pub struct PngSequenceSurface {
    dir: PathBuf,
    canvas: Canvas,
    written: u64,
}

impl PngSequenceSurface {
    /// Create a surface writing `canvas`-sized PNGs into `dir` (created on first use).
    pub fn new(dir: impl Into<PathBuf>, canvas: Canvas) -> Self {
        Self {
            dir: dir.into(),
            canvas,
            written: 0,
        }
    }

    /// Number of PNG files written since the last clear.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl RenderSurface for PngSequenceSurface {
    fn canvas(&self) -> Option<Canvas> {
        Some(self.canvas)
    }

    fn paint(&mut self, stamp: FrameStamp, frame: &FrameRGBA) -> RevealResult<()> {
        if frame.canvas() != self.canvas {
            return Err(RevealError::render(format!(
                "frame is {}x{}, surface is {}x{}",
                frame.width, frame.height, self.canvas.width, self.canvas.height
            )));
        }
        let path = self.dir.join(format!("frame_{:05}.png", stamp.frame.0));
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        self.written += 1;
        Ok(())
    }

    /// Creates the directory and removes `frame_*.png` files left by an earlier run.
    fn clear(&mut self, run: RunId) -> RevealResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("list output dir '{}'", self.dir.display()))?;
        let mut removed = 0usize;
        for entry in entries {
            let path = entry
                .with_context(|| format!("list output dir '{}'", self.dir.display()))?
                .path();
            if !is_sequence_frame(&path) {
                continue;
            }
            std::fs::remove_file(&path)
                .with_context(|| format!("remove stale frame '{}'", path.display()))?;
            removed += 1;
        }
        if removed > 0 {
            tracing::debug!(run = run.0, removed, "removed stale frames");
        }
        self.written = 0;
        Ok(())
    }
}

fn is_sequence_frame(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("frame_") && n.ends_with(".png"))
}
