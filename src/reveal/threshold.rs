use crate::assets::pixels::PixelBuffer;
use crate::eval::clock::FrameTime;
use crate::render::frame::FrameRGBA;
use crate::reveal::schedule::RevealSchedule;
use crate::reveal::strategy::{RevealMode, RevealStrategy};

/// Default fade-in band, in normalized progress.
pub const DEFAULT_FADE_WINDOW: f64 = 0.05;

/// Threshold-scan reveal with a linear fade band.
///
/// Every frame is re-derived from the subject: a pixel with threshold `t` is hidden while
/// `p < t`, fades in linearly over `[t, t + fade_window)`, and shows its original alpha after.
#[derive(Debug)]
pub struct ThresholdFade {
    subject: PixelBuffer,
    schedule: RevealSchedule,
    fade_window: f64,
}

impl ThresholdFade {
    /// Build from a subject and its threshold-scan schedule.
    pub fn new(subject: PixelBuffer, schedule: RevealSchedule, fade_window: f64) -> Self {
        Self {
            subject,
            schedule,
            fade_window,
        }
    }

    /// The schedule this strategy reveals.
    pub fn schedule(&self) -> &RevealSchedule {
        &self.schedule
    }
}

/// Alpha of a pixel with original alpha `alpha0` and threshold `threshold` at progress `p`.
pub fn faded_alpha(alpha0: u8, threshold: f64, p: f64, fade_window: f64) -> u8 {
    if p < threshold {
        0
    } else if p < threshold + fade_window {
        let fade = (p - threshold) / fade_window;
        (f64::from(alpha0) * fade).floor() as u8
    } else {
        alpha0
    }
}

impl RevealStrategy for ThresholdFade {
    fn mode(&self) -> RevealMode {
        RevealMode::ThresholdFade
    }

    fn subject(&self) -> &PixelBuffer {
        &self.subject
    }

    fn render_into(&mut self, at: FrameTime, out: &mut FrameRGBA) {
        out.copy_from(&self.subject);
        if at.progress.is_complete() {
            return;
        }
        let p = at.progress.get();
        for e in self.schedule.entries() {
            let a = self.subject.offset(e.x, e.y) + 3;
            out.data[a] = faded_alpha(out.data[a], e.threshold, p, self.fade_window);
        }
    }
}
