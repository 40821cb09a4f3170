use std::time::Duration;

use crate::assets::pixels::PixelBuffer;
use crate::eval::clock::FrameTime;
use crate::render::frame::FrameRGBA;
use crate::reveal::schedule::RevealSchedule;
use crate::reveal::strategy::{RevealMode, RevealStrategy};

/// Cohort scatter reveal.
///
/// Pixels are revealed (alpha restored in full) once `elapsed >= (red / 255) * duration`. The
/// schedule is ordered by cohort, so a single cursor walks it forward; revealed pixels are never
/// hidden again, even if the host hands in an earlier timestamp.
#[derive(Debug)]
pub struct ScatterDelay {
    subject: PixelBuffer,
    schedule: RevealSchedule,
    duration: Duration,
    working: Vec<u8>,
    cursor: usize,
}

impl ScatterDelay {
    /// Build from a subject and its grouped schedule.
    pub fn new(subject: PixelBuffer, schedule: RevealSchedule, duration: Duration) -> Self {
        let mut working = subject.as_bytes().to_vec();
        for px in working.chunks_exact_mut(4) {
            px[3] = 0;
        }
        Self {
            subject,
            schedule,
            duration,
            working,
            cursor: 0,
        }
    }

    /// The schedule this strategy reveals.
    pub fn schedule(&self) -> &RevealSchedule {
        &self.schedule
    }

    /// Number of pixels revealed so far.
    pub fn revealed(&self) -> usize {
        self.cursor
    }

    fn advance(&mut self, elapsed: Duration) {
        let entries = self.schedule.entries();
        while let Some(e) = entries.get(self.cursor) {
            if elapsed < e.delay(self.duration) {
                break;
            }
            let a = self.subject.offset(e.x, e.y) + 3;
            self.working[a] = self.subject.as_bytes()[a];
            self.cursor += 1;
        }
    }
}

impl RevealStrategy for ScatterDelay {
    fn mode(&self) -> RevealMode {
        RevealMode::ScatterDelay
    }

    fn subject(&self) -> &PixelBuffer {
        &self.subject
    }

    fn render_into(&mut self, at: FrameTime, out: &mut FrameRGBA) {
        if at.progress.is_complete() {
            out.copy_from(&self.subject);
            return;
        }
        self.advance(at.elapsed);
        out.data.clear();
        out.data.extend_from_slice(&self.working);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Canvas, Rng64};
    use crate::reveal::control::ControlMap;

    fn strategy() -> ScatterDelay {
        // 3x1 subject, control reds 0 / 128 / 255.
        let subject =
            PixelBuffer::from_raw(3, 1, vec![1, 1, 1, 255, 2, 2, 2, 200, 3, 3, 3, 100]).unwrap();
        let control =
            PixelBuffer::from_raw(3, 1, vec![0, 0, 0, 255, 128, 0, 0, 255, 255, 0, 0, 255])
                .unwrap();
        let map = ControlMap::new(control, Canvas::new(3, 1)).unwrap();
        let schedule = RevealSchedule::scatter(&subject, &map, &mut Rng64::new(3));
        ScatterDelay::new(subject, schedule, Duration::from_millis(1000))
    }

    #[test]
    fn reveals_in_cohort_order() {
        let mut s = strategy();
        let mut out = FrameRGBA::transparent(Canvas::new(3, 1));
        let d = Duration::from_millis(1000);

        s.render_into(FrameTime::at(Duration::ZERO, d), &mut out);
        assert_eq!([out.alpha(0, 0), out.alpha(1, 0), out.alpha(2, 0)], [255, 0, 0]);

        s.render_into(FrameTime::at(Duration::from_millis(600), d), &mut out);
        assert_eq!([out.alpha(0, 0), out.alpha(1, 0), out.alpha(2, 0)], [255, 200, 0]);
        // Colour is carried even while hidden.
        assert_eq!(out.pixel(2, 0), [3, 3, 3, 0]);

        s.render_into(FrameTime::at(d, d), &mut out);
        assert_eq!(out.data, s.subject().as_bytes());
    }

    #[test]
    fn earlier_timestamps_never_hide_pixels() {
        let mut s = strategy();
        let mut out = FrameRGBA::transparent(Canvas::new(3, 1));
        let d = Duration::from_millis(1000);
        s.render_into(FrameTime::at(Duration::from_millis(900), d), &mut out);
        assert_eq!(s.revealed(), 2);
        s.render_into(FrameTime::at(Duration::from_millis(10), d), &mut out);
        assert_eq!(s.revealed(), 2);
        assert_eq!(out.alpha(1, 0), 200);
    }
}
