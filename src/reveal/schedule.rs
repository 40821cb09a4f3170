use std::time::Duration;

use crate::assets::pixels::PixelBuffer;
use crate::foundation::core::{Canvas, Rng64};
use crate::reveal::control::{ControlMap, threshold_from_red};

/// Number of reveal cohorts: one per 8-bit control red value.
pub const COHORT_COUNT: usize = 256;

/// One visible subject pixel and when it reveals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealEntry {
    /// Subject x coordinate.
    pub x: u32,
    /// Subject y coordinate.
    pub y: u32,
    /// Mapped control red value (the pixel's cohort).
    pub red: u8,
    /// `red / 255`.
    pub threshold: f64,
}

impl RevealEntry {
    /// Scatter-variant reveal delay: `(red / 255) * duration`.
    pub fn delay(&self, duration: Duration) -> Duration {
        duration.mul_f64(self.threshold)
    }
}

/// All reveal entries for one run. Built once, immutable afterwards.
///
/// Only pixels with subject alpha > 0 get an entry; fully transparent pixels never take part in
/// the reveal.
#[derive(Clone, Debug)]
pub struct RevealSchedule {
    canvas: Canvas,
    entries: Vec<RevealEntry>,
    // `cohort_starts[r]..cohort_starts[r + 1]` indexes cohort `r` when grouped.
    cohort_starts: Option<Vec<usize>>,
}

impl RevealSchedule {
    /// Raster-order schedule used by the threshold fade.
    #[tracing::instrument(skip_all, fields(w = subject.width(), h = subject.height()))]
    pub fn threshold_scan(subject: &PixelBuffer, control: &ControlMap) -> Self {
        let canvas = subject.canvas();
        let mut entries = Vec::new();
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                if let Some(e) = entry_for(subject, control, x, y) {
                    entries.push(e);
                }
            }
        }
        tracing::debug!(visible = entries.len(), "built threshold schedule");
        Self {
            canvas,
            entries,
            cohort_starts: None,
        }
    }

    /// Cohort-grouped schedule used by the scatter variant.
    ///
    /// Entries are ordered by red value; within a cohort the order is shuffled with `rng` so the
    /// reveal does not follow raster order.
    #[tracing::instrument(skip_all, fields(w = subject.width(), h = subject.height()))]
    pub fn scatter(subject: &PixelBuffer, control: &ControlMap, rng: &mut Rng64) -> Self {
        let canvas = subject.canvas();
        let mut buckets: Vec<Vec<RevealEntry>> = vec![Vec::new(); COHORT_COUNT];
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                if let Some(e) = entry_for(subject, control, x, y) {
                    buckets[usize::from(e.red)].push(e);
                }
            }
        }

        let total = buckets.iter().map(Vec::len).sum();
        let mut entries = Vec::with_capacity(total);
        let mut cohort_starts = Vec::with_capacity(COHORT_COUNT + 1);
        for bucket in &mut buckets {
            rng.shuffle(bucket);
            cohort_starts.push(entries.len());
            entries.append(bucket);
        }
        cohort_starts.push(entries.len());
        tracing::debug!(visible = entries.len(), "built scatter schedule");

        Self {
            canvas,
            entries,
            cohort_starts: Some(cohort_starts),
        }
    }

    /// Subject size the schedule was built for.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// All entries, in schedule order.
    pub fn entries(&self) -> &[RevealEntry] {
        &self.entries
    }

    /// Number of visible pixels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no subject pixel is visible.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sharing control red `red`. Empty for ungrouped schedules.
    pub fn cohort(&self, red: u8) -> &[RevealEntry] {
        match &self.cohort_starts {
            Some(starts) => {
                let r = usize::from(red);
                &self.entries[starts[r]..starts[r + 1]]
            }
            None => &[],
        }
    }

    /// Return `true` when entries are grouped into cohorts.
    pub fn is_grouped(&self) -> bool {
        self.cohort_starts.is_some()
    }
}

fn entry_for(subject: &PixelBuffer, control: &ControlMap, x: u32, y: u32) -> Option<RevealEntry> {
    if subject.alpha(x, y) == 0 {
        return None;
    }
    let red = control.red_at(x, y);
    Some(RevealEntry {
        x,
        y,
        red,
        threshold: threshold_from_red(red),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject_with_hole() -> PixelBuffer {
        // 3x1: visible, transparent, visible.
        PixelBuffer::from_raw(3, 1, vec![9, 9, 9, 255, 9, 9, 9, 0, 9, 9, 9, 128]).unwrap()
    }

    fn control(reds: &[u8]) -> ControlMap {
        let mut data = Vec::new();
        for &r in reds {
            data.extend_from_slice(&[r, 0, 0, 255]);
        }
        let buf = PixelBuffer::from_raw(reds.len() as u32, 1, data).unwrap();
        ControlMap::new(buf, Canvas::new(reds.len() as u32, 1)).unwrap()
    }

    #[test]
    fn transparent_pixels_get_no_entry() {
        let s = RevealSchedule::threshold_scan(&subject_with_hole(), &control(&[0, 10, 255]));
        assert_eq!(s.len(), 2);
        assert_eq!((s.entries()[0].x, s.entries()[1].x), (0, 2));
        assert_eq!(s.entries()[1].threshold, 1.0);
        assert!(!s.is_grouped());
        assert!(s.cohort(0).is_empty());
    }

    #[test]
    fn scatter_groups_by_red_in_ascending_order() {
        let s = RevealSchedule::scatter(
            &subject_with_hole(),
            &control(&[200, 10, 3]),
            &mut Rng64::new(1),
        );
        let reds: Vec<u8> = s.entries().iter().map(|e| e.red).collect();
        assert_eq!(reds, vec![3, 200]);
        assert_eq!(s.cohort(3).len(), 1);
        assert_eq!(s.cohort(200)[0].x, 0);
        assert!(s.cohort(10).is_empty());
    }

    #[test]
    fn delay_scales_with_duration() {
        let e = RevealEntry {
            x: 0,
            y: 0,
            red: 51,
            threshold: threshold_from_red(51),
        };
        assert_eq!(e.delay(Duration::from_millis(1000)), Duration::from_millis(200));
    }
}
