use crate::assets::pixels::PixelBuffer;
use crate::foundation::core::Canvas;
use crate::foundation::error::{RevealError, RevealResult};

/// Control image mapped onto a subject-sized grid by nearest-neighbour scaling.
///
/// The control buffer stays at its native size; only coordinates are remapped:
/// `cx = floor(x * control_w / subject_w)`, same for `y`.
#[derive(Clone, Debug)]
pub struct ControlMap {
    control: PixelBuffer,
    target: Canvas,
}

impl ControlMap {
    /// Map `control` onto `target`. An empty control image cannot be sampled.
    pub fn new(control: PixelBuffer, target: Canvas) -> RevealResult<Self> {
        if control.canvas().is_empty() {
            return Err(RevealError::decode(format!(
                "control image has no readable pixels ({}x{})",
                control.width(),
                control.height()
            )));
        }
        Ok(Self { control, target })
    }

    /// Subject-space size the map is sampled in.
    pub fn target(&self) -> Canvas {
        self.target
    }

    /// Control coordinate for subject pixel `(x, y)`.
    pub fn map_coord(&self, x: u32, y: u32) -> (u32, u32) {
        if self.target.is_empty() {
            return (0, 0);
        }
        let cx = u64::from(x) * u64::from(self.control.width()) / u64::from(self.target.width);
        let cy = u64::from(y) * u64::from(self.control.height()) / u64::from(self.target.height);
        (cx as u32, cy as u32)
    }

    /// Red channel of the mapped control pixel.
    pub fn red_at(&self, x: u32, y: u32) -> u8 {
        let (cx, cy) = self.map_coord(x, y);
        self.control.red(cx, cy)
    }

    /// Normalized reveal threshold `red / 255` for subject pixel `(x, y)`.
    pub fn threshold_at(&self, x: u32, y: u32) -> f64 {
        threshold_from_red(self.red_at(x, y))
    }
}

/// `red / 255`, so the threshold always lands in `[0, 1]`.
pub fn threshold_from_red(red: u8) -> f64 {
    f64::from(red) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_maps_identity() {
        let control = PixelBuffer::from_raw(2, 1, vec![10, 0, 0, 255, 20, 0, 0, 255]).unwrap();
        let map = ControlMap::new(control, Canvas::new(2, 1)).unwrap();
        assert_eq!(map.red_at(0, 0), 10);
        assert_eq!(map.red_at(1, 0), 20);
    }

    #[test]
    fn smaller_control_is_scaled_nearest_neighbour() {
        // 2x1 control stretched over a 4x2 subject.
        let control = PixelBuffer::from_raw(2, 1, vec![0, 0, 0, 255, 255, 0, 0, 255]).unwrap();
        let map = ControlMap::new(control, Canvas::new(4, 2)).unwrap();
        assert_eq!(map.map_coord(0, 0), (0, 0));
        assert_eq!(map.map_coord(1, 1), (0, 0));
        assert_eq!(map.map_coord(2, 0), (1, 0));
        assert_eq!(map.map_coord(3, 1), (1, 0));
        assert_eq!(map.threshold_at(3, 1), 1.0);
        assert_eq!(map.threshold_at(1, 0), 0.0);
    }

    #[test]
    fn empty_control_is_unreadable() {
        let control = PixelBuffer::from_raw(0, 0, vec![]).unwrap();
        assert!(ControlMap::new(control, Canvas::new(1, 1)).is_err());
    }
}
