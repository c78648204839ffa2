/// Axis-aligned rectangle in arena coordinates (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap on both axes; touching edges do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Overlap of the vertical extents only.
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.y + self.h > other.y && other.y + other.h > self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(9.5, 9.5, 1.0, 1.0)));
    }

    #[test]
    fn vertical_overlap_ignores_x() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(500.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps_vertically(&b));
        assert!(!a.intersects(&b));
    }
}
