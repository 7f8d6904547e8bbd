use serde::{Deserialize, Serialize};

/// An axis-aligned box. Z is the extrusion axis; X and Y match sketch units.
///
/// Constructed through [`AxisBox::new`], which swaps any inverted bounds so
/// that `min <= max` holds on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl AxisBox {
    /// Create a box, swapping inverted bounds.
    pub fn new(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        let ordered = |a: f64, b: f64| if b < a { (b, a) } else { (a, b) };
        let (min_x, max_x) = ordered(min_x, max_x);
        let (min_y, max_y) = ordered(min_y, max_y);
        let (min_z, max_z) = ordered(min_z, max_z);
        Self {
            min: [min_x, min_y, min_z],
            max: [max_x, max_y, max_z],
        }
    }

    /// Box spanning two opposite corners in any order.
    pub fn from_corners(a: [f64; 3], b: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2], b[0], b[1], b[2])
    }

    /// Extent along X, Y and Z.
    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn volume(&self) -> f64 {
        let [x, y, z] = self.size();
        x * y * z
    }

    /// True when every extent exceeds `eps`.
    pub fn is_valid(&self, eps: f64) -> bool {
        self.size().iter().all(|&s| s > eps)
    }

    /// Open-interval overlap test: boxes that only share a face do not intersect.
    pub fn intersects(&self, other: &AxisBox) -> bool {
        (0..3).all(|axis| other.max[axis] > self.min[axis] && other.min[axis] < self.max[axis])
    }

    /// The overlapping region, or `None` when the boxes are disjoint or the
    /// overlap is no thicker than `eps` on some axis.
    pub fn intersection(&self, other: &AxisBox, eps: f64) -> Option<AxisBox> {
        let lo = |axis: usize| self.min[axis].max(other.min[axis]);
        let hi = |axis: usize| self.max[axis].min(other.max[axis]);
        if (0..3).any(|axis| hi(axis) - lo(axis) <= eps) {
            return None;
        }
        Some(AxisBox {
            min: [lo(0), lo(1), lo(2)],
            max: [hi(0), hi(1), hi(2)],
        })
    }
}
