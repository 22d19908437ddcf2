use serde::Serialize;

/// Axis-aligned pixel rectangle on a canvas.
///
/// Bounds are half-open: the covered pixels are `[x_min, x_max) x [y_min, y_max)`,
/// so two rectangles sharing only an edge do not overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Placement {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl Placement {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x_min: x,
            y_min: y,
            x_max: x + w,
            y_max: y + h,
        }
    }

    pub fn width(&self) -> u32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> u32 {
        self.y_max - self.y_min
    }

    pub fn is_disjoint(&self, other: &Placement) -> bool {
        self.x_max <= other.x_min
            || other.x_max <= self.x_min
            || self.y_max <= other.y_min
            || other.y_max <= self.y_min
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x_max <= width && self.y_max <= height
    }
}
