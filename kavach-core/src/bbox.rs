//! Axis-aligned bounding boxes in image pixel space

use serde::{Deserialize, Serialize};

/// An axis-aligned box described by two corner points.
///
/// Detection models are not required to emit the corners in any
/// particular order; call [`BoundingBox::normalized`] before doing
/// geometry that assumes `x1 <= x2` and `y1 <= y2`. The origin is the
/// top-left of the image, with y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Return a copy with the corners ordered so that `(x1, y1)` is the
    /// top-left and `(x2, y2)` the bottom-right corner.
    ///
    /// Idempotent; zero-width or zero-height boxes pass through
    /// unchanged.
    pub fn normalized(&self) -> Self {
        Self {
            x1: self.x1.min(self.x2),
            y1: self.y1.min(self.y2),
            x2: self.x1.max(self.x2),
            y2: self.y1.max(self.y2),
        }
    }

    /// Width of the normalized box.
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).abs()
    }

    /// Height of the normalized box.
    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).abs()
    }
}

impl From<(f32, f32, f32, f32)> for BoundingBox {
    fn from((x1, y1, x2, y2): (f32, f32, f32, f32)) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}
