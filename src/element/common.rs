use serde::{Deserialize, Serialize};

// Logical canvas every slide is laid out on
pub const CANVAS_WIDTH: f64 = 960.0;
pub const CANVAS_HEIGHT: f64 = 540.0;

/// Smallest width/height the resize controls allow
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// Pixel coordinates relative to the top-left corner of the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `delta`
    pub fn offset(self, delta: Position) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp to the range the resize controls allow.
    ///
    /// This is an editing policy; sizes loaded from a document are kept as is.
    pub fn clamped(self) -> Self {
        Self {
            width: clamp_dimension(self.width, CANVAS_WIDTH),
            height: clamp_dimension(self.height, CANVAS_HEIGHT),
        }
    }
}

fn clamp_dimension(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return MIN_ELEMENT_SIZE;
    }
    value.clamp(MIN_ELEMENT_SIZE, max)
}
