//! Rectangle model and pair enclosure.
//!
//! All coordinates are integer pixels in image space: `x` grows to the right,
//! `y` grows downward, so a smaller `top` is physically higher in the scene.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle of a single contour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Build a rectangle from trusted values. Width and height must be >= 0.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        debug_assert!(width >= 0 && height >= 0);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Edges of the smallest axis-aligned rectangle containing two contours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingPair {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl BoundingPair {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Horizontal midpoint in pixels, without integer truncation.
    pub fn center_x(&self) -> f64 {
        (f64::from(self.left) + f64::from(self.right)) / 2.0
    }

    /// True when `rect` lies entirely inside this enclosure.
    pub fn contains(&self, rect: &Rect) -> bool {
        rect.left() >= self.left
            && rect.right() <= self.right
            && rect.top() >= self.top
            && rect.bottom() <= self.bottom
    }
}

/// Enclose two rectangles.
pub fn enclose(r1: &Rect, r2: &Rect) -> BoundingPair {
    BoundingPair {
        top: r1.top().min(r2.top()),
        bottom: r1.bottom().max(r2.bottom()),
        left: r1.left().min(r2.left()),
        right: r1.right().max(r2.right()),
    }
}
