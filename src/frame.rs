//! Per-frame contour data handed over by the upstream pipeline.
//!
//! A contour is the closed point list produced by thresholding and blob
//! filtering. For target selection it is reduced to its bounding `Rect`.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Largest coordinate magnitude accepted from recorded or external frames.
/// Keeps every extent and edge sum well inside `i32`.
pub const MAX_COORD: i32 = 1 << 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Outline of `rect` as its four corner pixels. A rect with a zero
    /// extent comes back one pixel wide on that axis.
    pub fn from_rect(rect: &Rect) -> Self {
        let right = rect.x + (rect.width - 1).max(0);
        let bottom = rect.y + (rect.height - 1).max(0);
        Self::new(vec![
            Point::new(rect.x, rect.y),
            Point::new(right, rect.y),
            Point::new(right, bottom),
            Point::new(rect.x, bottom),
        ])
    }

    pub fn bounding_rect(&self) -> Rect {
        bounding_rect(&self.points)
    }
}

/// Filtered contours of a single camera frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContourFrame {
    pub contours: Vec<Contour>,
}

impl ContourFrame {
    pub fn new(contours: Vec<Contour>) -> Self {
        Self { contours }
    }

    pub fn from_rects(rects: &[Rect]) -> Self {
        Self::new(rects.iter().map(Contour::from_rect).collect())
    }

    /// Candidate rectangles in contour order.
    pub fn rects(&self) -> Vec<Rect> {
        self.contours.iter().map(Contour::bounding_rect).collect()
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Reject frames with any point outside `-MAX_COORD..=MAX_COORD`.
    pub fn check_bounds(&self) -> Result<()> {
        let range = -MAX_COORD..=MAX_COORD;
        for (index, contour) in self.contours.iter().enumerate() {
            let outside = contour
                .points
                .iter()
                .find(|p| !range.contains(&p.x) || !range.contains(&p.y));
            if let Some(p) = outside {
                return Err(anyhow!(
                    "contour {} has point ({}, {}) outside +/-{} pixels",
                    index,
                    p.x,
                    p.y,
                    MAX_COORD
                ));
            }
        }
        Ok(())
    }
}

/// Upright bounding rectangle of a pixel point set.
///
/// Points are pixel centers, so a point set spanning columns `a..=b` is
/// `b - a + 1` pixels wide. An empty set yields the zero rectangle. Extents
/// saturate at `i32::MAX`; frames from outside the process are bounded by
/// [`ContourFrame::check_bounds`] first.
pub fn bounding_rect(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::default();
    };
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    let width = max_x.saturating_sub(min_x).saturating_add(1);
    let height = max_y.saturating_sub(min_y).saturating_add(1);
    Rect::new(min_x, min_y, width, height)
}
