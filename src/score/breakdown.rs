use serde::Serialize;

use crate::geometry::Rect;

use super::heuristics::{
    bounding_ratio_score, contour_width_score, height_ratio_score, left_spacing_score,
    top_edge_score, width_ratio_score,
};

/// The six heuristic scores of one candidate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub bounding_ratio: f64,
    pub contour_width: f64,
    pub top_edge: f64,
    pub left_spacing: f64,
    pub width_ratio: f64,
    pub height_ratio: f64,
}

impl ScoreBreakdown {
    /// Score `(r1, r2)` in the given order.
    pub fn for_pair(r1: &Rect, r2: &Rect) -> Self {
        Self {
            bounding_ratio: bounding_ratio_score(r1, r2),
            contour_width: contour_width_score(r1, r2),
            top_edge: top_edge_score(r1, r2),
            left_spacing: left_spacing_score(r1, r2),
            width_ratio: width_ratio_score(r1, r2),
            height_ratio: height_ratio_score(r1, r2),
        }
    }

    pub fn components(&self) -> [(&'static str, f64); 6] {
        [
            ("bounding_ratio", self.bounding_ratio),
            ("contour_width", self.contour_width),
            ("top_edge", self.top_edge),
            ("left_spacing", self.left_spacing),
            ("width_ratio", self.width_ratio),
            ("height_ratio", self.height_ratio),
        ]
    }

    pub fn total(&self) -> f64 {
        self.components().iter().map(|(_, score)| score).sum()
    }

    /// Lowest single component.
    pub fn weakest(&self) -> f64 {
        self.components()
            .iter()
            .map(|(_, score)| *score)
            .fold(f64::INFINITY, f64::min)
    }
}
