use crate::geometry::{enclose, Rect};

use super::kernel::{ratio_to_score, score_ratio};

/// The box around both stripes should be about twice as tall as it is wide.
pub fn bounding_ratio_score(r1: &Rect, r2: &Rect) -> f64 {
    let bounding = enclose(r1, r2);
    score_ratio(
        f64::from(bounding.height()),
        2.0 * f64::from(bounding.width()),
    )
}

/// Either stripe should be about a quarter of the enclosing width.
pub fn contour_width_score(r1: &Rect, r2: &Rect) -> f64 {
    let bounding = enclose(r1, r2);
    score_ratio(4.0 * f64::from(r1.width), f64::from(bounding.width()))
}

/// Top edges should nearly coincide. The offset, scaled by the enclosing
/// height, is ideally 0, so it is shifted by 1 before scoring.
pub fn top_edge_score(r1: &Rect, r2: &Rect) -> f64 {
    let height = enclose(r1, r2).height();
    if height == 0 {
        return 0.0;
    }
    let offset = f64::from(r1.top() - r2.top()) / f64::from(height);
    ratio_to_score(1.0 + offset)
}

/// Left edges should be spaced about three quarters of the target width apart.
pub fn left_spacing_score(r1: &Rect, r2: &Rect) -> f64 {
    let bounding = enclose(r1, r2);
    let spacing = f64::from((r2.left() - r1.left()).abs());
    score_ratio(3.0 * spacing, 4.0 * f64::from(bounding.width()))
}

/// Both stripes should be equally wide.
pub fn width_ratio_score(r1: &Rect, r2: &Rect) -> f64 {
    score_ratio(f64::from(r1.width), f64::from(r2.width))
}

/// Both stripes should be equally tall.
pub fn height_ratio_score(r1: &Rect, r2: &Rect) -> f64 {
    score_ratio(f64::from(r1.height), f64::from(r2.height))
}
