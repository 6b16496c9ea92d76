//! Shape heuristics for a candidate stripe pair.
//!
//! The target is two tall vertical stripes of known relative geometry. Each
//! heuristic measures one ratio whose ideal value is 1 and maps it to a score
//! in `[0, 100]`. A false positive has to satisfy all six at once.

mod breakdown;
mod heuristics;
mod kernel;

pub use breakdown::ScoreBreakdown;
pub use heuristics::{
    bounding_ratio_score, contour_width_score, height_ratio_score, left_spacing_score,
    top_edge_score, width_ratio_score,
};
pub use kernel::{ratio_to_score, MAX_SCORE};
