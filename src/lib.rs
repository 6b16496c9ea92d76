//! Retroreflective target selection and ranging.
//!
//! Each camera frame arrives as a set of filtered contours. The crate picks the
//! pair of contours that best matches the two-stripe target, encloses them, and
//! turns the enclosure into a horizontal pixel center and a distance in inches.
//! The latest result is handed to control code through a mutex-guarded latch.
//!
//! # Module Structure
//!
//! - `geometry`: `Rect`, `BoundingPair`, `enclose`
//! - `score`: ratio-to-score kernel and the six shape heuristics
//! - `select`: best-pair selection over a frame's candidates
//! - `distance`: camera model, pixel height → inches
//! - `latch`: `ResultLatch` shared between the vision thread and readers
//! - `frame`: contours and their bounding rectangles
//! - `ingest`: contour sources (synthetic scene, recorded replay)
//! - `runner`: per-frame driver and the vision thread
//! - `config`: runtime settings from file and environment

pub mod config;
pub mod distance;
pub mod frame;
pub mod geometry;
pub mod ingest;
pub mod latch;
pub mod runner;
pub mod score;
pub mod select;

pub use config::TargetConfig;
pub use distance::{CameraModel, CAMERA_FOV_VERT, IMG_HEIGHT, IMG_WIDTH, TARGET_HEIGHT};
pub use frame::{bounding_rect, Contour, ContourFrame, Point, MAX_COORD};
pub use geometry::{enclose, BoundingPair, Rect};
pub use ingest::{ContourSource, SourceConfig, SourceStats};
pub use latch::{FrameResult, ResultLatch, StampedResult};
pub use runner::{FrameOutcome, FrameProcessor, RunStats, TargetSolution, VisionHandle, VisionRunner};
pub use score::{ratio_to_score, ScoreBreakdown};
pub use select::{select_pair, PairSelection, PairSelector, SelectorParams, SCORE_THRESHOLD};

/// Wire a source, processor and latch from a loaded configuration.
pub fn build_runner(config: &TargetConfig) -> anyhow::Result<VisionRunner> {
    let source = ContourSource::new(config.source.clone())?;
    let processor = FrameProcessor::new(PairSelector::new(config.scoring), config.camera);
    Ok(VisionRunner::new(
        source,
        processor,
        std::sync::Arc::new(ResultLatch::new()),
    ))
}
