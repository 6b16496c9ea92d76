//! Frame pipeline driver.
//!
//! For every frame the source emits: contours → rects → pair selector →
//! distance solver → latch. Frames without a usable target leave the latch
//! alone, so readers keep the last good result.

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::distance::CameraModel;
use crate::frame::ContourFrame;
use crate::geometry::Rect;
use crate::ingest::ContourSource;
use crate::latch::{FrameResult, ResultLatch};
use crate::select::{PairSelection, PairSelector};

/// Selected pair and the result solved from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSolution {
    pub selection: PairSelection,
    pub result: FrameResult,
}

/// Pure per-frame computation, independent of threads and sources.
#[derive(Clone, Debug, Default)]
pub struct FrameProcessor {
    selector: PairSelector,
    camera: CameraModel,
}

impl FrameProcessor {
    pub fn new(selector: PairSelector, camera: CameraModel) -> Self {
        Self { selector, camera }
    }

    pub fn selector(&self) -> &PairSelector {
        &self.selector
    }

    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    pub fn process_rects(&self, rects: &[Rect]) -> Option<TargetSolution> {
        let selection = self.selector.select(rects)?;
        let Some(result) = self.camera.solve(&selection.bounding) else {
            log::trace!(
                "pair ({}, {}) has no vertical extent; frame skipped",
                selection.first,
                selection.second
            );
            return None;
        };
        Some(TargetSolution { selection, result })
    }

    pub fn process_frame(&self, frame: &ContourFrame) -> Option<TargetSolution> {
        self.process_rects(&frame.rects())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    Published(TargetSolution),
    NoTarget,
    EndOfStream,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub published: u64,
}

pub struct VisionRunner {
    source: ContourSource,
    processor: FrameProcessor,
    latch: Arc<ResultLatch>,
    stats: RunStats,
}

impl VisionRunner {
    pub fn new(source: ContourSource, processor: FrameProcessor, latch: Arc<ResultLatch>) -> Self {
        Self {
            source,
            processor,
            latch,
            stats: RunStats::default(),
        }
    }

    pub fn latch(&self) -> Arc<ResultLatch> {
        self.latch.clone()
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Pull one frame from the source and publish its target, if any.
    pub fn step(&mut self) -> Result<FrameOutcome> {
        if !self.source.is_healthy() {
            return Err(anyhow!(
                "vision source {} failed earlier; not reading past it",
                self.source.stats().url
            ));
        }
        let Some(frame) = self.source.next_frame()? else {
            return Ok(FrameOutcome::EndOfStream);
        };
        self.stats.frames += 1;

        let Some(solution) = self.processor.process_frame(&frame) else {
            log::trace!(
                "frame {}: no target among {} contours",
                self.stats.frames,
                frame.len()
            );
            return Ok(FrameOutcome::NoTarget);
        };

        self.latch.publish(solution.result);
        self.stats.published += 1;
        log::debug!(
            "frame {}: target pair ({}, {}) score={:.1} center_x={:.1} distance={:.1}in",
            self.stats.frames,
            solution.selection.first,
            solution.selection.second,
            solution.selection.total(),
            solution.result.center_x,
            solution.result.distance
        );
        Ok(FrameOutcome::Published(solution))
    }

    /// Process frames until the stop flag is raised or the source ends.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<RunStats> {
        self.source.connect()?;
        while !stop.load(Ordering::SeqCst) {
            match self.step() {
                Ok(FrameOutcome::EndOfStream) => {
                    log::info!("vision source {} ended", self.source.stats().url);
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    log::error!("vision source failed: {}", err);
                    return Err(err);
                }
            }
        }
        Ok(self.stats)
    }

    /// Run on a dedicated thread.
    pub fn spawn(mut self) -> Result<VisionHandle> {
        let latch = self.latch.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_thread = shutdown.clone();
        let join = std::thread::Builder::new()
            .name("vision".to_string())
            .spawn(move || self.run(&shutdown_thread))?;
        Ok(VisionHandle {
            latch,
            shutdown,
            join: Some(join),
        })
    }
}

/// Owner's handle on a running vision thread.
#[derive(Debug)]
pub struct VisionHandle {
    latch: Arc<ResultLatch>,
    shutdown: Arc<AtomicBool>,
    join: Option<JoinHandle<Result<RunStats>>>,
}

impl VisionHandle {
    pub fn latch(&self) -> Arc<ResultLatch> {
        self.latch.clone()
    }

    pub fn snapshot(&self) -> FrameResult {
        self.latch.snapshot()
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, |join| join.is_finished())
    }

    /// Ask the thread to stop after the current frame and wait for it.
    pub fn stop(mut self) -> Result<RunStats> {
        self.shutdown.store(true, Ordering::SeqCst);
        self.wait()
    }

    /// Wait for the thread to finish on its own (finite sources).
    pub fn join(mut self) -> Result<RunStats> {
        self.wait()
    }

    fn wait(&mut self) -> Result<RunStats> {
        let join = self
            .join
            .take()
            .ok_or_else(|| anyhow!("vision thread already joined"))?;
        join.join()
            .map_err(|_| anyhow!("vision thread panicked"))?
    }
}

impl Drop for VisionHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::SelectorParams;

    const LEFT: Rect = Rect::new(100, 50, 10, 40);
    const RIGHT: Rect = Rect::new(130, 50, 10, 40);

    #[test]
    fn processor_solves_reference_pair() {
        let solution = FrameProcessor::default()
            .process_rects(&[LEFT, RIGHT])
            .expect("target");
        assert_eq!(solution.result.center_x, 120.0);
        assert!((solution.result.distance - 122.8).abs() < 0.5);
    }

    #[test]
    fn zero_height_pair_is_skipped() {
        // Clears a zero threshold but has no vertical extent to range on.
        let processor = FrameProcessor::new(
            PairSelector::new(SelectorParams {
                threshold: -1.0,
                ..SelectorParams::default()
            }),
            CameraModel::default(),
        );
        let flat = [Rect::new(0, 10, 4, 0), Rect::new(8, 10, 4, 0)];
        assert!(processor.selector().select(&flat).is_some());
        assert!(processor.process_rects(&flat).is_none());
    }

    #[test]
    fn step_publishes_only_targets() {
        let frames = vec![
            ContourFrame::from_rects(&[LEFT, RIGHT]),
            ContourFrame::from_rects(&[LEFT]),
        ];
        let latch = Arc::new(ResultLatch::new());
        let mut runner = VisionRunner::new(
            ContourSource::from_frames(frames),
            FrameProcessor::default(),
            latch.clone(),
        );

        assert!(matches!(runner.step().unwrap(), FrameOutcome::Published(_)));
        let first = latch.snapshot();
        assert!(first.has_target());

        assert_eq!(runner.step().unwrap(), FrameOutcome::NoTarget);
        assert_eq!(latch.snapshot(), first);

        assert_eq!(runner.step().unwrap(), FrameOutcome::EndOfStream);
        assert_eq!(
            runner.stats(),
            RunStats {
                frames: 2,
                published: 1
            }
        );
    }

    #[test]
    fn run_returns_at_end_of_stream() {
        let frames = (0..5).map(|_| ContourFrame::from_rects(&[LEFT, RIGHT]));
        let mut runner = VisionRunner::new(
            ContourSource::from_frames(frames),
            FrameProcessor::default(),
            Arc::new(ResultLatch::new()),
        );
        let stats = runner.run(&AtomicBool::new(false)).unwrap();
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.published, 5);
        assert_eq!(runner.latch().snapshot_stamped().sequence, 5);
    }

    #[test]
    fn failed_source_is_not_read_again() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, "{{\"contours\":[]}}").unwrap();
        let source = ContourSource::new(crate::ingest::SourceConfig {
            url: file.path().display().to_string(),
            target_fps: 0,
            ..Default::default()
        })
        .unwrap();
        let mut runner = VisionRunner::new(
            source,
            FrameProcessor::default(),
            Arc::new(ResultLatch::new()),
        );

        assert!(runner.step().unwrap_err().to_string().contains("line 1"));
        // The good line after the bad one stays unread.
        let err = runner.step().unwrap_err();
        assert!(err.to_string().contains("failed earlier"), "{}", err);
        assert_eq!(runner.stats(), RunStats::default());
    }

    #[test]
    fn raised_stop_flag_processes_nothing() {
        let mut runner = VisionRunner::new(
            ContourSource::from_frames(vec![ContourFrame::from_rects(&[LEFT, RIGHT])]),
            FrameProcessor::default(),
            Arc::new(ResultLatch::new()),
        );
        let stats = runner.run(&AtomicBool::new(true)).unwrap();
        assert_eq!(stats, RunStats::default());
    }
}
