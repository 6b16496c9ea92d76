//! Contour sources.
//!
//! This module stands in for the camera plus threshold/filter pipeline that
//! feeds the target selector. A source is chosen from a URL:
//! - `stub://<name>`: deterministic synthetic scene (testing, demos)
//! - local path: JSON-lines replay of recorded frames
//! - in-memory frames (tests)
//!
//! Sources hand out one `ContourFrame` per call and keep nothing once it has
//! been returned. `next_frame` yields `None` when a finite source runs dry.

mod replay;
mod synthetic;

use anyhow::{anyhow, Result};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::frame::ContourFrame;

pub use replay::ReplaySource;
pub use synthetic::SyntheticSource;

pub const DEFAULT_SOURCE_URL: &str = "stub://field";
pub const DEFAULT_TARGET_FPS: u32 = 30;

/// Configuration for a contour source.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// `stub://<name>` or a local file path.
    pub url: String,
    /// Frames per second to pace delivery at. Zero delivers as fast as asked.
    pub target_fps: u32,
    /// Seed for synthetic clutter.
    pub seed: u64,
    /// Frame size the synthetic scene is drawn into.
    pub width: u32,
    pub height: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            seed: 0,
            width: crate::IMG_WIDTH,
            height: crate::IMG_HEIGHT,
        }
    }
}

/// Statistics for a contour source.
#[derive(Clone, Debug)]
pub struct SourceStats {
    pub frames_delivered: u64,
    pub url: String,
}

pub struct ContourSource {
    backend: SourceBackend,
    pacer: Pacer,
    url: String,
    frames_delivered: u64,
}

enum SourceBackend {
    Synthetic(SyntheticSource),
    Replay(ReplaySource),
    Memory(VecDeque<ContourFrame>),
}

impl ContourSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let url = config.url.trim().to_string();
        if url.is_empty() {
            return Err(anyhow!("source url must not be empty"));
        }
        let backend = if url.starts_with("stub://") {
            SourceBackend::Synthetic(SyntheticSource::new(&config)?)
        } else if url.contains("://") {
            return Err(anyhow!(
                "unsupported source '{}' (expected stub://<name> or a local file path)",
                url
            ));
        } else {
            SourceBackend::Replay(ReplaySource::open(&url)?)
        };
        Ok(Self {
            backend,
            pacer: Pacer::new(config.target_fps),
            url,
            frames_delivered: 0,
        })
    }

    /// Unpaced source replaying the given frames once.
    pub fn from_frames(frames: impl IntoIterator<Item = ContourFrame>) -> Self {
        Self {
            backend: SourceBackend::Memory(frames.into_iter().collect()),
            pacer: Pacer::new(0),
            url: "memory://frames".to_string(),
            frames_delivered: 0,
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        match &self.backend {
            SourceBackend::Synthetic(source) => log::info!(
                "ContourSource: connected to synthetic scene '{}' ({})",
                source.name(),
                self.url
            ),
            SourceBackend::Replay(_) => log::info!("ContourSource: replaying {}", self.url),
            SourceBackend::Memory(frames) => {
                log::debug!("ContourSource: {} in-memory frames", frames.len())
            }
        }
        Ok(())
    }

    /// Block until the next frame is due and return it.
    pub fn next_frame(&mut self) -> Result<Option<ContourFrame>> {
        self.pacer.wait();
        let frame = match &mut self.backend {
            SourceBackend::Synthetic(source) => Some(source.next_frame()),
            SourceBackend::Replay(source) => source.next_frame()?,
            SourceBackend::Memory(frames) => frames.pop_front(),
        };
        if frame.is_some() {
            self.frames_delivered += 1;
        }
        Ok(frame)
    }

    /// False once a finite source has failed; it is not read again.
    pub fn is_healthy(&self) -> bool {
        match &self.backend {
            SourceBackend::Synthetic(_) | SourceBackend::Memory(_) => true,
            SourceBackend::Replay(source) => source.is_healthy(),
        }
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            frames_delivered: self.frames_delivered,
            url: self.url.clone(),
        }
    }
}

/// Spaces frames `1 / fps` apart.
struct Pacer {
    interval: Option<Duration>,
    next_due: Option<Instant>,
}

impl Pacer {
    fn new(fps: u32) -> Self {
        Self {
            interval: (fps > 0).then(|| Duration::from_secs(1) / fps),
            next_due: None,
        }
    }

    fn wait(&mut self) {
        let Some(interval) = self.interval else {
            return;
        };
        let now = Instant::now();
        if let Some(due) = self.next_due {
            if due > now {
                std::thread::sleep(due - now);
            }
        }
        // Late frames do not accumulate debt.
        self.next_due = Some(Instant::now().max(self.next_due.unwrap_or(now)) + interval);
    }
}
