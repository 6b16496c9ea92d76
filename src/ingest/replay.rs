//! JSON-lines replay of recorded contour frames.
//!
//! One frame per line, e.g.
//! `{"contours": [[{"x": 100, "y": 50}, {"x": 109, "y": 89}], ...]}`.
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{anyhow, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::frame::ContourFrame;

pub struct ReplaySource {
    lines: Box<dyn BufRead + Send>,
    line_no: u64,
    failed: bool,
}

impl ReplaySource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| anyhow!("failed to open replay file {}: {}", path.display(), e))?;
        Ok(Self::from_reader(BufReader::new(file)))
    }

    pub fn from_reader(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            lines: Box::new(reader),
            line_no: 0,
            failed: false,
        }
    }

    /// Next recorded frame, `None` at end of file.
    pub fn next_frame(&mut self) -> Result<Option<ContourFrame>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.lines.read_line(&mut line).map_err(|e| {
                self.failed = true;
                anyhow!("replay read failed after line {}: {}", self.line_no, e)
            })?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let frame: ContourFrame = serde_json::from_str(trimmed).map_err(|e| {
                self.failed = true;
                anyhow!("invalid replay frame on line {}: {}", self.line_no, e)
            })?;
            frame.check_bounds().map_err(|e| {
                self.failed = true;
                anyhow!("invalid replay frame on line {}: {}", self.line_no, e)
            })?;
            return Ok(Some(frame));
        }
    }

    pub fn is_healthy(&self) -> bool {
        !self.failed
    }
}
