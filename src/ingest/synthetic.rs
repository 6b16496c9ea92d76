//! Synthetic field scene (`stub://`).
//!
//! The scene loops over a fixed cycle. The two-stripe target approaches the
//! camera from far to near while drifting across the image, with a target-free
//! stretch at the end of every cycle. Each frame also carries a few
//! seeded-random clutter blobs, shuffled in among the stripes.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::SourceConfig;
use crate::frame::{Contour, ContourFrame, MAX_COORD};
use crate::geometry::Rect;

/// Frames per approach cycle.
const CYCLE_FRAMES: u64 = 120;
/// Trailing frames of each cycle with the target out of view.
const BLANK_FRAMES: u64 = 12;
const MIN_STRIPE_WIDTH: i32 = 2;
const MAX_STRIPE_WIDTH: i32 = 8;
const MAX_CLUTTER: usize = 3;

pub struct SyntheticSource {
    name: String,
    width: i32,
    height: i32,
    frame_count: u64,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            name: config.url.trim_start_matches("stub://").to_string(),
            width: scene_extent("width", config.width)?,
            height: scene_extent("height", config.height)?,
            frame_count: 0,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn next_frame(&mut self) -> ContourFrame {
        let phase = self.frame_count % CYCLE_FRAMES;
        self.frame_count += 1;

        let mut rects = Vec::with_capacity(2 + MAX_CLUTTER);
        if phase < CYCLE_FRAMES - BLANK_FRAMES {
            rects.extend(self.target_stripes(phase));
        }
        let clutter = self.rng.gen_range(0..=MAX_CLUTTER);
        for _ in 0..clutter {
            rects.push(self.clutter_blob());
        }
        rects.shuffle(&mut self.rng);
        ContourFrame::new(rects.iter().map(Contour::from_rect).collect())
    }

    /// Stripes of the target `phase` frames into the current cycle.
    ///
    /// A stripe of width `s` is `8s` tall, the pair spans `4s`, and the left
    /// edges sit `3s` apart.
    fn target_stripes(&mut self, phase: u64) -> [Rect; 2] {
        let visible = (CYCLE_FRAMES - BLANK_FRAMES) as f64;
        let progress = phase as f64 / visible;
        let span = f64::from(MAX_STRIPE_WIDTH - MIN_STRIPE_WIDTH);
        let stripe = MIN_STRIPE_WIDTH + (progress * span).round() as i32;
        let (pair_width, pair_height) = (4 * stripe, 8 * stripe);

        let travel = (self.width - pair_width).max(0);
        let left = (progress * f64::from(travel)).round() as i32;
        let top = ((self.height - pair_height) / 2).max(0);
        let jitter = self.rng.gen_range(-1..=1);

        [
            Rect::new(left, top, stripe, pair_height),
            Rect::new(left + 3 * stripe, (top + jitter).max(0), stripe, pair_height),
        ]
    }

    fn clutter_blob(&mut self) -> Rect {
        let w = self.rng.gen_range(3..=14).min(self.width);
        let h = self.rng.gen_range(3..=14).min(self.height);
        let x = self.rng.gen_range(0..=(self.width - w));
        let y = self.rng.gen_range(0..=(self.height - h));
        Rect::new(x, y, w, h)
    }
}

fn scene_extent(axis: &str, pixels: u32) -> Result<i32> {
    i32::try_from(pixels.max(1))
        .ok()
        .filter(|extent| *extent <= MAX_COORD)
        .ok_or_else(|| anyhow!("synthetic scene {} {} exceeds {} pixels", axis, pixels, MAX_COORD))
}
