//! Range and bearing from the selected pair's pixel extent.
//!
//! The target's physical height over its pixel height equals the full view
//! height in inches over the image height in pixels. Half the view height and
//! half the vertical field of view form a right triangle whose adjacent side is
//! the distance to the target.

use serde::{Deserialize, Serialize};

use crate::geometry::BoundingPair;
use crate::latch::FrameResult;

/// Image width in pixels.
pub const IMG_WIDTH: u32 = 320;
/// Image height in pixels.
pub const IMG_HEIGHT: u32 = 240;
/// Physical height of the target in inches.
pub const TARGET_HEIGHT: f64 = 15.3;
/// Vertical field of view in degrees (Microsoft LifeCam).
pub const CAMERA_FOV_VERT: f64 = 41.0;

/// Camera and target geometry used to turn pixels into inches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraModel {
    pub image_width: u32,
    pub image_height: u32,
    pub fov_vertical_deg: f64,
    pub target_height_in: f64,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self {
            image_width: IMG_WIDTH,
            image_height: IMG_HEIGHT,
            fov_vertical_deg: CAMERA_FOV_VERT,
            target_height_in: TARGET_HEIGHT,
        }
    }
}

impl CameraModel {
    /// Full image height, in inches, at the target's distance.
    pub fn view_height_in(&self, target_pixel_height: i32) -> Option<f64> {
        if target_pixel_height <= 0 {
            return None;
        }
        Some(self.target_height_in * f64::from(self.image_height) / f64::from(target_pixel_height))
    }

    /// Distance in inches for a target spanning `target_pixel_height` rows.
    pub fn distance_in(&self, target_pixel_height: i32) -> Option<f64> {
        let view_height = self.view_height_in(target_pixel_height)?;
        let half_fov = self.fov_vertical_deg.to_radians() / 2.0;
        Some(0.5 * view_height / half_fov.tan())
    }

    /// Center and distance of an enclosed pair. `None` for zero vertical extent.
    pub fn solve(&self, bounding: &BoundingPair) -> Option<FrameResult> {
        let distance = self.distance_in(bounding.height())?;
        Some(FrameResult {
            center_x: bounding.center_x(),
            distance,
        })
    }
}
