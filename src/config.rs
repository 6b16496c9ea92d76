use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::distance::{CameraModel, CAMERA_FOV_VERT, IMG_HEIGHT, IMG_WIDTH, TARGET_HEIGHT};
use crate::frame::MAX_COORD;
use crate::ingest::{SourceConfig, DEFAULT_SOURCE_URL, DEFAULT_TARGET_FPS};
use crate::select::{SelectorParams, SCORE_THRESHOLD};

const DEFAULT_REPORT_INTERVAL_MS: u64 = 500;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TargetConfigFile {
    source: Option<SourceConfigFile>,
    camera: Option<CameraConfigFile>,
    target: Option<TargetGeometryFile>,
    scoring: Option<ScoringConfigFile>,
    report: Option<ReportConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SourceConfigFile {
    url: Option<String>,
    target_fps: Option<u32>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CameraConfigFile {
    image_width: Option<u32>,
    image_height: Option<u32>,
    fov_vertical_deg: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TargetGeometryFile {
    height_in: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ScoringConfigFile {
    threshold: Option<f64>,
    min_component_score: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ReportConfigFile {
    interval_ms: Option<u64>,
}

/// Runtime settings for the vision service.
///
/// Every value defaults to the built-in camera/target constants; a config file
/// (`TARGET_VISION_CONFIG`, TOML or JSON) and environment variables can
/// override them for another camera or target.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub source: SourceConfig,
    pub camera: CameraModel,
    pub scoring: SelectorParams,
    pub report_interval: Duration,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::from_file(TargetConfigFile::default())
    }
}

impl TargetConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("TARGET_VISION_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit file, ignoring the environment.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut cfg = Self::from_file(read_config_file(path)?);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: TargetConfigFile) -> Self {
        let source_file = file.source.unwrap_or_default();
        let camera_file = file.camera.unwrap_or_default();
        let scoring_file = file.scoring.unwrap_or_default();

        let camera = CameraModel {
            image_width: camera_file.image_width.unwrap_or(IMG_WIDTH),
            image_height: camera_file.image_height.unwrap_or(IMG_HEIGHT),
            fov_vertical_deg: camera_file.fov_vertical_deg.unwrap_or(CAMERA_FOV_VERT),
            target_height_in: file
                .target
                .and_then(|target| target.height_in)
                .unwrap_or(TARGET_HEIGHT),
        };
        let source = SourceConfig {
            url: source_file
                .url
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            target_fps: source_file.target_fps.unwrap_or(DEFAULT_TARGET_FPS),
            seed: source_file.seed.unwrap_or(0),
            width: camera.image_width,
            height: camera.image_height,
        };
        let scoring = SelectorParams {
            threshold: scoring_file.threshold.unwrap_or(SCORE_THRESHOLD),
            min_component_score: scoring_file.min_component_score.unwrap_or(0.0),
        };
        let report_interval = Duration::from_millis(
            file.report
                .and_then(|report| report.interval_ms)
                .unwrap_or(DEFAULT_REPORT_INTERVAL_MS),
        );
        Self {
            source,
            camera,
            scoring,
            report_interval,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("TARGET_VISION_SOURCE") {
            if !url.trim().is_empty() {
                self.source.url = url;
            }
        }
        if let Some(fps) = parse_env::<u32>("TARGET_VISION_FPS", "an integer frame rate")? {
            self.source.target_fps = fps;
        }
        if let Some(threshold) =
            parse_env::<f64>("TARGET_VISION_SCORE_THRESHOLD", "a number")?
        {
            self.scoring.threshold = threshold;
        }
        if let Some(floor) = parse_env::<f64>("TARGET_VISION_MIN_COMPONENT_SCORE", "a number")? {
            self.scoring.min_component_score = floor;
        }
        if let Some(ms) = parse_env::<u64>("TARGET_VISION_REPORT_MS", "an integer millisecond count")? {
            self.report_interval = Duration::from_millis(ms);
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if self.camera.image_width == 0 || self.camera.image_height == 0 {
            return Err(anyhow!("camera image size must be non-zero"));
        }
        let max_extent = MAX_COORD as u32;
        if self.camera.image_width > max_extent || self.camera.image_height > max_extent {
            return Err(anyhow!(
                "camera image size {}x{} exceeds {} pixels",
                self.camera.image_width,
                self.camera.image_height,
                max_extent
            ));
        }
        if !(self.camera.fov_vertical_deg > 0.0 && self.camera.fov_vertical_deg < 180.0) {
            return Err(anyhow!(
                "camera vertical fov must be between 0 and 180 degrees (got {})",
                self.camera.fov_vertical_deg
            ));
        }
        if !(self.camera.target_height_in.is_finite() && self.camera.target_height_in > 0.0) {
            return Err(anyhow!("target height must be a positive number of inches"));
        }
        if !(self.scoring.threshold.is_finite() && self.scoring.threshold >= 0.0) {
            return Err(anyhow!("score threshold must be a non-negative number"));
        }
        if !(0.0..=crate::score::MAX_SCORE).contains(&self.scoring.min_component_score) {
            return Err(anyhow!("min component score must be within 0..=100"));
        }
        if self.report_interval.is_zero() {
            return Err(anyhow!("report interval must be greater than zero"));
        }
        self.source.url = self.source.url.trim().to_string();
        self.source.width = self.camera.image_width;
        self.source.height = self.camera.image_height;
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, expected: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("{} must be {}", key, expected)),
        _ => Ok(None),
    }
}

fn read_config_file(path: &Path) -> Result<TargetConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_constants() {
        let cfg = TargetConfig::default();
        assert_eq!(cfg.camera, CameraModel::default());
        assert_eq!(cfg.scoring, SelectorParams::default());
        assert_eq!(cfg.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(cfg.source.width, IMG_WIDTH);
        assert_eq!(cfg.report_interval, Duration::from_millis(500));
    }

    #[test]
    fn validate_rejects_bad_fov() {
        let mut cfg = TargetConfig::default();
        cfg.camera.fov_vertical_deg = 180.0;
        assert!(cfg.validate().is_err());
        cfg.camera.fov_vertical_deg = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_image() {
        let mut cfg = TargetConfig::default();
        cfg.camera.image_width = u32::MAX;
        assert!(cfg.validate().is_err());
        cfg.camera.image_width = MAX_COORD as u32;
        assert!(cfg.validate().is_ok());
        cfg.camera.image_height = MAX_COORD as u32 + 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_floor() {
        let mut cfg = TargetConfig::default();
        cfg.scoring.min_component_score = 101.0;
        assert!(cfg.validate().is_err());
    }
}
