//! targetd - alignment target vision service
//!
//! This daemon:
//! 1. Loads settings (TARGET_VISION_CONFIG file, then env overrides)
//! 2. Opens the contour source
//! 3. Runs target selection + ranging on a dedicated vision thread
//! 4. Samples the result latch at the report interval, the way a control loop would
//! 5. Stops the vision thread on Ctrl-C or when a finite source ends

use anyhow::{anyhow, Result};
use std::sync::mpsc::{self, RecvTimeoutError};

use target_vision::{build_runner, TargetConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = TargetConfig::load()?;
    log::info!(
        "source={} fps={} image={}x{} fov_vert={}deg target_height={}in threshold={:.0}",
        cfg.source.url,
        cfg.source.target_fps,
        cfg.camera.image_width,
        cfg.camera.image_height,
        cfg.camera.fov_vertical_deg,
        cfg.camera.target_height_in,
        cfg.scoring.threshold
    );

    let handle = build_runner(&cfg)?.spawn()?;
    let latch = handle.latch();

    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .map_err(|e| anyhow!("failed to install Ctrl-C handler: {}", e))?;

    log::info!("targetd running (Ctrl-C to stop)");
    loop {
        match rx.recv_timeout(cfg.report_interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                log::info!("shutdown signal received, stopping vision thread...");
                break;
            }
        }
        if handle.is_finished() {
            break;
        }

        let stamped = latch.snapshot_stamped();
        if stamped.result.has_target() {
            log::info!(
                "center_x={:.1} distance={:.1}in update=#{} age={}ms",
                stamped.result.center_x,
                stamped.result.distance,
                stamped.sequence,
                stamped.age().unwrap_or_default().as_millis()
            );
        } else {
            log::info!("no target acquired yet");
        }
    }

    let stats = handle.stop()?;
    log::info!(
        "vision thread stopped: {} frames, {} targets published",
        stats.frames,
        stats.published
    );
    Ok(())
}
