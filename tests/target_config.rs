use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use tempfile::Builder;

use target_vision::config::TargetConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "TARGET_VISION_CONFIG",
        "TARGET_VISION_SOURCE",
        "TARGET_VISION_FPS",
        "TARGET_VISION_SCORE_THRESHOLD",
        "TARGET_VISION_MIN_COMPONENT_SCORE",
        "TARGET_VISION_REPORT_MS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_without_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = TargetConfig::load().expect("load config");

    assert_eq!(cfg.source.url, "stub://field");
    assert_eq!(cfg.source.target_fps, 30);
    assert_eq!(cfg.camera.image_width, 320);
    assert_eq!(cfg.camera.image_height, 240);
    assert_eq!(cfg.camera.fov_vertical_deg, 41.0);
    assert_eq!(cfg.camera.target_height_in, 15.3);
    assert_eq!(cfg.scoring.threshold, 450.0);
    assert_eq!(cfg.scoring.min_component_score, 0.0);
}

#[test]
fn loads_json_config_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = Builder::new().suffix(".json").tempfile().expect("temp config");
    let json = r#"{
        "source": { "url": "stub://practice", "target_fps": 15, "seed": 9 },
        "camera": { "image_width": 640, "image_height": 480, "fov_vertical_deg": 48.0 },
        "target": { "height_in": 17.0 },
        "scoring": { "threshold": 400.0, "min_component_score": 15.0 },
        "report": { "interval_ms": 250 }
    }"#;
    file.write_all(json.as_bytes()).expect("write config");

    std::env::set_var("TARGET_VISION_CONFIG", file.path());
    std::env::set_var("TARGET_VISION_FPS", "60");
    std::env::set_var("TARGET_VISION_SCORE_THRESHOLD", "475");

    let cfg = TargetConfig::load().expect("load config");

    assert_eq!(cfg.source.url, "stub://practice");
    assert_eq!(cfg.source.target_fps, 60);
    assert_eq!(cfg.source.seed, 9);
    assert_eq!(cfg.source.width, 640);
    assert_eq!(cfg.source.height, 480);
    assert_eq!(cfg.camera.fov_vertical_deg, 48.0);
    assert_eq!(cfg.camera.target_height_in, 17.0);
    assert_eq!(cfg.scoring.threshold, 475.0);
    assert_eq!(cfg.scoring.min_component_score, 15.0);
    assert_eq!(cfg.report_interval, Duration::from_millis(250));

    clear_env();
}

#[test]
fn loads_toml_config() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = Builder::new().suffix(".toml").tempfile().expect("temp config");
    let toml = r#"
        [source]
        url = "recorded/match_12.jsonl"
        target_fps = 0

        [camera]
        fov_vertical_deg = 43.5
    "#;
    file.write_all(toml.as_bytes()).expect("write config");

    std::env::set_var("TARGET_VISION_CONFIG", file.path());
    std::env::set_var("TARGET_VISION_SOURCE", "stub://override");

    let cfg = TargetConfig::load().expect("load config");

    assert_eq!(cfg.source.url, "stub://override");
    assert_eq!(cfg.source.target_fps, 0);
    assert_eq!(cfg.camera.fov_vertical_deg, 43.5);
    assert_eq!(cfg.camera.image_height, 240);

    let from_path = TargetConfig::from_path(file.path()).expect("explicit path");
    assert_eq!(from_path.source.url, "recorded/match_12.jsonl");

    clear_env();
}

#[test]
fn rejects_invalid_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("TARGET_VISION_FPS", "fast");
    assert!(TargetConfig::load().is_err());
    clear_env();

    std::env::set_var("TARGET_VISION_SCORE_THRESHOLD", "-5");
    assert!(TargetConfig::load().is_err());
    clear_env();

    let mut file = Builder::new().suffix(".json").tempfile().expect("temp config");
    file.write_all(br#"{ "camera": { "fov_vertical_deg": 0.0 } }"#)
        .expect("write config");
    std::env::set_var("TARGET_VISION_CONFIG", file.path());
    assert!(TargetConfig::load().is_err());
    clear_env();

    let mut file = Builder::new().suffix(".json").tempfile().expect("temp config");
    file.write_all(br#"{ "camera": { "focal_length": 3.6 } }"#)
        .expect("write config");
    std::env::set_var("TARGET_VISION_CONFIG", file.path());
    assert!(TargetConfig::load().is_err(), "unknown keys are rejected");
    clear_env();
}
