//! score_frames - offline target selection report for a contour source

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;

use target_vision::{
    CameraModel, ContourSource, FrameResult, PairSelection, PairSelector, SelectorParams,
    SourceConfig, SCORE_THRESHOLD,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Contour source: stub://<name> or a JSON-lines replay file.
    #[arg(long, default_value = "stub://field")]
    source: String,
    /// Number of frames to score (replay files stop early at end of file).
    #[arg(long, default_value_t = 60)]
    frames: u64,
    /// Seed for the synthetic scene.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Total score a pair must exceed.
    #[arg(long, default_value_t = SCORE_THRESHOLD)]
    threshold: f64,
    /// Reject pairs with any single score below this.
    #[arg(long, default_value_t = 0.0)]
    min_component_score: f64,
    /// Report the best pair even when it misses the threshold.
    #[arg(long)]
    all: bool,
    /// Emit one JSON object per frame instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FrameReport {
    frame: u64,
    contours: usize,
    accepted: bool,
    best: Option<PairSelection>,
    result: Option<FrameResult>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    if args.frames == 0 {
        return Err(anyhow!("frames must be >= 1"));
    }

    let mut source = ContourSource::new(SourceConfig {
        url: args.source.clone(),
        target_fps: 0,
        seed: args.seed,
        ..SourceConfig::default()
    })?;
    source.connect()?;

    let selector = PairSelector::new(SelectorParams {
        threshold: args.threshold,
        min_component_score: args.min_component_score,
    });
    let camera = CameraModel::default();

    let mut accepted_frames = 0u64;
    for frame_no in 1..=args.frames {
        let Some(frame) = source.next_frame()? else {
            break;
        };
        let rects = frame.rects();
        let selected = selector.select(&rects);
        let result = selected.and_then(|sel| camera.solve(&sel.bounding));
        if result.is_some() {
            accepted_frames += 1;
        }
        let best = match selected {
            Some(sel) => Some(sel),
            None if args.all => selector.best_pair(&rects),
            None => None,
        };

        let report = FrameReport {
            frame: frame_no,
            contours: rects.len(),
            accepted: result.is_some(),
            best,
            result,
        };
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_text(&report);
        }
    }

    let stats = source.stats();
    eprintln!(
        "{} frames from {}, {} with a target",
        stats.frames_delivered, stats.url, accepted_frames
    );
    Ok(())
}

fn print_text(report: &FrameReport) {
    let Some(best) = &report.best else {
        println!("#{:<5} contours={:<3} no target", report.frame, report.contours);
        return;
    };
    let components = best
        .breakdown
        .components()
        .iter()
        .map(|(name, score)| format!("{}={:.0}", name, score))
        .collect::<Vec<_>>()
        .join(" ");
    let verdict = match &report.result {
        Some(result) => format!(
            "center_x={:.1} distance={:.1}in",
            result.center_x, result.distance
        ),
        None => "rejected".to_string(),
    };
    println!(
        "#{:<5} contours={:<3} pair=({}, {}) total={:.1} {} [{}]",
        report.frame,
        report.contours,
        best.first,
        best.second,
        best.total(),
        verdict,
        components
    );
}
