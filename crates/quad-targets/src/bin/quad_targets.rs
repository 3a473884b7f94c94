use std::path::PathBuf;

use clap::Parser;
use quad_targets::detect::{detect_and_observe, load_color_image};
use quad_targets::io::{DetectReport, QuadTargetsConfig};
use quad_targets::render::{draw_overlay, save_overlay};

/// Detect nested black/white/black quad targets in an image and report them
/// as JSON.
#[derive(Parser, Debug)]
#[command(name = "quad-targets")]
#[command(version, about)]
struct Cli {
    /// Input image (any format the `image` crate decodes).
    image: PathBuf,

    /// JSON config with `detector`, `camera` and `target` sections.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write a debug overlay image here.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Override `detector.min_ring_area` from the config.
    #[arg(long)]
    min_ring_area: Option<f64>,

    /// off, error, warn, info, debug or trace. With `--features tracing`,
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit tracing spans as JSON lines on stderr.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_trace: bool,
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = quad_targets::core::parse_level(&cli.log_level)
        .ok_or_else(|| format!("unknown log level '{}'", cli.log_level))?;
    #[cfg(feature = "tracing")]
    quad_targets::core::init_tracing(cli.json_trace, level);
    #[cfg(not(feature = "tracing"))]
    quad_targets::core::init_with_level(level)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut cfg = match &cli.config {
        Some(path) => QuadTargetsConfig::load_json(path)
            .map_err(|e| format!("cannot load config {}: {e}", path.display()))?,
        None => QuadTargetsConfig::default(),
    };
    if let Some(min_ring_area) = cli.min_ring_area {
        cfg.detector.min_ring_area = min_ring_area;
    }

    let image_path = cli.image.display().to_string();
    let report = match load_color_image(&cli.image) {
        Ok(img) => {
            let observed = detect_and_observe(&img, &cfg)?;
            log::info!(
                "{}: {} target(s) from {} candidate(s)",
                image_path,
                observed.targets.len(),
                observed.stats.candidates
            );
            if let Some(path) = &cli.overlay {
                let estimator = cfg.build_pose_estimator();
                let overlay = draw_overlay(&img, &observed.targets, estimator.as_ref());
                save_overlay(path, &overlay)?;
            }
            DetectReport::new(image_path, img.width(), img.height(), observed)
        }
        Err(err) => {
            log::error!("{err}");
            DetectReport::failed(image_path, err)
        }
    };

    match &cli.output {
        Some(path) => report.write_json(path)?,
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
