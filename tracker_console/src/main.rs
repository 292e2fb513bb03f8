mod cli;
mod console;
mod sinks;
mod sources;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use green_tracker::assets::load_optional_asset;
use green_tracker::frame_cycle::{CycleSummary, FrameCycleController, StopToken, stop_channel};
use green_tracker::TrackerConfig;
use green_tracker::config::ConfigOrigin;
use green_tracker::core_modules::color_segmenter::{ColorSegmenter, GreenTransform};
use green_tracker::core_modules::transform::TransformPipeline;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Arguments & Configuration ---
    let args = cli::Args::parse();
    let (loaded, origin) = TrackerConfig::load(&args.config);
    let config = args.apply_overrides(loaded);
    telemetry::init_logging(&config.logging);
    match origin {
        ConfigOrigin::File => info!("Configuration loaded from {:?}", args.config),
        ConfigOrigin::Defaults => info!("No config at {:?}, using defaults", args.config),
        ConfigOrigin::Fallback(e) => warn!("Failed to load config at {:?}, using defaults: {}", args.config, e),
    }
    config.validate().context("invalid tracker configuration")?;

    if let Some(path) = &args.classifier {
        // Diagnostic only; the tracker never consults it.
        let _ = load_optional_asset(path, "classifier");
    }

    // --- 2. Stop Signal ---
    let (stop_handle, stop_token) = stop_channel();
    console::spawn_stdin_listener(stop_handle.clone()).context("failed to start command listener")?;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping");
            stop_handle.request_stop();
        }
    });

    // --- 3. Frame Cycle ---
    let summary = tokio::task::spawn_blocking(move || run_tracker(&args, &config, &stop_token))
        .await
        .context("frame cycle thread panicked")??;

    info!(
        cycles = summary.cycles,
        detections = summary.detections,
        move_left = summary.move_left,
        move_right = summary.move_right,
        presentation_failures = summary.presentation_failures,
        "Tracker stopped"
    );
    Ok(())
}

/// Opens the source and sinks on the calling thread and runs until stopped.
fn run_tracker(args: &cli::Args, config: &TrackerConfig, stop: &StopToken) -> anyhow::Result<CycleSummary> {
    let source = sources::open(args, &config.frame).context("unable to acquire frames")?;
    let sink = sinks::build(args.display, config);

    let green = GreenTransform::new(ColorSegmenter::from(&config.segmenter));
    let mut transforms = TransformPipeline::new();
    transforms.add_transform(&green);

    let mut controller = if args.pipeline {
        info!(stages = transforms.len(), "Segmenting through the transform pipeline");
        FrameCycleController::with_transforms(source, sink, config, &transforms)
    } else {
        FrameCycleController::new(source, sink, config)
    };
    let reason = controller.run(stop).context("tracking aborted")?;
    info!(?reason, "Frame cycle ended");

    let (_, _, summary) = controller.into_parts();
    Ok(summary)
}
