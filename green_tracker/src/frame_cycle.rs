// THEORY:
// The `frame_cycle` module is the runtime layer around `TrackingPipeline`. It owns
// no business logic; it only sequences the collaborators once per cycle:
//
//   acquire frame (FrameSource) -> process (TrackingPipeline) -> present (FrameSink)
//
// Key architectural principles:
// 1.  **Synchronous cycles**: A cycle runs start to finish on the calling thread with
//     no suspension points. Frame sources are expected to block until a frame is
//     ready, so the controller belongs on a blocking thread, not an async worker.
// 2.  **Cooperative stop**: Cancellation is a `StopToken` checked once per cycle
//     boundary. The token wraps a `tokio::sync::watch` channel; the command
//     listener holds the sending half and the controller only ever reads.
// 3.  **Failure classes**: Acquisition errors end the loop and are returned to the
//     caller. Presentation errors are logged and the loop keeps going.
// 4.  **No carry-over**: The frame and its report are dropped when the cycle ends.

use crate::config::TrackerConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::pipeline::{Action, FrameReport, TrackingPipeline};
use crate::core_modules::transform::TransformPipeline;
use image::RgbImage;
use tokio::sync::watch;

/// Supplies one frame per call.
pub trait FrameSource {
    /// `Ok(None)` means the stream has ended.
    fn next_frame(&mut self) -> TrackerResult<Option<RgbImage>>;
}

/// Receives every processed frame for display.
pub trait FrameSink {
    fn present(&mut self, frame: &RgbImage, report: &FrameReport) -> TrackerResult<()>;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn next_frame(&mut self) -> TrackerResult<Option<RgbImage>> {
        (**self).next_frame()
    }
}

impl<T: FrameSink + ?Sized> FrameSink for Box<T> {
    fn present(&mut self, frame: &RgbImage, report: &FrameReport) -> TrackerResult<()> {
        (**self).present(frame, report)
    }
}

/// Sending half of the stop signal. Held by the command listener.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

/// Receiving half of the stop signal. Held by the cycle driver.
#[derive(Debug, Clone)]
pub struct StopToken {
    rx: watch::Receiver<bool>,
}

/// Creates a linked stop handle and token, initially not stopped.
pub fn stop_channel() -> (StopHandle, StopToken) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopToken { rx })
}

impl StopHandle {
    pub fn request_stop(&self) {
        // send_replace never fails, even with every token dropped.
        self.tx.send_replace(true);
    }
}

impl StopToken {
    pub fn is_stop_requested(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Why the cycle loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Requested,
    EndOfStream,
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub cycles: u64,
    pub detections: u64,
    pub move_left: u64,
    pub move_right: u64,
    pub presentation_failures: u64,
}

impl CycleSummary {
    fn record(&mut self, report: &FrameReport) {
        self.cycles += 1;
        if report.detected() {
            self.detections += 1;
        }
        match report.action {
            Action::MoveLeft => self.move_left += 1,
            Action::MoveRight => self.move_right += 1,
            Action::None => {}
        }
    }
}

/// Drives acquire → process → present until told to stop.
pub struct FrameCycleController<'a, S, K> {
    source: S,
    sink: K,
    pipeline: TrackingPipeline<'a>,
    summary: CycleSummary,
}

impl<'a, S: FrameSource, K: FrameSink> FrameCycleController<'a, S, K> {
    pub fn new(source: S, sink: K, config: &TrackerConfig) -> Self {
        Self {
            source,
            sink,
            pipeline: TrackingPipeline::new(config),
            summary: CycleSummary::default(),
        }
    }

    /// Segments with `transforms` instead of the built-in classifier.
    pub fn with_transforms(
        source: S,
        sink: K,
        config: &TrackerConfig,
        transforms: &'a TransformPipeline<'a>,
    ) -> Self {
        Self {
            source,
            sink,
            pipeline: TrackingPipeline::with_transforms(config, transforms),
            summary: CycleSummary::default(),
        }
    }

    pub fn summary(&self) -> &CycleSummary {
        &self.summary
    }

    pub fn into_parts(self) -> (S, K, CycleSummary) {
        (self.source, self.sink, self.summary)
    }

    /// One iteration. `Ok(None)` when the source has no more frames.
    pub fn run_cycle(&mut self) -> TrackerResult<Option<Action>> {
        let Some(frame) = self.source.next_frame()? else {
            return Ok(None);
        };

        let report = self.pipeline.process_frame(&frame);
        self.summary.record(&report);

        if let Err(e) = self.sink.present(&frame, &report) {
            self.summary.presentation_failures += 1;
            tracing::warn!("Presentation failed, continuing: {}", e);
        }

        Ok(Some(report.action))
    }

    /// Loops until the token fires, the stream ends, or acquisition fails.
    pub fn run(&mut self, stop: &StopToken) -> TrackerResult<StopReason> {
        tracing::info!("Frame cycle started");
        let reason = loop {
            if stop.is_stop_requested() {
                break StopReason::Requested;
            }
            match self.run_cycle() {
                Ok(Some(_)) => {}
                Ok(None) => break StopReason::EndOfStream,
                Err(e) => {
                    tracing::error!("Frame cycle aborted after {} cycles: {}", self.summary.cycles, e);
                    return Err(e);
                }
            }
        };

        tracing::info!(
            ?reason,
            cycles = self.summary.cycles,
            detections = self.summary.detections,
            "Frame cycle finished"
        );
        Ok(reason)
    }
}

/// Source that always fails; stands in for a device that could not be opened.
#[derive(Debug)]
pub struct UnavailableSource {
    reason: String,
}

impl UnavailableSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl FrameSource for UnavailableSource {
    fn next_frame(&mut self) -> TrackerResult<Option<RgbImage>> {
        Err(TrackerError::acquisition(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::color_segmenter::{ColorSegmenter, GreenTransform};
    use image::Rgb;
    use std::collections::VecDeque;

    struct QueueSource(VecDeque<RgbImage>);

    impl FrameSource for QueueSource {
        fn next_frame(&mut self) -> TrackerResult<Option<RgbImage>> {
            Ok(self.0.pop_front())
        }
    }

    /// Endless source that trips the stop handle after `limit` frames.
    struct StoppingSource {
        served: u32,
        limit: u32,
        handle: StopHandle,
    }

    impl FrameSource for StoppingSource {
        fn next_frame(&mut self) -> TrackerResult<Option<RgbImage>> {
            self.served += 1;
            if self.served == self.limit {
                self.handle.request_stop();
            }
            Ok(Some(RgbImage::new(8, 8)))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        actions: Vec<Action>,
        fail: bool,
    }

    impl FrameSink for RecordingSink {
        fn present(&mut self, _frame: &RgbImage, report: &FrameReport) -> TrackerResult<()> {
            self.actions.push(report.action);
            if self.fail {
                Err(TrackerError::presentation("window closed"))
            } else {
                Ok(())
            }
        }
    }

    fn green_block_at(x0: u32) -> RgbImage {
        RgbImage::from_fn(1400, 130, |x, y| {
            if (x0..x0 + 120).contains(&x) && (5..125).contains(&y) {
                Rgb([20, 220, 20])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn runs_until_end_of_stream() {
        let frames = VecDeque::from(vec![RgbImage::new(8, 8), green_block_at(40), green_block_at(1250)]);
        let config = TrackerConfig::default();
        let (_handle, token) = stop_channel();
        let mut controller = FrameCycleController::new(QueueSource(frames), RecordingSink::default(), &config);

        assert_eq!(controller.run(&token).unwrap(), StopReason::EndOfStream);
        let (_, sink, summary) = controller.into_parts();
        assert_eq!(sink.actions, vec![Action::None, Action::MoveRight, Action::MoveLeft]);
        assert_eq!(summary.cycles, 3);
        assert_eq!(summary.detections, 2);
        assert_eq!((summary.move_left, summary.move_right), (1, 1));
    }

    #[test]
    fn transform_pipeline_drives_the_same_actions() {
        let frames = || {
            VecDeque::from(vec![
                RgbImage::new(8, 8),
                green_block_at(40),
                green_block_at(1040),
                green_block_at(1250),
            ])
        };
        let config = TrackerConfig::default();
        let green = GreenTransform::new(ColorSegmenter::from(&config.segmenter));
        let mut transforms = TransformPipeline::new();
        transforms.add_transform(&green);
        let (_handle, token) = stop_channel();

        let mut fixed = FrameCycleController::new(QueueSource(frames()), RecordingSink::default(), &config);
        let mut staged = FrameCycleController::with_transforms(
            QueueSource(frames()),
            RecordingSink::default(),
            &config,
            &transforms,
        );
        assert_eq!(fixed.run(&token).unwrap(), StopReason::EndOfStream);
        assert_eq!(staged.run(&token).unwrap(), StopReason::EndOfStream);

        let (_, fixed_sink, fixed_summary) = fixed.into_parts();
        let (_, staged_sink, staged_summary) = staged.into_parts();
        assert_eq!(
            staged_sink.actions,
            vec![Action::None, Action::MoveRight, Action::None, Action::MoveLeft]
        );
        assert_eq!(staged_sink.actions, fixed_sink.actions);
        assert_eq!(staged_summary, fixed_summary);
    }

    #[test]
    fn stop_is_observed_at_the_next_cycle_boundary() {
        let config = TrackerConfig::default();
        let (handle, token) = stop_channel();
        let source = StoppingSource {
            served: 0,
            limit: 3,
            handle,
        };
        let mut controller = FrameCycleController::new(source, RecordingSink::default(), &config);

        assert_eq!(controller.run(&token).unwrap(), StopReason::Requested);
        // The cycle that saw the stop request still completes.
        assert_eq!(controller.summary().cycles, 3);
    }

    #[test]
    fn stop_before_start_runs_no_cycles() {
        let config = TrackerConfig::default();
        let (handle, token) = stop_channel();
        handle.request_stop();
        let mut controller =
            FrameCycleController::new(UnavailableSource::new("never read"), RecordingSink::default(), &config);
        assert_eq!(controller.run(&token).unwrap(), StopReason::Requested);
        assert_eq!(controller.summary().cycles, 0);
    }

    #[test]
    fn acquisition_failure_is_fatal() {
        let config = TrackerConfig::default();
        let (_handle, token) = stop_channel();
        let mut controller = FrameCycleController::new(
            UnavailableSource::new("Unable to open camera"),
            RecordingSink::default(),
            &config,
        );
        let err = controller.run(&token).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(controller.summary().cycles, 0);
    }

    #[test]
    fn presentation_failure_is_not_fatal() {
        let frames = VecDeque::from(vec![RgbImage::new(8, 8), RgbImage::new(8, 8)]);
        let config = TrackerConfig::default();
        let (_handle, token) = stop_channel();
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut controller = FrameCycleController::new(QueueSource(frames), sink, &config);

        assert_eq!(controller.run(&token).unwrap(), StopReason::EndOfStream);
        assert_eq!(controller.summary().presentation_failures, 2);
        assert_eq!(controller.summary().cycles, 2);
    }

    #[test]
    fn stop_token_is_observed_across_threads() {
        let (handle, token) = stop_channel();
        assert!(!token.is_stop_requested());
        std::thread::spawn(move || handle.request_stop()).join().unwrap();
        assert!(token.is_stop_requested());
    }
}
