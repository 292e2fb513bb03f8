use green_tracker::config::TrackerConfig;
use green_tracker::core_modules::steering::SteeredElement;
use green_tracker::frame_cycle::FrameSink;
use green_tracker::pipeline::{Action, FrameReport};
use green_tracker::TrackerResult;
use image::RgbImage;

/// Builds the sink chain: always the steering log, plus windows when asked.
pub fn build(display: bool, config: &TrackerConfig) -> Box<dyn FrameSink> {
    let mut sinks: Vec<Box<dyn FrameSink>> = vec![Box::new(LogSink::new(config))];
    if display {
        match open_display() {
            Ok(sink) => sinks.push(sink),
            Err(e) => tracing::warn!("Display unavailable, continuing without windows: {}", e),
        }
    }
    Box::new(FanOut(sinks))
}

#[cfg(feature = "camera")]
fn open_display() -> TrackerResult<Box<dyn FrameSink>> {
    Ok(Box::new(highgui_sink::HighguiSink::new()?))
}

#[cfg(not(feature = "camera"))]
fn open_display() -> TrackerResult<Box<dyn FrameSink>> {
    Err(green_tracker::TrackerError::presentation(
        "built without the `camera` feature",
    ))
}

/// Presents to every inner sink; reports the first failure after trying all.
pub struct FanOut(pub Vec<Box<dyn FrameSink>>);

impl FrameSink for FanOut {
    fn present(&mut self, frame: &RgbImage, report: &FrameReport) -> TrackerResult<()> {
        let mut first_err = None;
        for sink in &mut self.0 {
            if let Err(e) = sink.present(frame, report) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Moves the steered element and logs every change of action.
pub struct LogSink {
    element: SteeredElement,
    last_action: Action,
}

impl LogSink {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            element: SteeredElement::centered(config.frame.width, &config.element),
            last_action: Action::None,
        }
    }

    pub fn element(&self) -> &SteeredElement {
        &self.element
    }
}

impl FrameSink for LogSink {
    fn present(&mut self, _frame: &RgbImage, report: &FrameReport) -> TrackerResult<()> {
        let x = self.element.apply(report.action);
        tracing::debug!(
            target_x = report.target.x,
            target_y = report.target.y,
            blobs = report.extraction.blobs.len(),
            element_x = x,
            "Frame processed"
        );
        if report.action != self.last_action {
            tracing::info!(action = ?report.action, target_x = report.target.x, element_x = x, "Action changed");
            self.last_action = report.action;
        }
        Ok(())
    }
}

#[cfg(feature = "camera")]
pub mod highgui_sink {
    use green_tracker::frame_cycle::FrameSink;
    use green_tracker::pipeline::FrameReport;
    use green_tracker::{TrackerError, TrackerResult};
    use image::{GrayImage, RgbImage};
    use opencv::{
        core::{self, Mat, Scalar},
        highgui, imgproc,
        prelude::*,
    };

    const ORIGINAL_WINDOW: &str = "Original";
    const MASK_WINDOW: &str = "Gray";

    fn presentation(e: opencv::Error) -> TrackerError {
        TrackerError::presentation(e.to_string())
    }

    fn to_mat(data: &[u8], width: u32, height: u32, kind: i32) -> opencv::Result<Mat> {
        let mut mat = Mat::new_rows_cols_with_default(height as i32, width as i32, kind, Scalar::all(0.0))?;
        mat.data_bytes_mut()?.copy_from_slice(data);
        Ok(mat)
    }

    /// Shows the frame and its mask side by side.
    pub struct HighguiSink {
        _private: (),
    }

    impl HighguiSink {
        pub fn new() -> TrackerResult<Self> {
            highgui::named_window(ORIGINAL_WINDOW, highgui::WINDOW_AUTOSIZE).map_err(presentation)?;
            highgui::named_window(MASK_WINDOW, highgui::WINDOW_AUTOSIZE).map_err(presentation)?;
            highgui::move_window(MASK_WINDOW, 500, 0).map_err(presentation)?;
            Ok(Self { _private: () })
        }

        fn show(&self, frame: &RgbImage, mask: &GrayImage) -> opencv::Result<()> {
            let rgb = to_mat(frame.as_raw(), frame.width(), frame.height(), core::CV_8UC3)?;
            let mut bgr = Mat::default();
            imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)?;
            let gray = to_mat(mask.as_raw(), mask.width(), mask.height(), core::CV_8UC1)?;

            highgui::imshow(ORIGINAL_WINDOW, &bgr)?;
            highgui::imshow(MASK_WINDOW, &gray)?;
            highgui::wait_key(2)?;
            Ok(())
        }
    }

    impl FrameSink for HighguiSink {
        fn present(&mut self, frame: &RgbImage, report: &FrameReport) -> TrackerResult<()> {
            self.show(frame, &report.mask).map_err(presentation)
        }
    }

    impl Drop for HighguiSink {
        fn drop(&mut self) {
            let _ = highgui::destroy_all_windows();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use green_tracker::TrackerError;
    use green_tracker::pipeline::TrackingPipeline;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Failing;

    struct Counting(Rc<Cell<u32>>);

    impl FrameSink for Counting {
        fn present(&mut self, _frame: &RgbImage, _report: &FrameReport) -> TrackerResult<()> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    impl FrameSink for Failing {
        fn present(&mut self, _frame: &RgbImage, _report: &FrameReport) -> TrackerResult<()> {
            Err(TrackerError::presentation("window closed"))
        }
    }

    fn report_for(frame: &RgbImage, config: &TrackerConfig) -> FrameReport {
        TrackingPipeline::new(config).process_frame(frame)
    }

    #[test]
    fn log_sink_steers_the_element() {
        let config = TrackerConfig::default();
        let mut sink = LogSink::new(&config);
        let frame = RgbImage::new(4, 4);
        let mut report = report_for(&frame, &config);

        report.action = Action::MoveRight;
        sink.present(&frame, &report).unwrap();
        sink.present(&frame, &report).unwrap();
        assert_eq!(sink.element().x(), 620.0);

        report.action = Action::None;
        sink.present(&frame, &report).unwrap();
        assert_eq!(sink.element().x(), 620.0);
    }

    #[test]
    fn fan_out_tries_every_sink() {
        let config = TrackerConfig::default();
        let frame = RgbImage::new(4, 4);
        let report = report_for(&frame, &config);
        let presented = Rc::new(Cell::new(0));

        let sinks: Vec<Box<dyn FrameSink>> = vec![
            Box::new(Failing),
            Box::new(Counting(Rc::clone(&presented))),
            Box::new(Failing),
        ];
        let mut fan_out = FanOut(sinks);
        assert!(fan_out.present(&frame, &report).is_err());
        assert!(fan_out.present(&frame, &report).is_err());
        assert_eq!(presented.get(), 2);
    }

    #[cfg(not(feature = "camera"))]
    #[test]
    fn display_without_camera_feature_falls_back_to_logging() {
        let config = TrackerConfig::default();
        let frame = RgbImage::new(4, 4);
        let report = report_for(&frame, &config);
        let mut sink = build(true, &config);
        assert!(sink.present(&frame, &report).is_ok());
    }
}
