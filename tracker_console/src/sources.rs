use crate::cli::Args;
use green_tracker::config::FrameConfig;
use green_tracker::frame_cycle::FrameSource;
use green_tracker::{TrackerError, TrackerResult};
use image::RgbImage;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "ppm"];

/// Opens the source selected on the command line. Failure here is fatal.
pub fn open(args: &Args, frame: &FrameConfig) -> TrackerResult<Box<dyn FrameSource>> {
    if let Some(dir) = &args.frames {
        return Ok(Box::new(ImageSequenceSource::open(dir)?));
    }
    open_camera(args.camera.unwrap_or(0), frame)
}

#[cfg(feature = "camera")]
fn open_camera(index: i32, frame: &FrameConfig) -> TrackerResult<Box<dyn FrameSource>> {
    Ok(Box::new(camera::CameraSource::open(index, frame)?))
}

#[cfg(not(feature = "camera"))]
fn open_camera(index: i32, _frame: &FrameConfig) -> TrackerResult<Box<dyn FrameSource>> {
    Err(TrackerError::acquisition(format!(
        "camera {index} unavailable: built without the `camera` feature (use --frames <dir>)"
    )))
}

/// Replays a directory of still images in file-name order.
pub struct ImageSequenceSource {
    paths: VecDeque<PathBuf>,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path) -> TrackerResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            TrackerError::acquisition(format!("Unable to open frame directory {}: {e}", dir.display()))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_frame_file(path))
            .collect();
        if paths.is_empty() {
            return Err(TrackerError::acquisition(format!("No frames found in {}", dir.display())));
        }
        paths.sort();

        tracing::info!(frames = paths.len(), "Replaying frames from {:?}", dir);
        Ok(Self {
            paths: paths.into(),
        })
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> TrackerResult<Option<RgbImage>> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        let frame = image::open(&path)
            .map_err(|e| TrackerError::acquisition(format!("Unable to read frame {}: {e}", path.display())))?;
        Ok(Some(frame.to_rgb8()))
    }
}

#[cfg(feature = "camera")]
pub mod camera {
    use green_tracker::config::FrameConfig;
    use green_tracker::frame_cycle::FrameSource;
    use green_tracker::{TrackerError, TrackerResult};
    use image::RgbImage;
    use opencv::{
        core::Mat,
        imgproc,
        prelude::*,
        videoio::{self, VideoCapture},
    };

    fn acquisition(e: opencv::Error) -> TrackerError {
        TrackerError::acquisition(e.to_string())
    }

    /// Live frames from a capture device, converted from BGR to RGB.
    pub struct CameraSource {
        capture: VideoCapture,
        frame: Mat,
    }

    impl CameraSource {
        pub fn open(index: i32, frame: &FrameConfig) -> TrackerResult<Self> {
            let mut capture = VideoCapture::new(index, videoio::CAP_ANY).map_err(acquisition)?;
            if !capture.is_opened().map_err(acquisition)? {
                return Err(TrackerError::acquisition(format!("Unable to open camera {index}")));
            }
            // Best effort; devices pick the nearest mode they support.
            let _ = capture.set(videoio::CAP_PROP_FRAME_WIDTH, frame.width as f64);
            let _ = capture.set(videoio::CAP_PROP_FRAME_HEIGHT, frame.height as f64);

            tracing::info!(index, "Camera opened");
            Ok(Self {
                capture,
                frame: Mat::default(),
            })
        }
    }

    impl FrameSource for CameraSource {
        fn next_frame(&mut self) -> TrackerResult<Option<RgbImage>> {
            if !self.capture.read(&mut self.frame).map_err(acquisition)? || self.frame.empty() {
                return Err(TrackerError::acquisition("camera returned no frame"));
            }

            let mut rgb = Mat::default();
            imgproc::cvt_color(&self.frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0).map_err(acquisition)?;
            let size = rgb.size().map_err(acquisition)?;
            let data = rgb.data_bytes().map_err(acquisition)?.to_vec();

            RgbImage::from_raw(size.width as u32, size.height as u32, data)
                .map(Some)
                .ok_or_else(|| TrackerError::acquisition("camera frame has an unexpected layout"))
        }
    }
}
