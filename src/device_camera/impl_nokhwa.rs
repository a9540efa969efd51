use crate::device_camera::interface::{CameraStream, DeviceCamera};
use crate::error::AnalysisError;
use crate::image_source::frame::Frame;
use crate::image_source::upload;
use crate::library::logger::interface::Logger;
use image::{imageops, DynamicImage, RgbImage};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const OPEN_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_FAILED_READS: u32 = 30;
const RETRY_DELAY: Duration = Duration::from_millis(10);

/// Webcam through nokhwa. Each `acquire` opens the device on its own capture
/// thread, which keeps the latest frame in a buffer until the stream is
/// dropped.
pub struct DeviceCameraNokhwa {
    logger: Arc<dyn Logger + Send + Sync>,
    index: u32,
}

impl DeviceCameraNokhwa {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, index: u32) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("nokhwa"),
            index,
        }
    }
}

struct Shared {
    latest: Mutex<Option<RgbImage>>,
    running: AtomicBool,
    lost: AtomicBool,
}

impl DeviceCamera for DeviceCameraNokhwa {
    fn acquire(
        &self,
        width: u32,
        height: u32,
        mirror: bool,
    ) -> Result<Arc<dyn CameraStream + Send + Sync>, AnalysisError> {
        let shared = Arc::new(Shared {
            latest: Mutex::new(None),
            running: AtomicBool::new(true),
            lost: AtomicBool::new(false),
        });

        let (opened_tx, opened_rx) = channel();
        let index = self.index;
        let logger = self.logger.clone();
        let thread_shared = shared.clone();
        thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || capture(index, thread_shared, opened_tx, logger))
            .map_err(|e| AnalysisError::DeviceUnavailable(e.to_string()))?;

        match opened_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(name)) => {
                let _ = self.logger.info(&format!(
                    "Streaming from {} as {}x{} (mirror: {})",
                    name, width, height, mirror
                ));
            }
            Ok(Err(reason)) => {
                let _ = self.logger.warn(&format!("Cannot open camera: {}", reason));
                return Err(AnalysisError::DeviceUnavailable(reason));
            }
            Err(_) => {
                shared.running.store(false, Ordering::Release);
                return Err(AnalysisError::DeviceUnavailable(
                    "camera did not deliver a frame in time".to_string(),
                ));
            }
        }

        Ok(Arc::new(CameraStreamNokhwa {
            shared,
            width,
            height,
            mirror,
        }))
    }
}

fn open(index: u32) -> Result<Camera, String> {
    let requested =
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
    let mut camera =
        Camera::new(CameraIndex::Index(index), requested).map_err(|e| e.to_string())?;
    camera.open_stream().map_err(|e| e.to_string())?;
    Ok(camera)
}

fn read(camera: &mut Camera) -> Result<RgbImage, String> {
    let decoded = camera
        .frame()
        .and_then(|buffer| buffer.decode_image::<RgbFormat>())
        .map_err(|e| e.to_string())?;
    let (width, height) = (decoded.width(), decoded.height());
    RgbImage::from_raw(width, height, decoded.into_raw())
        .ok_or_else(|| format!("short frame buffer for {}x{}", width, height))
}

/// Runs on the capture thread. Reports the device name on `opened` once the
/// first frame is buffered, or the reason it could not get there.
fn capture(
    index: u32,
    shared: Arc<Shared>,
    opened: Sender<Result<String, String>>,
    logger: Arc<dyn Logger + Send + Sync>,
) {
    let mut camera = match open(index) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = opened.send(Err(e));
            return;
        }
    };

    let mut opened = Some(opened);
    let mut failed_reads = 0;

    while shared.running.load(Ordering::Acquire) {
        match read(&mut camera) {
            Ok(image) => {
                failed_reads = 0;
                *shared.latest.lock() = Some(image);
                if let Some(opened) = opened.take() {
                    let _ = opened.send(Ok(camera.info().human_name()));
                }
            }
            Err(e) => {
                failed_reads += 1;
                if failed_reads < MAX_FAILED_READS {
                    thread::sleep(RETRY_DELAY);
                    continue;
                }
                match opened.take() {
                    Some(opened) => {
                        let _ = opened.send(Err(e));
                    }
                    None => {
                        let _ = logger.error(&format!("Camera lost: {}", e));
                        shared.lost.store(true, Ordering::Release);
                    }
                }
                break;
            }
        }
    }

    let _ = camera.stop_stream();
}

struct CameraStreamNokhwa {
    shared: Arc<Shared>,
    width: u32,
    height: u32,
    mirror: bool,
}

impl CameraStream for CameraStreamNokhwa {
    fn current_frame(&self) -> Result<Frame, AnalysisError> {
        if self.shared.lost.load(Ordering::Acquire) {
            return Err(AnalysisError::FrameUnavailable(
                "camera disconnected".to_string(),
            ));
        }

        let image = self.shared.latest.lock().clone().ok_or_else(|| {
            AnalysisError::FrameUnavailable("no frame captured yet".to_string())
        })?;

        Ok(shape(image, self.width, self.height, self.mirror))
    }
}

impl Drop for CameraStreamNokhwa {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
    }
}

/// Mirrors if asked, then crops and resizes the capture to the analysis size.
fn shape(image: RgbImage, width: u32, height: u32, mirror: bool) -> Frame {
    let image = if mirror {
        imageops::flip_horizontal(&image)
    } else {
        image
    };
    upload::fit(&DynamicImage::ImageRgb8(image), width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::Rgb;

    fn stream(latest: Option<RgbImage>, lost: bool) -> CameraStreamNokhwa {
        CameraStreamNokhwa {
            shared: Arc::new(Shared {
                latest: Mutex::new(latest),
                running: AtomicBool::new(true),
                lost: AtomicBool::new(lost),
            }),
            width: 300,
            height: 300,
            mirror: true,
        }
    }

    #[test]
    fn test_capture_is_cropped_to_analysis_size() {
        let frame = shape(RgbImage::new(640, 480), 300, 300, false);

        assert_eq!((frame.width(), frame.height()), (300, 300));
    }

    #[test]
    fn test_mirror_flips_capture() {
        let mut image = RgbImage::new(4, 4);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        let frame = shape(image, 4, 4, true);

        assert_eq!(frame.image().get_pixel(3, 0), &Rgb([255, 0, 0]));
        assert_eq!(frame.image().get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_buffered_frame_is_served() {
        let frame = stream(Some(RgbImage::new(640, 480)), false)
            .current_frame()
            .unwrap();

        assert_eq!((frame.width(), frame.height()), (300, 300));
    }

    #[test]
    fn test_lost_device_has_no_frame() {
        let result = stream(Some(RgbImage::new(640, 480)), true).current_frame();

        assert!(matches!(result, Err(AnalysisError::FrameUnavailable(_))));
    }

    #[test]
    fn test_dropping_stream_stops_capture() {
        let stream = stream(None, false);
        let shared = stream.shared.clone();
        drop(stream);

        assert!(!shared.running.load(Ordering::Acquire));
    }

    #[test]
    fn test_missing_device_is_unavailable() {
        let camera = DeviceCameraNokhwa::new(Arc::new(LoggerFake::new()), 250);

        assert!(matches!(
            camera.acquire(300, 300, true),
            Err(AnalysisError::DeviceUnavailable(_))
        ));
    }
}
