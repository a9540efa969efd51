use crate::device_camera::interface::{CameraStream, DeviceCamera};
use crate::error::AnalysisError;
use crate::image_source::frame::Frame;
use crate::library::logger::interface::Logger;
use image::{imageops, Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Camera that synthesises a moving gradient. Permission denial and device
/// loss can be switched on to exercise the failure paths.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    permission_granted: bool,
    lost: Arc<AtomicBool>,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            permission_granted: true,
            lost: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn denied(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            permission_granted: false,
            ..Self::new(logger)
        }
    }

    /// Simulates the device being unplugged. Existing streams stop yielding
    /// frames.
    pub fn lose_device(&self) {
        let _ = self.logger.warn("Device lost");
        self.lost.store(true, Ordering::SeqCst);
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn acquire(
        &self,
        width: u32,
        height: u32,
        mirror: bool,
    ) -> Result<Arc<dyn CameraStream + Send + Sync>, AnalysisError> {
        if !self.permission_granted {
            let _ = self.logger.warn("Permission denied");
            return Err(AnalysisError::DeviceUnavailable(
                "permission denied".to_string(),
            ));
        }

        if self.lost.load(Ordering::SeqCst) {
            return Err(AnalysisError::DeviceUnavailable(
                "no camera found".to_string(),
            ));
        }

        let _ = self
            .logger
            .info(&format!("Streaming {}x{} (mirror: {})", width, height, mirror));

        Ok(Arc::new(CameraStreamFake {
            width,
            height,
            mirror,
            lost: self.lost.clone(),
            frame_index: AtomicU32::new(0),
        }))
    }
}

struct CameraStreamFake {
    width: u32,
    height: u32,
    mirror: bool,
    lost: Arc<AtomicBool>,
    frame_index: AtomicU32,
}

impl CameraStream for CameraStreamFake {
    fn current_frame(&self) -> Result<Frame, AnalysisError> {
        if self.lost.load(Ordering::SeqCst) {
            return Err(AnalysisError::FrameUnavailable(
                "camera disconnected".to_string(),
            ));
        }

        let offset = self.frame_index.fetch_add(1, Ordering::SeqCst);
        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            let shade = (x.wrapping_add(offset) % 256) as u8;
            Rgb([shade, (y % 256) as u8, 128])
        });

        let image = if self.mirror {
            imageops::flip_horizontal(&image)
        } else {
            image
        };

        Ok(Frame::new(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    #[test]
    fn test_stream_yields_requested_size() {
        let camera = DeviceCameraFake::new(Arc::new(LoggerFake::new()));
        let stream = camera.acquire(300, 300, true).unwrap();
        let frame = stream.current_frame().unwrap();

        assert_eq!((frame.width(), frame.height()), (300, 300));
    }

    #[test]
    fn test_mirror_flips_horizontally() {
        let camera = DeviceCameraFake::new(Arc::new(LoggerFake::new()));
        let plain = camera.acquire(8, 2, false).unwrap().current_frame().unwrap();
        let mirrored = camera.acquire(8, 2, true).unwrap().current_frame().unwrap();

        assert_eq!(plain.image().get_pixel(0, 0), mirrored.image().get_pixel(7, 0));
    }

    #[test]
    fn test_frames_change_between_calls() {
        let camera = DeviceCameraFake::new(Arc::new(LoggerFake::new()));
        let stream = camera.acquire(8, 8, false).unwrap();

        assert_ne!(stream.current_frame().unwrap(), stream.current_frame().unwrap());
    }

    #[test]
    fn test_denied_permission() {
        let camera = DeviceCameraFake::denied(Arc::new(LoggerFake::new()));
        let result = camera.acquire(300, 300, true);

        assert!(matches!(result, Err(AnalysisError::DeviceUnavailable(_))));
    }

    #[test]
    fn test_lost_device_stops_frames() {
        let camera = DeviceCameraFake::new(Arc::new(LoggerFake::new()));
        let stream = camera.acquire(8, 8, false).unwrap();
        camera.lose_device();

        assert!(matches!(
            stream.current_frame(),
            Err(AnalysisError::FrameUnavailable(_))
        ));
    }
}
