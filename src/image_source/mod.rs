pub mod frame;
pub mod upload;

use crate::device_camera::interface::CameraStream;
use crate::error::AnalysisError;
use frame::Frame;
use std::sync::Arc;

/// Where the analysis loop reads frames from. The loop only ever calls
/// `current_frame`, so it does not care which variant it holds.
#[derive(Clone)]
pub enum ImageSource {
    CameraStream(Arc<dyn CameraStream + Send + Sync>),
    StaticImage(Frame),
}

impl ImageSource {
    pub fn current_frame(&self) -> Result<Frame, AnalysisError> {
        match self {
            ImageSource::CameraStream(stream) => stream.current_frame(),
            ImageSource::StaticImage(frame) => Ok(frame.clone()),
        }
    }
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::CameraStream(_) => write!(f, "CameraStream"),
            ImageSource::StaticImage(frame) => write!(f, "StaticImage({:?})", frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_static_image_returns_same_frame() {
        let frame = Frame::new(RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])));
        let source = ImageSource::StaticImage(frame.clone());

        assert_eq!(source.current_frame().unwrap(), frame);
        assert_eq!(source.current_frame().unwrap(), frame);
    }
}
