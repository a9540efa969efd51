use crate::error::AnalysisError;
use crate::image_source::frame::Frame;
use std::sync::Arc;

pub trait DeviceCamera: Send + Sync {
    /// Asks for access to the camera and starts streaming `width`x`height`
    /// frames, flipped horizontally when `mirror` is set.
    fn acquire(
        &self,
        width: u32,
        height: u32,
        mirror: bool,
    ) -> Result<Arc<dyn CameraStream + Send + Sync>, AnalysisError>;
}

pub trait CameraStream: Send + Sync {
    /// Latest buffered frame. Never blocks.
    fn current_frame(&self) -> Result<Frame, AnalysisError>;
}
