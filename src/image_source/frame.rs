use image::RgbImage;
use std::sync::Arc;

/// An RGB bitmap shared by reference count, so handing it to the classifier
/// never copies pixels.
#[derive(Clone, PartialEq)]
pub struct Frame(Arc<RgbImage>);

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn image(&self) -> &RgbImage {
        &self.0
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame({}x{})", self.width(), self.height())
    }
}
