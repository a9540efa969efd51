use crate::error::AnalysisError;
use crate::image_classifier::interface::ImageClassifier;
use std::sync::Arc;

pub type ClassifierHandle = Arc<dyn ImageClassifier + Send + Sync>;

pub trait ModelLoader: Send + Sync {
    /// Called once at startup, off the event loop.
    fn load(&self) -> Result<ClassifierHandle, AnalysisError>;
}
