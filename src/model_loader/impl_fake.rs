use crate::error::AnalysisError;
use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::library::logger::interface::Logger;
use crate::model_loader::interface::{ClassifierHandle, ModelLoader};
use std::sync::Arc;

pub struct ModelLoaderFake {
    logger: Arc<dyn Logger + Send + Sync>,
    outcome: Result<ClassifierHandle, AnalysisError>,
}

impl ModelLoaderFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, labels: Vec<String>) -> Self {
        let classifier = Arc::new(ImageClassifierFake::new(logger.clone(), labels));
        Self::returning(logger, classifier)
    }

    /// Hands out `classifier` so tests can keep a reference to it.
    pub fn returning(logger: Arc<dyn Logger + Send + Sync>, classifier: ClassifierHandle) -> Self {
        Self {
            logger: logger.with_namespace("model_loader").with_namespace("fake"),
            outcome: Ok(classifier),
        }
    }

    pub fn failing(logger: Arc<dyn Logger + Send + Sync>, reason: &str) -> Self {
        Self {
            logger: logger.with_namespace("model_loader").with_namespace("fake"),
            outcome: Err(AnalysisError::ModelLoad(reason.to_string())),
        }
    }
}

impl ModelLoader for ModelLoaderFake {
    fn load(&self) -> Result<ClassifierHandle, AnalysisError> {
        let _ = self.logger.info("Loading model...");
        self.outcome.clone()
    }
}
