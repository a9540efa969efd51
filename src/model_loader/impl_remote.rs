use crate::config::RemoteModelConfig;
use crate::error::AnalysisError;
use crate::library::logger::interface::Logger;
use crate::model_loader::interface::{ClassifierHandle, ModelLoader};
use crate::model_loader::metadata::ModelMetadata;
use std::io::Read;
use std::sync::Arc;

/// Fetches the topology and metadata resources of a hosted model.
pub struct ModelLoaderRemote {
    config: RemoteModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ModelLoaderRemote {
    pub fn new(config: RemoteModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("model_loader").with_namespace("remote"),
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, AnalysisError> {
        let _ = self.logger.info(&format!("Fetching {}", url));

        let response = ureq::get(url)
            .call()
            .map_err(|e| AnalysisError::ModelLoad(format!("fetch {}: {}", url, e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| AnalysisError::ModelLoad(format!("read {}: {}", url, e)))?;

        if bytes.is_empty() {
            return Err(AnalysisError::ModelLoad(format!("empty response from {}", url)));
        }

        Ok(bytes)
    }

    fn fetch_metadata(&self) -> Result<ModelMetadata, AnalysisError> {
        let bytes = self.fetch(&self.config.metadata_url())?;
        let json = String::from_utf8(bytes)
            .map_err(|e| AnalysisError::ModelLoad(format!("metadata is not utf-8: {}", e)))?;
        ModelMetadata::parse(&json)
    }

    #[cfg(feature = "backend-tract")]
    fn build(&self, metadata: ModelMetadata) -> Result<ClassifierHandle, AnalysisError> {
        use crate::image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;

        let topology = self.fetch(&self.config.topology_url())?;
        let classifier =
            ImageClassifierTractOnnx::from_bytes(&topology, metadata.labels, metadata.image_size)?;
        Ok(Arc::new(classifier))
    }

    #[cfg(not(feature = "backend-tract"))]
    fn build(&self, _metadata: ModelMetadata) -> Result<ClassifierHandle, AnalysisError> {
        Err(AnalysisError::ModelLoad(
            "built without an inference backend (enable the backend-tract feature)".to_string(),
        ))
    }
}

impl ModelLoader for ModelLoaderRemote {
    fn load(&self) -> Result<ClassifierHandle, AnalysisError> {
        let metadata = self.fetch_metadata()?;
        let _ = self.logger.info(&format!(
            "Metadata: {} labels, {}px input",
            metadata.labels.len(),
            metadata.image_size
        ));
        self.build(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    #[test]
    fn test_unreachable_host_is_a_load_error() {
        let loader = ModelLoaderRemote::new(
            RemoteModelConfig::new("http://127.0.0.1:9/missing/"),
            Arc::new(LoggerFake::new()),
        );

        assert!(matches!(loader.load(), Err(AnalysisError::ModelLoad(_))));
    }
}
