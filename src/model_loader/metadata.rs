use crate::error::AnalysisError;
use serde::Deserialize;

const DEFAULT_IMAGE_SIZE: u32 = 224;

/// The metadata document published next to an exported image model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub labels: Vec<String>,
    #[serde(default = "default_image_size")]
    pub image_size: u32,
    #[serde(default)]
    pub model_name: Option<String>,
}

fn default_image_size() -> u32 {
    DEFAULT_IMAGE_SIZE
}

impl ModelMetadata {
    pub fn parse(json: &str) -> Result<Self, AnalysisError> {
        let metadata: ModelMetadata = serde_json::from_str(json)
            .map_err(|e| AnalysisError::ModelLoad(format!("invalid metadata: {}", e)))?;

        if metadata.labels.is_empty() {
            return Err(AnalysisError::ModelLoad(
                "metadata lists no labels".to_string(),
            ));
        }
        if metadata.image_size == 0 {
            return Err(AnalysisError::ModelLoad(
                "metadata image size is zero".to_string(),
            ));
        }

        Ok(metadata)
    }
}
