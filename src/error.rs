use thiserror::Error;

/// Every failure the analysis loop can observe. Kept `Clone + PartialEq` so it
/// can travel inside events and be compared in tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("model is not ready")]
    ModelUnavailable,

    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("frame unavailable: {0}")]
    FrameUnavailable(String),

    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("prediction failed: {0}")]
    Prediction(String),
}
