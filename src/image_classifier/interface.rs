use crate::error::AnalysisError;
use crate::image_source::frame::Frame;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

impl Prediction {
    pub fn new(label: &str, probability: f32) -> Self {
        Self {
            label: label.to_string(),
            probability,
        }
    }
}

pub trait ImageClassifier: Send + Sync {
    /// One entry per class, in the order the model reports them.
    fn predict(&self, frame: &Frame) -> Result<Vec<Prediction>, AnalysisError>;
}
