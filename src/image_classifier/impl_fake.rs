use crate::error::AnalysisError;
use crate::image_classifier::interface::{ImageClassifier, Prediction};
use crate::image_source::frame::Frame;
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

enum Answer {
    Random(Vec<String>),
    Fixed(Vec<Prediction>),
}

pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    answer: Answer,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl ImageClassifierFake {
    /// Answers with random probabilities over `labels` that sum to one.
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, labels: Vec<String>) -> Self {
        Self::with_answer(logger, Answer::Random(labels))
    }

    /// Always answers with `predictions`.
    pub fn fixed(logger: Arc<dyn Logger + Send + Sync>, predictions: Vec<Prediction>) -> Self {
        Self::with_answer(logger, Answer::Fixed(predictions))
    }

    fn with_answer(logger: Arc<dyn Logger + Send + Sync>, answer: Answer) -> Self {
        Self {
            logger: logger.with_namespace("classifier").with_namespace("fake"),
            answer,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random(&self, labels: &[String]) -> Result<Vec<Prediction>, AnalysisError> {
        let mut rng = rand::rng();
        let weight_dist =
            Uniform::new(0.0f32, 1.0).map_err(|e| AnalysisError::Prediction(e.to_string()))?;

        let weights: Vec<f32> = labels.iter().map(|_| weight_dist.sample(&mut rng)).collect();
        let total: f32 = weights.iter().sum();

        Ok(labels
            .iter()
            .zip(weights)
            .map(|(label, weight)| Prediction {
                label: label.clone(),
                probability: if total > 0.0 { weight / total } else { 0.0 },
            })
            .collect())
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn predict(&self, frame: &Frame) -> Result<Vec<Prediction>, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!("Classifying {:?}", frame));

        if self.failing.load(Ordering::SeqCst) {
            return Err(AnalysisError::Prediction("fake classifier failure".to_string()));
        }

        match &self.answer {
            Answer::Random(labels) => self.random(labels),
            Answer::Fixed(predictions) => Ok(predictions.clone()),
        }
    }
}
