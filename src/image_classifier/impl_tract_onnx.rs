use crate::error::AnalysisError;
use crate::image_classifier::interface::{ImageClassifier, Prediction};
use crate::image_source::frame::Frame;
use image::{imageops, DynamicImage, RgbImage};
use std::io::Cursor;
use tract_onnx::prelude::*;

/// Runs an exported image model (NHWC input, softmax output with one score per
/// label) through tract.
pub struct ImageClassifierTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    labels: Vec<String>,
    input_size: u32,
}

impl ImageClassifierTractOnnx {
    pub fn from_bytes(
        model_bytes: &[u8],
        labels: Vec<String>,
        input_size: u32,
    ) -> Result<Self, AnalysisError> {
        let size = input_size as usize;
        let model = tract_onnx::onnx()
            .model_for_read(&mut Cursor::new(model_bytes))
            .map_err(load_error)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, size, size, 3)),
            )
            .map_err(load_error)?
            .into_optimized()
            .map_err(load_error)?
            .into_runnable()
            .map_err(load_error)?;

        let output = model.model().output_fact(0).map_err(load_error)?;
        if let Some(dims) = output.shape.as_concrete() {
            let width: usize = dims.iter().product();
            if width != labels.len() {
                return Err(AnalysisError::ModelLoad(format!(
                    "model outputs {} scores but metadata lists {} labels",
                    width,
                    labels.len()
                )));
            }
        }

        Ok(Self {
            model,
            labels,
            input_size,
        })
    }
}

/// `[1, size, size, 3]` tensor with channels scaled to [-1, 1].
pub fn to_input(image: &RgbImage, size: u32) -> Tensor {
    let resized = DynamicImage::ImageRgb8(image.clone())
        .resize_exact(size, size, imageops::FilterType::Triangle)
        .to_rgb8();

    tract_ndarray::Array4::from_shape_fn(
        (1, size as usize, size as usize, 3),
        |(_, y, x, c)| {
            let pixel = resized.get_pixel(x as u32, y as u32);
            pixel[c] as f32 / 127.5 - 1.0
        },
    )
    .into_tensor()
}

/// Pairs scores with labels in order. The two must have the same length.
pub fn label_scores(
    labels: &[String],
    scores: &[f32],
) -> Result<Vec<Prediction>, AnalysisError> {
    if scores.len() != labels.len() {
        return Err(AnalysisError::Prediction(format!(
            "model returned {} scores for {} labels",
            scores.len(),
            labels.len()
        )));
    }

    Ok(labels
        .iter()
        .zip(scores)
        .map(|(label, &score)| Prediction {
            label: label.clone(),
            probability: score.clamp(0.0, 1.0),
        })
        .collect())
}

fn load_error(e: TractError) -> AnalysisError {
    AnalysisError::ModelLoad(e.to_string())
}

fn predict_error(e: TractError) -> AnalysisError {
    AnalysisError::Prediction(e.to_string())
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn predict(&self, frame: &Frame) -> Result<Vec<Prediction>, AnalysisError> {
        let input = to_input(frame.image(), self.input_size);
        let outputs = self
            .model
            .run(tvec!(input.into_tvalue()))
            .map_err(predict_error)?;

        let output = outputs
            .first()
            .ok_or_else(|| AnalysisError::Prediction("model produced no outputs".to_string()))?;
        let scores: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(predict_error)?
            .iter()
            .copied()
            .collect();

        label_scores(&self.labels, &scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn labels() -> Vec<String> {
        vec!["normal".to_string(), "at risk".to_string()]
    }

    #[test]
    fn test_scores_are_paired_in_order() {
        let predictions = label_scores(&labels(), &[0.3, 0.7]).unwrap();

        assert_eq!(
            predictions,
            vec![Prediction::new("normal", 0.3), Prediction::new("at risk", 0.7)]
        );
    }

    #[test]
    fn test_fewer_scores_than_labels_is_an_error() {
        assert!(matches!(
            label_scores(&labels(), &[1.0]),
            Err(AnalysisError::Prediction(_))
        ));
    }

    #[test]
    fn test_more_scores_than_labels_is_an_error() {
        assert!(matches!(
            label_scores(&labels(), &[0.1, 0.2, 0.7]),
            Err(AnalysisError::Prediction(_))
        ));
    }

    #[test]
    fn test_input_is_nhwc_in_unit_range() {
        let mut image = RgbImage::from_pixel(4, 4, Rgb([0, 255, 0]));
        image.put_pixel(3, 0, Rgb([255, 0, 0]));
        let input = to_input(&image, 4);

        assert_eq!(input.shape(), &[1, 4, 4, 3]);
        let view = input
            .to_array_view::<f32>()
            .unwrap()
            .into_dimensionality::<tract_ndarray::Ix4>()
            .unwrap();
        assert_eq!(view[[0, 0, 0, 0]], -1.0);
        assert_eq!(view[[0, 0, 0, 1]], 1.0);
        assert_eq!(view[[0, 0, 3, 0]], 1.0);
        assert_eq!(view[[0, 0, 3, 1]], -1.0);
        assert!(view.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_invalid_model_bytes_are_a_load_error() {
        assert!(matches!(
            ImageClassifierTractOnnx::from_bytes(b"not onnx", labels(), 4),
            Err(AnalysisError::ModelLoad(_))
        ));
    }
}
