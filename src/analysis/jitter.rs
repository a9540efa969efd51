use crate::image_classifier::interface::Prediction;
use rand::distr::{Distribution, Uniform};

/// Source of the cosmetic upward offset added to live probabilities.
pub trait Noise: Send + Sync {
    /// A value in `[0, max)`.
    fn sample(&self, max: f32) -> f32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseUniform;

impl Noise for NoiseUniform {
    fn sample(&self, max: f32) -> f32 {
        match Uniform::new(0.0f32, max) {
            Ok(dist) => dist.sample(&mut rand::rng()),
            Err(_) => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseZero;

impl Noise for NoiseZero {
    fn sample(&self, _max: f32) -> f32 {
        0.0
    }
}

/// Always offsets by the same amount, capped at `max`.
#[derive(Debug, Clone, Copy)]
pub struct NoiseFixed(pub f32);

impl Noise for NoiseFixed {
    fn sample(&self, max: f32) -> f32 {
        self.0.min(max)
    }
}

/// Displayed copy of `predictions`: each probability raised by a noise sample
/// and capped at 1.0, never below the original. NaN stays NaN.
pub fn perturb(predictions: &[Prediction], max: f32, noise: &dyn Noise) -> Vec<Prediction> {
    predictions
        .iter()
        .map(|p| {
            if p.probability.is_nan() {
                return p.clone();
            }
            let offset = noise.sample(max).clamp(0.0, max.max(0.0));
            Prediction {
                label: p.label.clone(),
                probability: (p.probability + offset).min(1.0).max(p.probability),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictions() -> Vec<Prediction> {
        vec![
            Prediction::new("cat", 0.0),
            Prediction::new("dog", 0.45),
            Prediction::new("bird", 0.95),
            Prediction::new("fish", 1.0),
        ]
    }

    #[test]
    fn test_zero_noise_keeps_values() {
        assert_eq!(perturb(&predictions(), 0.2, &NoiseZero), predictions());
    }

    #[test]
    fn test_fixed_noise_is_capped_at_one() {
        let perturbed = perturb(&predictions(), 0.1, &NoiseFixed(0.1));
        let values: Vec<f32> = perturbed.iter().map(|p| p.probability).collect();

        assert!((values[0] - 0.1).abs() < 1e-6);
        assert!((values[1] - 0.55).abs() < 1e-6);
        assert_eq!(values[2], 1.0);
        assert_eq!(values[3], 1.0);
    }

    #[test]
    fn test_fixed_noise_respects_max() {
        let perturbed = perturb(&[Prediction::new("cat", 0.5)], 0.1, &NoiseFixed(0.5));
        assert!((perturbed[0].probability - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_noise_stays_in_bounds() {
        let original = predictions();
        for _ in 0..500 {
            let perturbed = perturb(&original, 0.2, &NoiseUniform);
            for (before, after) in original.iter().zip(&perturbed) {
                assert_eq!(before.label, after.label);
                assert!(after.probability >= before.probability);
                assert!(after.probability <= 1.0);
                assert!(after.probability <= before.probability + 0.2 + 1e-6);
            }
        }
    }

    #[test]
    fn test_original_is_untouched() {
        let original = predictions();
        let _ = perturb(&original, 0.2, &NoiseFixed(0.2));
        assert_eq!(original, predictions());
    }

    #[test]
    fn test_nan_is_not_raised() {
        let perturbed = perturb(
            &[Prediction::new("cat", f32::NAN), Prediction::new("dog", 0.5)],
            0.2,
            &NoiseFixed(0.2),
        );

        assert!(perturbed[0].probability.is_nan());
        assert!((perturbed[1].probability - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_with_zero_max() {
        assert_eq!(NoiseUniform.sample(0.0), 0.0);
    }
}
