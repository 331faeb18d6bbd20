//! Emotion classification against a pretrained ONNX model.
//!
//! The model is an opaque artifact: a fixed-input-shape network taking a
//! `(1, 40, 862, 1)` MFCC tensor and producing 8 class scores aligned with
//! the sorted label set. It is loaded once and shared read-only; the session
//! sits behind a mutex so concurrent callers serialize around inference.

use crate::config::ClassifierConfig;
use crate::features::FeatureMatrix;
use crate::labels::NUM_LABELS;
use crate::EmotionError;

#[cfg(feature = "inference")]
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Value,
};
#[cfg(feature = "inference")]
use std::sync::Mutex;

/// ONNX-backed emotion classifier
#[cfg(feature = "inference")]
#[derive(Debug)]
pub struct EmotionClassifier {
    session: Mutex<Session>,
    config: ClassifierConfig,
    n_mfcc: usize,
    max_frames: usize,
}

#[cfg(feature = "inference")]
impl EmotionClassifier {
    /// Load the model artifact and prepare it for repeated inference.
    ///
    /// Failure here is fatal for the handle: without a model no inference can
    /// proceed, and callers should refuse further input rather than retry.
    pub fn new(
        config: ClassifierConfig,
        n_mfcc: usize,
        max_frames: usize,
    ) -> Result<Self, EmotionError> {
        if !config.model_path.exists() {
            return Err(EmotionError::ModelLoad(format!(
                "Model not found at {}",
                config.model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| EmotionError::ModelLoad(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| EmotionError::ModelLoad(e.to_string()))?
            .with_intra_threads(config.n_threads as usize)
            .map_err(|e| EmotionError::ModelLoad(e.to_string()))?
            .commit_from_file(&config.model_path)
            .map_err(|e| EmotionError::ModelLoad(e.to_string()))?;

        tracing::info!(
            "Emotion classifier initialized with model: {}",
            config.model_path.display()
        );

        Ok(Self {
            session: Mutex::new(session),
            config,
            n_mfcc,
            max_frames,
        })
    }

    /// Run the feature matrix through the model and return the raw class
    /// scores, index-aligned with `EmotionLabel::ALL`.
    pub fn classify(&self, matrix: &FeatureMatrix) -> Result<[f32; NUM_LABELS], EmotionError> {
        validate_shape(matrix.shape(), self.n_mfcc, self.max_frames)?;

        // Add batch and channel dimensions: (n_mfcc, frames) -> (1, n_mfcc, frames, 1)
        let input_shape = [1_usize, self.n_mfcc, self.max_frames, 1];
        let input_data: Vec<f32> = matrix.iter().copied().collect();

        let input_tensor = Value::from_array((input_shape, input_data))
            .map_err(|e| EmotionError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| EmotionError::Inference("Inference lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| EmotionError::Inference(e.to_string()))?;

        let output = outputs
            .iter()
            .next()
            .ok_or_else(|| EmotionError::Inference("No output from model".to_string()))?;

        let output_tensor = output
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e| EmotionError::Inference(e.to_string()))?;

        let values: Vec<f32> = output_tensor.1.iter().copied().collect();
        if values.len() != NUM_LABELS {
            return Err(EmotionError::Inference(format!(
                "Expected {} class scores, model produced {}",
                NUM_LABELS,
                values.len()
            )));
        }

        let mut scores = [0.0f32; NUM_LABELS];
        scores.copy_from_slice(&values);
        Ok(scores)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

#[cfg(any(feature = "inference", test))]
fn validate_shape(shape: &[usize], n_mfcc: usize, max_frames: usize) -> Result<(), EmotionError> {
    if shape != [n_mfcc, max_frames] {
        return Err(EmotionError::Inference(format!(
            "Feature matrix shape {:?} does not match model input ({}, {})",
            shape, n_mfcc, max_frames
        )));
    }
    Ok(())
}

// Stub implementation when the inference feature is not enabled
#[cfg(not(feature = "inference"))]
pub struct EmotionClassifier;

#[cfg(not(feature = "inference"))]
impl EmotionClassifier {
    pub fn new(
        _config: ClassifierConfig,
        _n_mfcc: usize,
        _max_frames: usize,
    ) -> Result<Self, EmotionError> {
        Err(EmotionError::FeatureNotEnabled)
    }

    pub fn classify(&self, _matrix: &FeatureMatrix) -> Result<[f32; NUM_LABELS], EmotionError> {
        Err(EmotionError::FeatureNotEnabled)
    }
}
