//! Speech emotion recognition core.
//!
//! This crate turns a short speech clip into an emotion verdict by:
//! 1. Decoding WAV audio to a mono float waveform
//! 2. Extracting a fixed-shape MFCC feature matrix (40 x 862)
//! 3. Running the matrix through a pretrained ONNX model
//! 4. Mapping the dominant label to a static coaching tip
//!
//! The UI, upload handling, and page rendering live in a hosting layer;
//! this crate is the pipeline behind them.

pub mod advisor;
pub mod analyzer;
pub mod audio;
pub mod classifier;
pub mod config;
pub mod features;
pub mod labels;

pub use advisor::{advise, advise_tag, FALLBACK_ADVICE};
pub use analyzer::{Analysis, EmotionAnalyzer};
pub use audio::AudioClip;
pub use classifier::EmotionClassifier;
pub use config::{AnalyzerConfig, ClassifierConfig, FeatureConfig};
pub use features::{FeatureExtractor, FeatureMatrix};
pub use labels::{dominant, EmotionLabel, NUM_LABELS};

use thiserror::Error;

/// Errors that can occur while analyzing a clip
#[derive(Debug, Error)]
pub enum EmotionError {
    /// Fatal: the model artifact is missing or malformed. No inference can
    /// proceed until the path is fixed; callers should stop accepting input.
    #[error("Failed to load emotion model: {0}")]
    ModelLoad(String),

    /// Per-request: the source could not be decoded or featurized.
    #[error("Feature extraction failed: {0}")]
    FeatureExtraction(String),

    /// Per-request: the audio content is unusable (empty stream, no samples).
    #[error("Invalid audio input: {0}")]
    InvalidAudio(String),

    /// Per-request: the feature matrix or model output has the wrong shape.
    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Feature not enabled: classification requires the 'inference' feature")]
    FeatureNotEnabled,
}

#[cfg(feature = "inference")]
impl From<ort::Error> for EmotionError {
    fn from(e: ort::Error) -> Self {
        EmotionError::Inference(e.to_string())
    }
}

impl EmotionError {
    /// Whether the error invalidates the whole process rather than one request
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EmotionError::ModelLoad(_) | EmotionError::FeatureNotEnabled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_load_is_fatal() {
        assert!(EmotionError::ModelLoad("missing".to_string()).is_fatal());
    }

    #[test]
    fn test_request_errors_are_recoverable() {
        assert!(!EmotionError::FeatureExtraction("bad wav".to_string()).is_fatal());
        assert!(!EmotionError::InvalidAudio("empty".to_string()).is_fatal());
        assert!(!EmotionError::Inference("shape".to_string()).is_fatal());
    }
}
