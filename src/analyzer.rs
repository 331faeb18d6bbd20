//! End-to-end analysis facade: decode, extract, classify, advise.
//!
//! `EmotionAnalyzer` is an explicitly constructed handle a host passes
//! around (or wraps in an `Arc`); the model loads once at construction and
//! is read-only afterwards. There is no global state.

use crate::advisor::advise;
use crate::audio::AudioClip;
use crate::classifier::EmotionClassifier;
use crate::config::AnalyzerConfig;
use crate::features::FeatureExtractor;
use crate::labels::{dominant, EmotionLabel, NUM_LABELS};
use crate::EmotionError;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Complete result for one clip: either all of this is produced or nothing is
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// The strongest predicted emotion
    pub dominant: EmotionLabel,
    /// Score of the dominant emotion, as reported by the model
    pub confidence: f32,
    /// Raw class scores, index-aligned with `EmotionLabel::ALL`
    pub probabilities: [f32; NUM_LABELS],
    /// Coaching tip for the dominant emotion
    pub advice: &'static str,
}

/// The full pipeline behind one `analyze` call
#[derive(Debug)]
pub struct EmotionAnalyzer {
    extractor: FeatureExtractor,
    classifier: EmotionClassifier,
}

impl EmotionAnalyzer {
    /// Build the pipeline, loading the model once.
    ///
    /// A `ModelLoad` error here means no analysis is possible; hosts should
    /// surface it and stop accepting uploads rather than retry per request.
    pub fn new(config: AnalyzerConfig) -> Result<Self, EmotionError> {
        let n_mfcc = config.features.n_mfcc;
        let max_frames = config.features.max_frames;
        let extractor = FeatureExtractor::new(config.features)?;
        let classifier = EmotionClassifier::new(config.classifier, n_mfcc, max_frames)?;
        Ok(Self {
            extractor,
            classifier,
        })
    }

    /// Analyze a decoded clip
    pub fn analyze(&self, clip: &AudioClip) -> Result<Analysis, EmotionError> {
        let matrix = self.extractor.extract(clip)?;
        let probabilities = self.classifier.classify(&matrix)?;
        let (label, confidence) = dominant(&probabilities);

        debug!(
            "Analysis complete: {} ({:.1}% confidence)",
            label,
            confidence * 100.0
        );

        Ok(Analysis {
            dominant: label,
            confidence,
            probabilities,
            advice: advise(label),
        })
    }

    /// Analyze a WAV byte buffer, e.g. an upload held in memory
    pub fn analyze_wav_bytes(&self, bytes: &[u8]) -> Result<Analysis, EmotionError> {
        let clip = AudioClip::from_wav_bytes(bytes)?;
        self.analyze(&clip)
    }

    /// Analyze a WAV file on disk
    pub fn analyze_wav_file(&self, path: &Path) -> Result<Analysis, EmotionError> {
        let clip = AudioClip::from_wav_file(path)?;
        self.analyze(&clip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "inference")]
    use crate::config::ClassifierConfig;
    #[cfg(feature = "inference")]
    use std::path::PathBuf;

    #[cfg(feature = "inference")]
    #[test]
    fn test_missing_model_blocks_construction() {
        let config = AnalyzerConfig::with_model_path(PathBuf::from("/nonexistent/model.onnx"));
        let err = EmotionAnalyzer::new(config).unwrap_err();
        assert!(matches!(err, EmotionError::ModelLoad(_)));
    }

    #[test]
    fn test_analysis_serializes_for_frontends() {
        let analysis = Analysis {
            dominant: EmotionLabel::Happy,
            confidence: 0.91,
            probabilities: [0.01, 0.01, 0.01, 0.01, 0.91, 0.02, 0.02, 0.01],
            advice: crate::advisor::advise(EmotionLabel::Happy),
        };
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"dominant\":\"happy\""));
        assert!(json.contains("\"confidence\":0.91"));
    }

    // End-to-end determinism against a real artifact; skipped unless a model
    // is supplied via SPEECH_EMOTION_MODEL (no artifact ships with the crate).
    #[cfg(feature = "inference")]
    #[test]
    fn test_end_to_end_determinism_with_real_model() {
        let Some(model_path) = std::env::var_os("SPEECH_EMOTION_MODEL") else {
            return;
        };
        let config = AnalyzerConfig {
            classifier: ClassifierConfig::with_model_path(PathBuf::from(model_path)),
            ..Default::default()
        };
        let analyzer = EmotionAnalyzer::new(config).unwrap();

        // Two seconds of silence
        let clip = AudioClip::new(vec![0.0f32; 44_100], 22_050).unwrap();
        let first = analyzer.analyze(&clip).unwrap();
        let second = analyzer.analyze(&clip).unwrap();

        assert_eq!(first.probabilities, second.probabilities);
        assert_eq!(first.dominant, second.dominant);
        for p in first.probabilities {
            assert!(p >= 0.0 && p.is_finite());
        }
    }
}
