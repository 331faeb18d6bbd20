//! Configuration structures for the analysis pipeline.

use std::path::PathBuf;

/// Configuration for MFCC feature extraction
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// Sample rate the model was trained at; input is resampled to this
    pub sample_rate: u32,

    /// Number of cepstral coefficients per frame
    pub n_mfcc: usize,

    /// Fixed number of time frames in the output matrix; shorter clips are
    /// zero-padded, longer ones truncated
    pub max_frames: usize,

    /// FFT size
    pub n_fft: usize,

    /// Hop length between frames (in samples)
    pub hop_length: usize,

    /// Number of mel frequency bands feeding the DCT
    pub n_mels: usize,

    /// Minimum frequency for the mel filterbank (Hz)
    pub fmin: f32,

    /// Maximum frequency for the mel filterbank (Hz)
    pub fmax: f32,

    /// Small value added before log for numerical stability
    pub log_offset: f32,

    /// Audio beyond this many seconds is ignored
    pub max_duration_secs: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22_050,
            n_mfcc: 40,
            max_frames: 862,
            n_fft: 2048,
            hop_length: 512,
            n_mels: 128,
            fmin: 0.0,
            fmax: 11_025.0, // Nyquist at 22.05 kHz
            log_offset: 1e-10,
            max_duration_secs: 3.0,
        }
    }
}

impl FeatureConfig {
    /// Maximum number of input samples after truncation
    pub fn max_samples(&self) -> usize {
        (self.sample_rate as f32 * self.max_duration_secs) as usize
    }
}

/// Configuration for the ONNX emotion classifier
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Path to the ONNX model artifact
    pub model_path: PathBuf,

    /// Number of threads for ONNX inference
    pub n_threads: i32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::new(),
            n_threads: 1,
        }
    }
}

impl ClassifierConfig {
    /// Create a new config with the specified model path
    pub fn with_model_path(model_path: PathBuf) -> Self {
        Self {
            model_path,
            ..Default::default()
        }
    }
}

/// Top-level configuration for the analyzer facade
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub features: FeatureConfig,
    pub classifier: ClassifierConfig,
}

impl AnalyzerConfig {
    /// Create a config with defaults and the specified model path
    pub fn with_model_path(model_path: PathBuf) -> Self {
        Self {
            features: FeatureConfig::default(),
            classifier: ClassifierConfig::with_model_path(model_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_config_defaults() {
        let config = FeatureConfig::default();
        assert_eq!(config.sample_rate, 22_050);
        assert_eq!(config.n_mfcc, 40);
        assert_eq!(config.max_frames, 862);
        assert_eq!(config.n_fft, 2048);
        assert_eq!(config.hop_length, 512);
    }

    #[test]
    fn test_max_samples_is_three_seconds() {
        let config = FeatureConfig::default();
        assert_eq!(config.max_samples(), 66_150);
    }

    #[test]
    fn test_classifier_config_with_model_path() {
        let config = ClassifierConfig::with_model_path(PathBuf::from("/models/emotion.onnx"));
        assert_eq!(config.model_path, PathBuf::from("/models/emotion.onnx"));
        assert_eq!(config.n_threads, 1);
    }
}
