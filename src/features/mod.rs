//! MFCC feature extraction with fixed-shape output.
//!
//! The downstream model has a fixed input shape, so every clip — whatever
//! its duration — is reduced to a `(n_mfcc, max_frames)` matrix: log-mel
//! frames through an orthonormal DCT-II, right-padded with zeros or
//! truncated on the time axis.

pub mod mel;
pub mod resample;

use crate::audio::AudioClip;
use crate::config::FeatureConfig;
use crate::EmotionError;
use mel::MelSpectrogram;
use ndarray::Array2;
use std::f32::consts::PI;
use std::path::Path;
use tracing::debug;

/// Fixed-shape feature matrix, `(n_mfcc, max_frames)`
pub type FeatureMatrix = Array2<f32>;

/// MFCC extractor with pre-computed mel filterbank and DCT basis
#[derive(Debug)]
pub struct FeatureExtractor {
    config: FeatureConfig,
    mel: MelSpectrogram,
    // dct_basis[k] holds the k-th DCT-II row over the mel bands
    dct_basis: Vec<Vec<f32>>,
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Result<Self, EmotionError> {
        if config.n_mfcc == 0 || config.n_mfcc > config.n_mels {
            return Err(EmotionError::FeatureExtraction(format!(
                "n_mfcc must be in 1..={}, got {}",
                config.n_mels, config.n_mfcc
            )));
        }
        if config.max_frames == 0 {
            return Err(EmotionError::FeatureExtraction(
                "max_frames must be non-zero".to_string(),
            ));
        }

        let mel = MelSpectrogram::new(&config)?;
        let dct_basis = dct_ii_basis(config.n_mfcc, config.n_mels);

        Ok(Self {
            config,
            mel,
            dct_basis,
        })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Extract the fixed-shape MFCC matrix from a decoded clip.
    ///
    /// The clip is truncated to the configured duration cap before
    /// resampling, so samples past the cap never influence the output.
    pub fn extract(&self, clip: &AudioClip) -> Result<FeatureMatrix, EmotionError> {
        let clip = clip.clone().truncated(self.config.max_duration_secs);
        let samples = resample::resample(
            clip.samples(),
            clip.sample_rate(),
            self.config.sample_rate,
        )?;

        let log_mel = self.mel.compute(&samples)?;
        let n_frames = log_mel.len();

        let mut matrix = Array2::<f32>::zeros((self.config.n_mfcc, self.config.max_frames));
        for (t, frame) in log_mel.iter().take(self.config.max_frames).enumerate() {
            for (k, basis_row) in self.dct_basis.iter().enumerate() {
                matrix[[k, t]] = basis_row
                    .iter()
                    .zip(frame.iter())
                    .map(|(b, m)| b * m)
                    .sum();
            }
        }

        debug!(
            "Extracted features: {:.2}s clip -> {} frames -> ({}, {})",
            clip.duration_secs(),
            n_frames,
            self.config.n_mfcc,
            self.config.max_frames
        );

        Ok(matrix)
    }

    /// Decode a WAV byte buffer and extract features
    pub fn extract_from_wav_bytes(&self, bytes: &[u8]) -> Result<FeatureMatrix, EmotionError> {
        let clip = AudioClip::from_wav_bytes(bytes)?;
        self.extract(&clip)
    }

    /// Decode a WAV file and extract features
    pub fn extract_from_wav_file(&self, path: &Path) -> Result<FeatureMatrix, EmotionError> {
        let clip = AudioClip::from_wav_file(path)?;
        self.extract(&clip)
    }
}

/// Orthonormal DCT-II basis, `n_coeffs` rows over `n_bands` inputs
fn dct_ii_basis(n_coeffs: usize, n_bands: usize) -> Vec<Vec<f32>> {
    let n = n_bands as f32;
    (0..n_coeffs)
        .map(|k| {
            let scale = if k == 0 {
                (1.0 / n).sqrt()
            } else {
                (2.0 / n).sqrt()
            };
            (0..n_bands)
                .map(|i| scale * (PI * k as f32 * (2.0 * i as f32 + 1.0) / (2.0 * n)).cos())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(FeatureConfig::default()).unwrap()
    }

    fn tone_clip(duration_secs: f32, sample_rate: u32) -> AudioClip {
        let n = (duration_secs * sample_rate as f32) as usize;
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 220.0 * i as f32 / sample_rate as f32).sin() * 0.4)
            .collect();
        AudioClip::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn test_output_shape_is_fixed() {
        let ex = extractor();
        for duration in [0.25, 0.5, 1.0, 2.0, 3.0, 5.0] {
            let matrix = ex.extract(&tone_clip(duration, 22_050)).unwrap();
            assert_eq!(matrix.shape(), &[40, 862], "shape for {}s clip", duration);
        }
    }

    #[test]
    fn test_padded_region_is_exactly_zero() {
        let ex = extractor();
        let clip = tone_clip(2.0, 22_050);
        let n_frames = ex.mel.num_frames(44_100);
        assert!(n_frames < 862);

        let matrix = ex.extract(&clip).unwrap();
        for t in n_frames..862 {
            for k in 0..40 {
                assert_eq!(matrix[[k, t]], 0.0, "pad at ({}, {})", k, t);
            }
        }
    }

    #[test]
    fn test_short_clip_has_content_before_padding() {
        let ex = extractor();
        let matrix = ex.extract(&tone_clip(1.0, 22_050)).unwrap();
        let first_col_energy: f32 = (0..40).map(|k| matrix[[k, 0]].abs()).sum();
        assert!(first_col_energy > 0.0);
    }

    #[test]
    fn test_truncation_is_prefix_based() {
        let ex = extractor();
        let long = tone_clip(5.0, 22_050);
        let prefix = AudioClip::new(long.samples()[..66_150].to_vec(), 22_050).unwrap();

        let from_long = ex.extract(&long).unwrap();
        let from_prefix = ex.extract(&prefix).unwrap();
        assert_eq!(from_long, from_prefix);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let ex = extractor();
        let clip = tone_clip(2.0, 44_100);
        let a = ex.extract(&clip).unwrap();
        let b = ex.extract(&clip).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_native_rate_is_resampled() {
        let ex = extractor();
        let matrix = ex.extract(&tone_clip(1.0, 48_000)).unwrap();
        assert_eq!(matrix.shape(), &[40, 862]);
    }

    #[test]
    fn test_bad_bytes_fail_with_extraction_error() {
        let ex = extractor();
        let err = ex.extract_from_wav_bytes(&[]).unwrap_err();
        assert!(matches!(err, EmotionError::FeatureExtraction(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FeatureConfig {
            n_mfcc: 0,
            ..Default::default()
        };
        assert!(FeatureExtractor::new(config).is_err());

        let config = FeatureConfig {
            n_mfcc: 200,
            n_mels: 128,
            ..Default::default()
        };
        assert!(FeatureExtractor::new(config).is_err());
    }

    #[test]
    fn test_dct_basis_is_orthonormal() {
        let basis = dct_ii_basis(8, 8);
        for i in 0..8 {
            for j in 0..8 {
                let dot: f32 = basis[i]
                    .iter()
                    .zip(basis[j].iter())
                    .map(|(a, b)| a * b)
                    .sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-5, "rows {} and {}", i, j);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_shape_invariant_across_durations(
            duration in 0.05f32..6.0,
            sample_rate in prop::sample::select(vec![8_000u32, 16_000, 22_050, 44_100]),
        ) {
            let ex = extractor();
            let matrix = ex.extract(&tone_clip(duration, sample_rate)).unwrap();
            prop_assert_eq!(matrix.shape(), &[40, 862]);
        }
    }
}
