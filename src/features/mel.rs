//! Log-mel spectrogram frames for MFCC computation.
//!
//! Frames the signal with a Hann window, takes the real-FFT power spectrum,
//! and applies a triangular HTK mel filterbank followed by a log.

use crate::config::FeatureConfig;
use crate::EmotionError;
use realfft::{RealFftPlanner, RealToComplex};
use std::f32::consts::PI;
use std::sync::Arc;

/// Mel spectrogram generator with pre-computed filterbank and FFT plan.
///
/// The plan, window, and filterbank are immutable after construction; FFT
/// scratch buffers are allocated per call so `compute` takes `&self` and the
/// generator can be shared across threads.
pub struct MelSpectrogram {
    n_fft: usize,
    hop_length: usize,
    log_offset: f32,
    fft: Arc<dyn RealToComplex<f32>>,
    filterbank: Vec<Vec<f32>>,
    window: Vec<f32>,
}

impl std::fmt::Debug for MelSpectrogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MelSpectrogram")
            .field("n_fft", &self.n_fft)
            .field("hop_length", &self.hop_length)
            .field("log_offset", &self.log_offset)
            .finish_non_exhaustive()
    }
}

impl MelSpectrogram {
    pub fn new(config: &FeatureConfig) -> Result<Self, EmotionError> {
        if config.n_fft == 0 || config.hop_length == 0 || config.n_mels == 0 {
            return Err(EmotionError::FeatureExtraction(
                "n_fft, hop_length, and n_mels must be non-zero".to_string(),
            ));
        }

        // Hann window over the full FFT length
        let window: Vec<f32> = (0..config.n_fft)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (config.n_fft - 1) as f32).cos()))
            .collect();

        let fmax = config.fmax.min(config.sample_rate as f32 / 2.0);
        let filterbank = create_mel_filterbank(
            config.n_mels,
            config.n_fft / 2 + 1,
            config.sample_rate as f32,
            config.fmin,
            fmax,
        );

        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(config.n_fft);

        Ok(Self {
            n_fft: config.n_fft,
            hop_length: config.hop_length,
            log_offset: config.log_offset,
            fft,
            filterbank,
            window,
        })
    }

    /// Number of frames produced for a signal of the given length
    pub fn num_frames(&self, n_samples: usize) -> usize {
        if n_samples >= self.n_fft {
            1 + (n_samples - self.n_fft) / self.hop_length
        } else {
            1
        }
    }

    /// Compute log-mel frames from mono samples.
    ///
    /// Returns `[frames][n_mels]`.
    pub fn compute(&self, audio: &[f32]) -> Result<Vec<Vec<f32>>, EmotionError> {
        if audio.is_empty() {
            return Err(EmotionError::InvalidAudio("Empty audio".to_string()));
        }

        let n_frames = self.num_frames(audio.len());
        let mut frames = Vec::with_capacity(n_frames);

        let mut fft_input = self.fft.make_input_vec();
        let mut fft_output = self.fft.make_output_vec();

        for frame_idx in 0..n_frames {
            let start = frame_idx * self.hop_length;
            let end = (start + self.n_fft).min(audio.len());

            fft_input.fill(0.0);
            for (i, &sample) in audio[start..end].iter().enumerate() {
                fft_input[i] = sample * self.window[i];
            }

            self.fft
                .process(&mut fft_input, &mut fft_output)
                .map_err(|e| EmotionError::FeatureExtraction(format!("FFT failed: {}", e)))?;

            let power_spec: Vec<f32> = fft_output.iter().map(|c| c.re * c.re + c.im * c.im).collect();

            let mel_frame: Vec<f32> = self
                .filterbank
                .iter()
                .map(|filter| {
                    let energy: f32 = filter
                        .iter()
                        .zip(power_spec.iter())
                        .map(|(f, p)| f * p)
                        .sum();
                    (energy + self.log_offset).ln()
                })
                .collect();

            frames.push(mel_frame);
        }

        Ok(frames)
    }
}

/// Convert frequency to mel scale
fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert mel scale to frequency
fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Create a triangular mel filterbank: one weight vector over FFT bins per band
fn create_mel_filterbank(
    n_mels: usize,
    n_fft_bins: usize,
    sample_rate: f32,
    fmin: f32,
    fmax: f32,
) -> Vec<Vec<f32>> {
    let mel_min = hz_to_mel(fmin);
    let mel_max = hz_to_mel(fmax);

    // n_mels + 2 equally spaced points in mel scale
    let mel_points: Vec<f32> = (0..=n_mels + 1)
        .map(|i| mel_min + (mel_max - mel_min) * (i as f32) / ((n_mels + 1) as f32))
        .collect();

    let hz_points: Vec<f32> = mel_points.iter().map(|&m| mel_to_hz(m)).collect();

    let fft_bin_points: Vec<f32> = hz_points
        .iter()
        .map(|&hz| (n_fft_bins as f32 - 1.0) * hz / (sample_rate / 2.0))
        .collect();

    let mut filterbank = Vec::with_capacity(n_mels);

    for i in 0..n_mels {
        let mut filter = vec![0.0f32; n_fft_bins];

        let left = fft_bin_points[i];
        let center = fft_bin_points[i + 1];
        let right = fft_bin_points[i + 2];

        for (bin, weight) in filter.iter_mut().enumerate() {
            let bin_f = bin as f32;

            if bin_f >= left && bin_f < center {
                *weight = (bin_f - left) / (center - left);
            } else if bin_f >= center && bin_f <= right {
                *weight = (right - bin_f) / (right - center);
            }
        }

        filterbank.push(filter);
    }

    filterbank
}
