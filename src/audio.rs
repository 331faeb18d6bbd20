//! WAV decoding into mono float waveforms.
//!
//! Decoding works on paths or in-memory byte buffers. Uploaded buffers are
//! decoded straight from memory, so no scratch file exists to clean up on
//! failure paths.

use crate::EmotionError;
use hound::SampleFormat;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;

/// A decoded clip: mono float samples plus the rate they were decoded at
#[derive(Debug, Clone)]
pub struct AudioClip {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioClip {
    /// Build a clip from already-decoded mono samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, EmotionError> {
        if sample_rate == 0 {
            return Err(EmotionError::InvalidAudio(
                "Sample rate must be non-zero".to_string(),
            ));
        }
        if samples.is_empty() {
            return Err(EmotionError::InvalidAudio(
                "Audio stream contains no samples".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Decode a WAV file from disk
    pub fn from_wav_file(path: &Path) -> Result<Self, EmotionError> {
        let reader = hound::WavReader::open(path).map_err(|e| {
            EmotionError::FeatureExtraction(format!("Cannot decode {}: {}", path.display(), e))
        })?;
        Self::from_reader(reader)
    }

    /// Decode a WAV container held in memory
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, EmotionError> {
        let reader = hound::WavReader::new(Cursor::new(bytes))
            .map_err(|e| EmotionError::FeatureExtraction(format!("Cannot decode buffer: {}", e)))?;
        Self::from_reader(reader)
    }

    fn from_reader<R: Read>(mut reader: hound::WavReader<R>) -> Result<Self, EmotionError> {
        let spec = reader.spec();
        if spec.channels == 0 {
            return Err(EmotionError::FeatureExtraction(
                "WAV header declares zero channels".to_string(),
            ));
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| {
                    EmotionError::FeatureExtraction(format!("Truncated sample data: {}", e))
                })?,
            SampleFormat::Int => {
                // Normalize by the full scale of the declared bit depth
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| {
                        EmotionError::FeatureExtraction(format!("Truncated sample data: {}", e))
                    })?
            }
        };

        let samples = downmix(&interleaved, spec.channels as usize);
        debug!(
            "Decoded WAV: {} Hz, {} ch, {} mono samples",
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Self::new(samples, spec.sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Keep at most the first `max_secs` seconds of the clip
    pub fn truncated(mut self, max_secs: f32) -> Self {
        let max_samples = (self.sample_rate as f32 * max_secs) as usize;
        if self.samples.len() > max_samples {
            self.samples.truncate(max_samples.max(1));
        }
        self
    }
}

/// Average interleaved channels down to mono
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
