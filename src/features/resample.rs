//! Whole-clip resampling to the model's input rate.

use crate::EmotionError;
use rubato::{FftFixedIn, Resampler};
use tracing::debug;

/// Input chunk size fed to the FFT resampler
const CHUNK_FRAMES: usize = 1024;

/// Resample a mono clip from `from` Hz to `to` Hz.
///
/// The FFT resampler introduces a fixed output delay, so the tail of the
/// input is flushed with zeros and the leading `output_delay()` samples are
/// dropped, leaving exactly the length-scaled clip.
pub fn resample(samples: &[f32], from: u32, to: u32) -> Result<Vec<f32>, EmotionError> {
    if from == to {
        return Ok(samples.to_vec());
    }
    if samples.is_empty() {
        return Err(EmotionError::InvalidAudio(
            "Cannot resample empty audio".to_string(),
        ));
    }

    debug!(
        "Resampling {} samples: {} Hz -> {} Hz",
        samples.len(),
        from,
        to
    );

    let mut resampler = FftFixedIn::<f32>::new(from as usize, to as usize, CHUNK_FRAMES, 2, 1)
        .map_err(|e| EmotionError::FeatureExtraction(format!("Failed to create resampler: {}", e)))?;

    let delay = resampler.output_delay();
    let expected = (samples.len() as f64 * to as f64 / from as f64).round() as usize;
    let mut output = Vec::with_capacity(expected + delay);

    let mut pos = 0;
    while pos < samples.len() {
        let need = resampler.input_frames_next();
        let mut chunk = vec![0.0f32; need];
        let n = (samples.len() - pos).min(need);
        chunk[..n].copy_from_slice(&samples[pos..pos + n]);
        pos += n;

        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| EmotionError::FeatureExtraction(format!("Resampling failed: {}", e)))?;
        output.extend_from_slice(&resampled[0]);
    }

    // Flush zeros until the delayed tail has drained
    while output.len() < delay + expected {
        let need = resampler.input_frames_next();
        let resampled = resampler
            .process(&[vec![0.0f32; need]], None)
            .map_err(|e| EmotionError::FeatureExtraction(format!("Resampling failed: {}", e)))?;
        output.extend_from_slice(&resampled[0]);
    }

    output.drain(..delay);
    output.truncate(expected);
    Ok(output)
}
