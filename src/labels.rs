//! The closed emotion label set and dominant-label derivation.
//!
//! Labels are kept in sorted order because the model's output vector is
//! index-aligned with the sorted set; reordering `ALL` would silently
//! misattribute every prediction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of emotion classes the model predicts
pub const NUM_LABELS: usize = 8;

/// One of the eight emotion classes, in sorted order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Angry,
    Calm,
    Disgust,
    Fearful,
    Happy,
    Neutral,
    Sad,
    Surprised,
}

impl EmotionLabel {
    /// All labels, index-aligned with the model's output vector
    pub const ALL: [EmotionLabel; NUM_LABELS] = [
        EmotionLabel::Angry,
        EmotionLabel::Calm,
        EmotionLabel::Disgust,
        EmotionLabel::Fearful,
        EmotionLabel::Happy,
        EmotionLabel::Neutral,
        EmotionLabel::Sad,
        EmotionLabel::Surprised,
    ];

    /// The lowercase tag used in the training data and serialized results
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Angry => "angry",
            EmotionLabel::Calm => "calm",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Fearful => "fearful",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Surprised => "surprised",
        }
    }

    /// Label at the given output-vector index
    pub fn from_index(index: usize) -> Option<EmotionLabel> {
        Self::ALL.get(index).copied()
    }

    /// Position of this label in the output vector
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|l| l == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .find(|l| l.as_str() == lower)
            .copied()
            .ok_or(())
    }
}

/// Derive the dominant label and its confidence from a probability vector.
///
/// Argmax with first-maximum-wins tie-breaking: on exact ties the label with
/// the lower index (earlier in sorted order) is selected, so repeated runs on
/// the same vector are deterministic.
pub fn dominant(probabilities: &[f32; NUM_LABELS]) -> (EmotionLabel, f32) {
    let mut best_idx = 0;
    let mut best = probabilities[0];
    for (idx, &p) in probabilities.iter().enumerate().skip(1) {
        if p > best {
            best = p;
            best_idx = idx;
        }
    }
    (EmotionLabel::ALL[best_idx], best)
}
