//! Static coaching feedback for each emotion label.

use crate::labels::EmotionLabel;
use std::str::FromStr;

/// Advice returned for tags outside the known label set
pub const FALLBACK_ADVICE: &str =
    "Keep practicing your articulation and emotional delivery to sound more convincing.";

/// Coaching tip for the dominant emotion.
///
/// Exhaustive over the label set, so adding a label without a tip is a
/// compile error.
pub fn advise(label: EmotionLabel) -> &'static str {
    match label {
        EmotionLabel::Angry => {
            "Anger detected. Your voice comes across as forceful, which can work \
             for emphasis, but for a general audience try a calmer intonation and \
             ease off the pressure."
        }
        EmotionLabel::Calm => {
            "Very good! Your voice sounds calm, controlled, and easy to listen to. \
             That builds a reassuring, trustworthy atmosphere."
        }
        EmotionLabel::Disgust => {
            "A negative tone (disgust or dislike) was detected. Be careful with it: \
             it can make listeners uncomfortable. Make sure your tone matches the \
             message you want to deliver."
        }
        EmotionLabel::Fearful => {
            "You sound fearful or nervous, which is natural. Settle yourself before \
             speaking, take a deep breath, and work on articulation; slowing down a \
             little also helps."
        }
        EmotionLabel::Happy => {
            "Great! Your voice sounds pleasant and energetic. Positive energy like \
             this is contagious for an audience. Keep it up!"
        }
        EmotionLabel::Neutral => {
            "Neutral. Your voice is clear but shows little emotion. Add more rise \
             and fall to your intonation so you do not sound flat."
        }
        EmotionLabel::Sad => {
            "Sadness detected. If this is deliberate storytelling it is effective; \
             if not, lift your energy and raise your intonation to hold the \
             audience's attention."
        }
        EmotionLabel::Surprised => {
            "You sound surprised. This emotion works well for emphasizing key \
             points or building toward a climax when delivering something \
             unexpected."
        }
    }
}

/// Advice for a free-form tag, falling back for anything outside the set
pub fn advise_tag(tag: &str) -> &'static str {
    match EmotionLabel::from_str(tag) {
        Ok(label) => advise(label),
        Err(()) => FALLBACK_ADVICE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_label_has_distinct_advice() {
        let tips: HashSet<&str> = EmotionLabel::ALL.iter().map(|l| advise(*l)).collect();
        assert_eq!(tips.len(), EmotionLabel::ALL.len());
        for tip in &tips {
            assert!(!tip.is_empty());
            assert_ne!(*tip, FALLBACK_ADVICE);
        }
    }

    #[test]
    fn test_advise_tag_known_label() {
        assert_eq!(advise_tag("happy"), advise(EmotionLabel::Happy));
        assert_eq!(advise_tag("Calm"), advise(EmotionLabel::Calm));
    }

    #[test]
    fn test_advise_tag_unknown_falls_back() {
        assert_eq!(advise_tag("ecstatic"), FALLBACK_ADVICE);
        assert_eq!(advise_tag(""), FALLBACK_ADVICE);
    }
}
