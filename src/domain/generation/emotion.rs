use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of emotions accepted for generation. Each maps to fixed
/// arousal/valence coordinates passed to the TTS engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Happy,
    Sad,
    Angry,
    Fearful,
    Surprised,
    Calm,
    Disgusted,
}

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Surprised,
        Emotion::Calm,
        Emotion::Disgusted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fearful => "fearful",
            Emotion::Surprised => "surprised",
            Emotion::Calm => "calm",
            Emotion::Disgusted => "disgusted",
        }
    }

    pub fn arousal(&self) -> f64 {
        self.coordinates().0
    }

    pub fn valence(&self) -> f64 {
        self.coordinates().1
    }

    fn coordinates(&self) -> (f64, f64) {
        match self {
            Emotion::Neutral => (0.5, 0.5),
            Emotion::Happy => (0.7, 0.9),
            Emotion::Sad => (0.2, 0.1),
            Emotion::Angry => (0.9, 0.1),
            Emotion::Fearful => (0.8, 0.2),
            Emotion::Surprised => (0.8, 0.7),
            Emotion::Calm => (0.2, 0.7),
            Emotion::Disgusted => (0.6, 0.2),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Emotion::ALL
            .iter()
            .copied()
            .find(|emotion| emotion.as_str() == normalized)
            .ok_or_else(|| format!("Unsupported emotion: {}", s))
    }
}
