use super::emotion::Emotion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GeneratedAudio {
    pub id: Uuid,
    pub text: String,
    pub emotion: Emotion,
    pub arousal: f64,
    pub valence: f64,
    /// Canonical path of the generated clip
    pub file_path: String,
    pub duration_seconds: Option<f64>,
    pub is_liked: Option<bool>,
    pub user_id: Uuid,
    /// Cleared when the voice is deleted
    pub voice_id: Option<Uuid>,
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGeneratedAudio {
    pub text: String,
    pub emotion: Emotion,
    pub file_path: String,
    pub duration_seconds: Option<f64>,
    pub user_id: Uuid,
    pub voice_id: Uuid,
    pub session_id: Uuid,
}

/// POST /api/sessions/:session_id/generations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub voice_id: Uuid,
    pub text: String,
    pub emotion: String,
}

/// PATCH /api/generations/:generation_id; `null` clears the feedback
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGenerationRequest {
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub id: Uuid,
    pub text: String,
    pub emotion: Emotion,
    pub arousal: f64,
    pub valence: f64,
    pub duration_seconds: Option<f64>,
    pub is_liked: Option<bool>,
    pub voice_id: Option<Uuid>,
    pub session_id: Uuid,
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<GeneratedAudio> for GenerationResponse {
    fn from(audio: GeneratedAudio) -> Self {
        Self {
            audio_url: format!("/api/generations/{}/audio", audio.id),
            id: audio.id,
            text: audio.text,
            emotion: audio.emotion,
            arousal: audio.arousal,
            valence: audio.valence,
            duration_seconds: audio.duration_seconds,
            is_liked: audio.is_liked,
            voice_id: audio.voice_id,
            session_id: audio.session_id,
            created_at: audio.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignedUrlResponse {
    pub url: String,
    pub expires_in: u64,
}
