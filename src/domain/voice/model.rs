use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Voice {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Canonical path of the normalized reference sample
    pub audio_sample: String,
    pub is_public: bool,
    pub gender: Option<VoiceGender>,
    pub genre_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum VoiceGender {
    #[serde(rename = "male")]
    Male,
    #[serde(rename = "female")]
    Female,
    #[serde(rename = "other")]
    Other,
}

impl std::fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceGender::Male => write!(f, "male"),
            VoiceGender::Female => write!(f, "female"),
            VoiceGender::Other => write!(f, "other"),
        }
    }
}

impl FromStr for VoiceGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(VoiceGender::Male),
            "female" => Ok(VoiceGender::Female),
            "other" => Ok(VoiceGender::Other),
            other => Err(format!("Invalid gender: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedVoice {
    pub user_id: Uuid,
    pub voice_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Values for a new voice row; `audio_sample` is filled in after the
/// upload has been normalized and stored.
#[derive(Debug, Clone)]
pub struct NewVoice {
    pub name: String,
    pub description: Option<String>,
    pub audio_sample: String,
    pub is_public: bool,
    pub gender: Option<VoiceGender>,
    pub genre_id: Option<Uuid>,
    pub user_id: Uuid,
}

/// Parsed multipart upload
#[derive(Debug, Clone)]
pub struct VoiceUpload {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub gender: Option<VoiceGender>,
    pub genre_id: Option<Uuid>,
    pub audio: Vec<u8>,
}

/// PATCH /api/voices/:voice_id
///
/// Absent fields stay unchanged. For the nullable fields an explicit
/// `null` clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVoiceRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Option<VoiceGender>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<Option<Uuid>>,
}

/// Present-but-null becomes `Some(None)`
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Filters for the community listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicVoiceQuery {
    pub genre_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<VoiceGender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<Uuid>,
    pub user_id: Uuid,
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Voice> for VoiceResponse {
    fn from(voice: Voice) -> Self {
        Self {
            audio_url: format!("/api/voices/{}/audio", voice.id),
            id: voice.id,
            name: voice.name,
            description: voice.description,
            is_public: voice.is_public,
            gender: voice.gender,
            genre_id: voice.genre_id,
            user_id: voice.user_id,
            created_at: voice.created_at,
            updated_at: voice.updated_at,
        }
    }
}
