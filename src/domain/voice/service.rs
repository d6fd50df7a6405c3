use super::error::VoiceServiceError;
use crate::domain::access::{can_mutate_voice, can_save_voice, can_view_voice, Principal};
use crate::domain::audio::{AudioNamespace, AudioNormalizer, AudioStorage};
use crate::domain::shared::validation::{optional_text, required_text};
use crate::domain::voice::{
    NewVoice, PublicVoiceQuery, UpdateVoiceRequest, Voice, VoiceResponse, VoiceUpload,
};
use crate::infrastructure::repositories::{GenreRepository, SavedVoiceRepository, VoiceRepository};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub const MAX_VOICE_NAME_CHARS: usize = 100;
pub const MAX_VOICE_DESCRIPTION_CHARS: usize = 500;

pub struct VoiceService {
    voice_repo: Arc<dyn VoiceRepository>,
    saved_voice_repo: Arc<dyn SavedVoiceRepository>,
    genre_repo: Arc<dyn GenreRepository>,
    normalizer: Arc<AudioNormalizer>,
    storage: Arc<AudioStorage>,
    max_upload_bytes: usize,
}

impl VoiceService {
    pub fn new(
        voice_repo: Arc<dyn VoiceRepository>,
        saved_voice_repo: Arc<dyn SavedVoiceRepository>,
        genre_repo: Arc<dyn GenreRepository>,
        normalizer: Arc<AudioNormalizer>,
        storage: Arc<AudioStorage>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            voice_repo,
            saved_voice_repo,
            genre_repo,
            normalizer,
            storage,
            max_upload_bytes,
        }
    }
}

#[async_trait]
pub trait VoiceServiceApi: Send + Sync {
    /// Normalize and store the sample, then insert the voice row
    async fn create_voice(
        &self,
        principal: &Principal,
        upload: VoiceUpload,
    ) -> Result<VoiceResponse, VoiceServiceError>;

    async fn list_own_voices(&self, principal: &Principal) -> Result<Vec<VoiceResponse>, VoiceServiceError>;

    async fn list_public_voices(&self, query: PublicVoiceQuery) -> Result<Vec<VoiceResponse>, VoiceServiceError>;

    async fn list_saved_voices(&self, principal: &Principal) -> Result<Vec<VoiceResponse>, VoiceServiceError>;

    async fn get_voice(
        &self,
        principal: Option<&Principal>,
        voice_id: Uuid,
    ) -> Result<VoiceResponse, VoiceServiceError>;

    async fn update_voice(
        &self,
        principal: &Principal,
        voice_id: Uuid,
        request: UpdateVoiceRequest,
    ) -> Result<VoiceResponse, VoiceServiceError>;

    /// Remove the sample blob, then the row
    async fn delete_voice(&self, principal: &Principal, voice_id: Uuid) -> Result<(), VoiceServiceError>;

    async fn get_voice_audio(
        &self,
        principal: Option<&Principal>,
        voice_id: Uuid,
    ) -> Result<Vec<u8>, VoiceServiceError>;

    async fn save_voice(&self, principal: &Principal, voice_id: Uuid) -> Result<(), VoiceServiceError>;

    async fn unsave_voice(&self, principal: &Principal, voice_id: Uuid) -> Result<(), VoiceServiceError>;
}

#[async_trait]
impl VoiceServiceApi for VoiceService {
    async fn create_voice(
        &self,
        principal: &Principal,
        upload: VoiceUpload,
    ) -> Result<VoiceResponse, VoiceServiceError> {
        let name = required_text("Name", &upload.name, MAX_VOICE_NAME_CHARS)
            .map_err(VoiceServiceError::Invalid)?;
        let description = optional_text(
            "Description",
            upload.description.as_deref(),
            MAX_VOICE_DESCRIPTION_CHARS,
        )
        .map_err(VoiceServiceError::Invalid)?;
        self.validate_upload_size(upload.audio.len())?;
        if let Some(genre_id) = upload.genre_id {
            self.ensure_genre_exists(genre_id).await?;
        }

        tracing::info!(
            user_id = %principal.user_id,
            upload_size = upload.audio.len(),
            "Voice upload received"
        );

        let normalized = self.normalizer.normalize(upload.audio).await?;
        let audio_sample = self
            .storage
            .store(normalized.wav, AudioNamespace::Reference)
            .await?;

        let created = self
            .voice_repo
            .create(NewVoice {
                name,
                description,
                audio_sample: audio_sample.clone(),
                is_public: upload.is_public,
                gender: upload.gender,
                genre_id: upload.genre_id,
                user_id: principal.user_id,
            })
            .await;

        let voice = match created {
            Ok(voice) => voice,
            Err(e) => {
                self.discard_blob(&audio_sample).await;
                return Err(e.into());
            }
        };

        tracing::info!(
            user_id = %principal.user_id,
            voice_id = %voice.id,
            format_detected = %normalized.format_detected,
            "Voice created"
        );

        Ok(VoiceResponse::from(voice))
    }

    async fn list_own_voices(&self, principal: &Principal) -> Result<Vec<VoiceResponse>, VoiceServiceError> {
        let voices = self.voice_repo.find_by_user(principal.user_id).await?;
        Ok(voices.into_iter().map(VoiceResponse::from).collect())
    }

    async fn list_public_voices(&self, query: PublicVoiceQuery) -> Result<Vec<VoiceResponse>, VoiceServiceError> {
        let voices = self.voice_repo.find_public(&query).await?;
        Ok(voices.into_iter().map(VoiceResponse::from).collect())
    }

    async fn list_saved_voices(&self, principal: &Principal) -> Result<Vec<VoiceResponse>, VoiceServiceError> {
        let voices = self
            .saved_voice_repo
            .find_voices_by_user(principal.user_id)
            .await?;
        Ok(voices.into_iter().map(VoiceResponse::from).collect())
    }

    async fn get_voice(
        &self,
        principal: Option<&Principal>,
        voice_id: Uuid,
    ) -> Result<VoiceResponse, VoiceServiceError> {
        let voice = self.find_viewable(principal, voice_id).await?;
        Ok(VoiceResponse::from(voice))
    }

    async fn update_voice(
        &self,
        principal: &Principal,
        voice_id: Uuid,
        request: UpdateVoiceRequest,
    ) -> Result<VoiceResponse, VoiceServiceError> {
        let mut voice = self.find_mutable(principal, voice_id).await?;

        if let Some(name) = request.name.as_deref() {
            voice.name = required_text("Name", name, MAX_VOICE_NAME_CHARS)
                .map_err(VoiceServiceError::Invalid)?;
        }
        if let Some(description) = request.description {
            voice.description = optional_text(
                "Description",
                description.as_deref(),
                MAX_VOICE_DESCRIPTION_CHARS,
            )
            .map_err(VoiceServiceError::Invalid)?;
        }
        if let Some(is_public) = request.is_public {
            voice.is_public = is_public;
        }
        if let Some(gender) = request.gender {
            voice.gender = gender;
        }
        if let Some(genre_id) = request.genre_id {
            if let Some(genre_id) = genre_id {
                self.ensure_genre_exists(genre_id).await?;
            }
            voice.genre_id = genre_id;
        }

        let updated = self.voice_repo.update(&voice).await?;

        tracing::info!(user_id = %principal.user_id, voice_id = %voice_id, "Voice updated");

        Ok(VoiceResponse::from(updated))
    }

    async fn delete_voice(&self, principal: &Principal, voice_id: Uuid) -> Result<(), VoiceServiceError> {
        let voice = self.find_mutable(principal, voice_id).await?;

        self.storage.delete(&voice.audio_sample).await?;
        self.voice_repo.delete(voice.id).await?;

        tracing::info!(user_id = %principal.user_id, voice_id = %voice_id, "Voice deleted");

        Ok(())
    }

    async fn get_voice_audio(
        &self,
        principal: Option<&Principal>,
        voice_id: Uuid,
    ) -> Result<Vec<u8>, VoiceServiceError> {
        let voice = self.find_viewable(principal, voice_id).await?;
        let audio = self.storage.retrieve(&voice.audio_sample).await?;
        Ok(audio)
    }

    async fn save_voice(&self, principal: &Principal, voice_id: Uuid) -> Result<(), VoiceServiceError> {
        let voice = self.find_voice(voice_id).await?;

        if !can_save_voice(principal, &voice) {
            return Err(VoiceServiceError::Forbidden);
        }

        self.saved_voice_repo
            .save(principal.user_id, voice.id)
            .await
            .map_err(|e| match VoiceServiceError::from(e) {
                VoiceServiceError::Conflict(_) => {
                    VoiceServiceError::Conflict("Voice already saved".to_string())
                }
                other => other,
            })?;

        tracing::info!(user_id = %principal.user_id, voice_id = %voice_id, "Voice saved");

        Ok(())
    }

    async fn unsave_voice(&self, principal: &Principal, voice_id: Uuid) -> Result<(), VoiceServiceError> {
        let removed = self
            .saved_voice_repo
            .remove(principal.user_id, voice_id)
            .await?;

        if !removed {
            return Err(VoiceServiceError::NotFound);
        }

        Ok(())
    }
}

impl VoiceService {
    fn validate_upload_size(&self, size: usize) -> Result<(), VoiceServiceError> {
        if size == 0 {
            return Err(VoiceServiceError::Invalid("Audio file cannot be empty".to_string()));
        }
        if size > self.max_upload_bytes {
            return Err(VoiceServiceError::TooLarge(format!(
                "Audio file must be {} bytes or less",
                self.max_upload_bytes
            )));
        }
        Ok(())
    }

    async fn ensure_genre_exists(&self, genre_id: Uuid) -> Result<(), VoiceServiceError> {
        self.genre_repo
            .find_by_id(genre_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| VoiceServiceError::Invalid("Unknown genre".to_string()))
    }

    async fn find_voice(&self, voice_id: Uuid) -> Result<Voice, VoiceServiceError> {
        self.voice_repo
            .find_by_id(voice_id)
            .await?
            .ok_or(VoiceServiceError::NotFound)
    }

    async fn find_viewable(
        &self,
        principal: Option<&Principal>,
        voice_id: Uuid,
    ) -> Result<Voice, VoiceServiceError> {
        let voice = self.find_voice(voice_id).await?;
        if !can_view_voice(principal, &voice) {
            return Err(VoiceServiceError::Forbidden);
        }
        Ok(voice)
    }

    async fn find_mutable(&self, principal: &Principal, voice_id: Uuid) -> Result<Voice, VoiceServiceError> {
        let voice = self.find_voice(voice_id).await?;
        if !can_mutate_voice(principal, &voice) {
            return Err(VoiceServiceError::Forbidden);
        }
        Ok(voice)
    }

    /// Best-effort removal of a blob whose metadata insert failed
    async fn discard_blob(&self, path: &str) {
        match self.storage.delete(path).await {
            Ok(()) => tracing::warn!(path = %path, "Discarded orphaned voice sample"),
            Err(e) => tracing::error!(path = %path, error = %e, "Failed to discard orphaned voice sample"),
        }
    }
}
