use super::error::GenerationServiceError;
use crate::domain::access::{
    can_access_generated_audio, can_access_session, can_generate_in_session, GenerationDenial,
    Principal,
};
use crate::domain::audio::{AudioNamespace, AudioNormalizer, AudioStorage};
use crate::domain::generation::{
    Emotion, GenerateRequest, GeneratedAudio, GenerationResponse, NewGeneratedAudio,
    SignedUrlResponse, UpdateGenerationRequest,
};
use crate::domain::shared::validation::normalize_for_synthesis;
use crate::infrastructure::repositories::{
    GeneratedAudioRepository, SavedVoiceRepository, SessionRepository, SynthesisRequest,
    TtsRepository, VoiceRepository,
};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const MAX_GENERATION_TEXT_CHARS: usize = 2000;
/// Longest text handed to the TTS engine in one call
pub const MAX_SYNTHESIS_CHARS: usize = 500;

pub struct GenerationService {
    session_repo: Arc<dyn SessionRepository>,
    voice_repo: Arc<dyn VoiceRepository>,
    saved_voice_repo: Arc<dyn SavedVoiceRepository>,
    generated_audio_repo: Arc<dyn GeneratedAudioRepository>,
    tts_repo: Arc<dyn TtsRepository>,
    normalizer: Arc<AudioNormalizer>,
    storage: Arc<AudioStorage>,
    signed_url_ttl: Duration,
    reference_cache: Option<Cache<String, Arc<Vec<u8>>>>,
}

impl GenerationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_repo: Arc<dyn SessionRepository>,
        voice_repo: Arc<dyn VoiceRepository>,
        saved_voice_repo: Arc<dyn SavedVoiceRepository>,
        generated_audio_repo: Arc<dyn GeneratedAudioRepository>,
        tts_repo: Arc<dyn TtsRepository>,
        normalizer: Arc<AudioNormalizer>,
        storage: Arc<AudioStorage>,
        signed_url_ttl: Duration,
        reference_cache_enabled: bool,
    ) -> Self {
        // Reference keys are immutable, so cached samples never go stale
        let reference_cache = if reference_cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self {
            session_repo,
            voice_repo,
            saved_voice_repo,
            generated_audio_repo,
            tts_repo,
            normalizer,
            storage,
            signed_url_ttl,
            reference_cache,
        }
    }
}

#[async_trait]
pub trait GenerationServiceApi: Send + Sync {
    /// Synthesize `text` with a voice and emotion, store the clip and
    /// record it in the session.
    ///
    /// Session access is checked before voice usability; a foreign or
    /// missing session is reported as not found, an unusable voice as
    /// forbidden.
    async fn generate(
        &self,
        principal: &Principal,
        session_id: Uuid,
        request: GenerateRequest,
    ) -> Result<GenerationResponse, GenerationServiceError>;

    async fn update_feedback(
        &self,
        principal: &Principal,
        generation_id: Uuid,
        request: UpdateGenerationRequest,
    ) -> Result<GenerationResponse, GenerationServiceError>;

    async fn delete_generation(&self, principal: &Principal, generation_id: Uuid) -> Result<(), GenerationServiceError>;

    async fn get_generation_audio(
        &self,
        principal: &Principal,
        generation_id: Uuid,
    ) -> Result<Vec<u8>, GenerationServiceError>;

    async fn get_signed_url(
        &self,
        principal: &Principal,
        generation_id: Uuid,
    ) -> Result<SignedUrlResponse, GenerationServiceError>;
}

#[async_trait]
impl GenerationServiceApi for GenerationService {
    async fn generate(
        &self,
        principal: &Principal,
        session_id: Uuid,
        request: GenerateRequest,
    ) -> Result<GenerationResponse, GenerationServiceError> {
        let text = validate_text(&request.text)?;
        let emotion: Emotion = request
            .emotion
            .parse()
            .map_err(GenerationServiceError::Invalid)?;

        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| GenerationServiceError::NotFound("Session not found".to_string()))?;
        // Foreign sessions look missing, before anything about the voice is revealed
        if !can_access_session(principal, &session) {
            return Err(GenerationServiceError::NotFound("Session not found".to_string()));
        }

        let voice = self
            .voice_repo
            .find_by_id(request.voice_id)
            .await?
            .ok_or_else(|| GenerationServiceError::NotFound("Voice not found".to_string()))?;
        let has_saved = self
            .saved_voice_repo
            .exists(principal.user_id, voice.id)
            .await?;

        can_generate_in_session(principal, &session, &voice, has_saved).map_err(|denial| match denial {
            GenerationDenial::SessionDenied => {
                GenerationServiceError::NotFound("Session not found".to_string())
            }
            GenerationDenial::VoiceDenied => {
                GenerationServiceError::Forbidden("Voice access denied".to_string())
            }
        })?;

        let reference = self.reference_sample(&voice.audio_sample).await?;
        let synthesis_text = normalize_for_synthesis(&text, MAX_SYNTHESIS_CHARS);

        tracing::info!(
            user_id = %principal.user_id,
            session_id = %session_id,
            voice_id = %voice.id,
            emotion = %emotion,
            text_length = text.chars().count(),
            synthesis_length = synthesis_text.chars().count(),
            "Generation request"
        );

        let speech = self
            .tts_repo
            .synthesize(SynthesisRequest {
                text: &synthesis_text,
                speaker_wav: reference.as_slice(),
                arousal: emotion.arousal(),
                valence: emotion.valence(),
            })
            .await
            .map_err(GenerationServiceError::Upstream)?;

        let normalized = self.normalizer.normalize(speech.audio).await?;
        let file_path = self
            .storage
            .store(normalized.wav, AudioNamespace::Generated)
            .await?;

        let created = self
            .generated_audio_repo
            .create_with_session_touch(NewGeneratedAudio {
                text,
                emotion,
                file_path: file_path.clone(),
                duration_seconds: speech.duration_seconds,
                user_id: principal.user_id,
                voice_id: voice.id,
                session_id: session.id,
            })
            .await;

        let audio = match created {
            Ok(audio) => audio,
            Err(e) => {
                self.discard_blob(&file_path).await;
                return Err(e.into());
            }
        };

        tracing::info!(
            user_id = %principal.user_id,
            generation_id = %audio.id,
            "Generation stored"
        );

        Ok(GenerationResponse::from(audio))
    }

    async fn update_feedback(
        &self,
        principal: &Principal,
        generation_id: Uuid,
        request: UpdateGenerationRequest,
    ) -> Result<GenerationResponse, GenerationServiceError> {
        let audio = self.find_accessible(principal, generation_id).await?;
        let updated = self
            .generated_audio_repo
            .set_liked(audio.id, request.is_liked)
            .await?;
        Ok(GenerationResponse::from(updated))
    }

    async fn delete_generation(&self, principal: &Principal, generation_id: Uuid) -> Result<(), GenerationServiceError> {
        let audio = self.find_accessible(principal, generation_id).await?;

        self.storage.delete(&audio.file_path).await?;
        self.generated_audio_repo.delete(audio.id).await?;

        tracing::info!(
            user_id = %principal.user_id,
            generation_id = %generation_id,
            "Generation deleted"
        );

        Ok(())
    }

    async fn get_generation_audio(
        &self,
        principal: &Principal,
        generation_id: Uuid,
    ) -> Result<Vec<u8>, GenerationServiceError> {
        let audio = self.find_accessible(principal, generation_id).await?;
        let bytes = self.storage.retrieve(&audio.file_path).await?;
        Ok(bytes)
    }

    async fn get_signed_url(
        &self,
        principal: &Principal,
        generation_id: Uuid,
    ) -> Result<SignedUrlResponse, GenerationServiceError> {
        let audio = self.find_accessible(principal, generation_id).await?;
        let url = self
            .storage
            .signed_url(&audio.file_path, self.signed_url_ttl)
            .await?;

        Ok(SignedUrlResponse {
            url,
            expires_in: self.signed_url_ttl.as_secs(),
        })
    }
}

fn validate_text(text: &str) -> Result<String, GenerationServiceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationServiceError::Invalid("Text cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_GENERATION_TEXT_CHARS {
        return Err(GenerationServiceError::TooLarge(format!(
            "Text must be {} characters or less",
            MAX_GENERATION_TEXT_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

impl GenerationService {
    async fn find_accessible(
        &self,
        principal: &Principal,
        generation_id: Uuid,
    ) -> Result<GeneratedAudio, GenerationServiceError> {
        let not_found = || GenerationServiceError::NotFound("Generated audio not found".to_string());

        let audio = self
            .generated_audio_repo
            .find_by_id(generation_id)
            .await?
            .ok_or_else(not_found)?;

        if !can_access_generated_audio(principal, &audio) {
            return Err(not_found());
        }

        Ok(audio)
    }

    async fn reference_sample(&self, path: &str) -> Result<Arc<Vec<u8>>, GenerationServiceError> {
        if let Some(cache) = &self.reference_cache {
            if let Some(cached) = cache.get(path).await {
                tracing::debug!(path = %path, size = cached.len(), "Reference sample cache hit");
                return Ok(cached);
            }
        }

        let sample = Arc::new(self.storage.retrieve(path).await?);

        if let Some(cache) = &self.reference_cache {
            cache.insert(path.to_string(), sample.clone()).await;
        }

        Ok(sample)
    }

    /// Best-effort removal of a clip whose metadata insert failed
    async fn discard_blob(&self, path: &str) {
        match self.storage.delete(path).await {
            Ok(()) => tracing::warn!(path = %path, "Discarded orphaned clip"),
            Err(e) => tracing::error!(path = %path, error = %e, "Failed to discard orphaned clip"),
        }
    }
}
