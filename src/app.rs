//! Dependency wiring shared by the binary and the end-to-end tests.

use axum::Router;
use std::sync::Arc;
use std::time::Duration;

use crate::controllers::{
    generation::GenerationController, genre::GenreController, session::SessionController,
    voice::VoiceController,
};
use crate::domain::audio::{AudioNormalizer, AudioStorage};
use crate::domain::generation::GenerationService;
use crate::domain::genre::GenreService;
use crate::domain::session::SessionService;
use crate::domain::voice::VoiceService;
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::http::build_router;
use crate::infrastructure::repositories::{
    GeneratedAudioRepository, GenreRepository, SavedVoiceRepository, SessionRepository,
    TtsRepository, UserRepository, VoiceRepository,
};
use crate::infrastructure::storage::BlobStore;
use crate::infrastructure::transcoder::AudioTranscoder;

/// Every port the services depend on
#[derive(Clone)]
pub struct AppDependencies {
    pub user_repo: Arc<dyn UserRepository>,
    pub voice_repo: Arc<dyn VoiceRepository>,
    pub saved_voice_repo: Arc<dyn SavedVoiceRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub generated_audio_repo: Arc<dyn GeneratedAudioRepository>,
    pub genre_repo: Arc<dyn GenreRepository>,
    pub tts_repo: Arc<dyn TtsRepository>,
    pub blob_store: Arc<dyn BlobStore>,
    pub transcoder: Arc<dyn AudioTranscoder>,
}

/// Instantiate services and controllers, then build the router
pub fn build_app(pool: Arc<DbPool>, config: Arc<Config>, deps: AppDependencies) -> Router {
    let normalizer = Arc::new(AudioNormalizer::new(
        deps.transcoder.clone(),
        config.scratch_dir.clone(),
    ));
    let storage = Arc::new(AudioStorage::new(
        deps.blob_store.clone(),
        config.reference_audio_bucket.clone(),
        config.generated_audio_bucket.clone(),
    ));

    tracing::info!("Instantiating services...");
    let voice_service = Arc::new(VoiceService::new(
        deps.voice_repo.clone(),
        deps.saved_voice_repo.clone(),
        deps.genre_repo.clone(),
        normalizer.clone(),
        storage.clone(),
        config.max_upload_bytes,
    ));
    let session_service = Arc::new(SessionService::new(
        deps.session_repo.clone(),
        deps.generated_audio_repo.clone(),
        storage.clone(),
    ));
    let generation_service = Arc::new(GenerationService::new(
        deps.session_repo.clone(),
        deps.voice_repo.clone(),
        deps.saved_voice_repo.clone(),
        deps.generated_audio_repo.clone(),
        deps.tts_repo.clone(),
        normalizer,
        storage,
        Duration::from_secs(config.signed_url_ttl_secs),
        config.reference_cache_enabled,
    ));
    let genre_service = Arc::new(GenreService::new(deps.genre_repo.clone()));

    tracing::info!("Instantiating controllers...");
    let voice_controller = Arc::new(VoiceController::new(voice_service));
    let session_controller = Arc::new(SessionController::new(
        session_service,
        generation_service.clone(),
    ));
    let generation_controller = Arc::new(GenerationController::new(generation_service));
    let genre_controller = Arc::new(GenreController::new(genre_service));

    build_router(
        pool,
        config,
        deps.user_repo,
        deps.voice_repo,
        voice_controller,
        session_controller,
        generation_controller,
        genre_controller,
    )
}
