pub mod generated_audio_repository;
pub mod genre_repository;
pub mod http_tts_repository;
pub mod session_repository;
pub mod tts_repository;
pub mod user_repository;
pub mod voice_repository;

pub use generated_audio_repository::{GeneratedAudioRepository, PgGeneratedAudioRepository};
pub use genre_repository::{GenreRepository, PgGenreRepository};
pub use http_tts_repository::HttpTtsRepository;
pub use session_repository::{PgSessionRepository, SessionRepository};
pub use tts_repository::{SynthesisRequest, SynthesizedSpeech, TtsRepository};
pub use user_repository::{PgUserRepository, UserRepository};
pub use voice_repository::{
    PgSavedVoiceRepository, PgVoiceRepository, SavedVoiceRepository, VoiceRepository,
};

use crate::error::AppError;

/// Map unique and foreign-key violations to `Conflict`, anything else to
/// `Database`.
pub(crate) fn map_constraint_violation(err: sqlx::Error, on_unique: &str, on_foreign_key: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return AppError::Conflict(on_unique.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::Conflict(on_foreign_key.to_string());
        }
    }
    AppError::Database(err)
}
