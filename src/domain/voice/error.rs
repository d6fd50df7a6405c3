use crate::domain::audio::AudioError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum VoiceServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("payload too large: {0}")]
    TooLarge(String),
    #[error("voice not found")]
    NotFound,
    #[error("voice access denied")]
    Forbidden,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for VoiceServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => VoiceServiceError::Invalid(msg),
            AppError::PayloadTooLarge(msg) => VoiceServiceError::TooLarge(msg),
            AppError::NotFound(_) => VoiceServiceError::NotFound,
            AppError::Forbidden(_) => VoiceServiceError::Forbidden,
            AppError::Conflict(msg) => VoiceServiceError::Conflict(msg),
            AppError::ConversionFailed { format, message } => {
                VoiceServiceError::Audio(AudioError::ConversionFailed { format, message })
            }
            AppError::Storage(msg) => VoiceServiceError::Audio(AudioError::Storage(msg)),
            _ => VoiceServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<VoiceServiceError> for AppError {
    fn from(err: VoiceServiceError) -> Self {
        match err {
            VoiceServiceError::Invalid(msg) => AppError::BadRequest(msg),
            VoiceServiceError::TooLarge(msg) => AppError::PayloadTooLarge(msg),
            VoiceServiceError::NotFound => AppError::NotFound("Voice not found".to_string()),
            VoiceServiceError::Forbidden => AppError::Forbidden("Voice access denied".to_string()),
            VoiceServiceError::Conflict(msg) => AppError::Conflict(msg),
            VoiceServiceError::Audio(e) => AppError::from(e),
            VoiceServiceError::Dependency(msg) => AppError::Internal(msg),
            VoiceServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
