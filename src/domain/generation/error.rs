use crate::domain::audio::AudioError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum GenerationServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("payload too large: {0}")]
    TooLarge(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("access denied: {0}")]
    Forbidden(String),
    #[error("tts engine error: {0}")]
    Upstream(String),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for GenerationServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => GenerationServiceError::Invalid(msg),
            AppError::PayloadTooLarge(msg) => GenerationServiceError::TooLarge(msg),
            AppError::NotFound(msg) => GenerationServiceError::NotFound(msg),
            AppError::Forbidden(msg) => GenerationServiceError::Forbidden(msg),
            AppError::ExternalService(msg) => GenerationServiceError::Upstream(msg),
            AppError::ConversionFailed { format, message } => {
                GenerationServiceError::Audio(AudioError::ConversionFailed { format, message })
            }
            AppError::Storage(msg) => GenerationServiceError::Audio(AudioError::Storage(msg)),
            _ => GenerationServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<GenerationServiceError> for AppError {
    fn from(err: GenerationServiceError) -> Self {
        match err {
            GenerationServiceError::Invalid(msg) => AppError::BadRequest(msg),
            GenerationServiceError::TooLarge(msg) => AppError::PayloadTooLarge(msg),
            GenerationServiceError::NotFound(msg) => AppError::NotFound(msg),
            GenerationServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            GenerationServiceError::Upstream(msg) => AppError::ExternalService(msg),
            GenerationServiceError::Audio(e) => AppError::from(e),
            GenerationServiceError::Dependency(msg) => AppError::Internal(msg),
            GenerationServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
