use crate::domain::audio::AudioError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SessionServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("session not found")]
    NotFound,
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for SessionServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => SessionServiceError::Invalid(msg),
            AppError::NotFound(_) => SessionServiceError::NotFound,
            AppError::Storage(msg) => SessionServiceError::Audio(AudioError::Storage(msg)),
            _ => SessionServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<SessionServiceError> for AppError {
    fn from(err: SessionServiceError) -> Self {
        match err {
            SessionServiceError::Invalid(msg) => AppError::BadRequest(msg),
            SessionServiceError::NotFound => AppError::NotFound("Session not found".to_string()),
            SessionServiceError::Audio(e) => AppError::from(e),
            SessionServiceError::Dependency(msg) => AppError::Internal(msg),
            SessionServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
