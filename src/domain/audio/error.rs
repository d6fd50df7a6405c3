use super::format::FormatTag;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("conversion from {format} failed: {message}")]
    ConversionFailed { format: FormatTag, message: String },
    #[error("invalid audio path: {0}")]
    InvalidPathFormat(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<AudioError> for AppError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::ConversionFailed { format, message } => {
                AppError::ConversionFailed { format, message }
            }
            AudioError::InvalidPathFormat(path) => {
                AppError::Internal(format!("Invalid audio path: {}", path))
            }
            AudioError::Storage(msg) => AppError::Storage(msg),
        }
    }
}
