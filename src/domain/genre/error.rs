use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum GenreServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("genre not found")]
    NotFound,
    #[error("genre management requires an administrator")]
    Forbidden,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for GenreServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => GenreServiceError::Invalid(msg),
            AppError::NotFound(_) => GenreServiceError::NotFound,
            AppError::Conflict(msg) => GenreServiceError::Conflict(msg),
            _ => GenreServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<GenreServiceError> for AppError {
    fn from(err: GenreServiceError) -> Self {
        match err {
            GenreServiceError::Invalid(msg) => AppError::BadRequest(msg),
            GenreServiceError::NotFound => AppError::NotFound("Genre not found".to_string()),
            GenreServiceError::Forbidden => {
                AppError::Forbidden("Administrator access required".to_string())
            }
            GenreServiceError::Conflict(msg) => AppError::Conflict(msg),
            GenreServiceError::Dependency(msg) => AppError::Internal(msg),
            GenreServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
