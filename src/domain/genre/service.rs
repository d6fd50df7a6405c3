use super::error::GenreServiceError;
use crate::domain::access::{can_manage_genres, Principal};
use crate::domain::genre::{CreateGenreRequest, Genre, GenreWithCount};
use crate::domain::shared::validation::required_text;
use crate::infrastructure::repositories::GenreRepository;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub const MAX_GENRE_NAME_CHARS: usize = 50;

pub struct GenreService {
    genre_repo: Arc<dyn GenreRepository>,
}

impl GenreService {
    pub fn new(genre_repo: Arc<dyn GenreRepository>) -> Self {
        Self { genre_repo }
    }
}

#[async_trait]
pub trait GenreServiceApi: Send + Sync {
    async fn list_genres(&self) -> Result<Vec<GenreWithCount>, GenreServiceError>;

    async fn create_genre(
        &self,
        principal: &Principal,
        request: CreateGenreRequest,
    ) -> Result<Genre, GenreServiceError>;

    /// Refused while any voice still references the genre
    async fn delete_genre(&self, principal: &Principal, genre_id: Uuid) -> Result<(), GenreServiceError>;
}

#[async_trait]
impl GenreServiceApi for GenreService {
    async fn list_genres(&self) -> Result<Vec<GenreWithCount>, GenreServiceError> {
        Ok(self.genre_repo.list_with_counts().await?)
    }

    async fn create_genre(
        &self,
        principal: &Principal,
        request: CreateGenreRequest,
    ) -> Result<Genre, GenreServiceError> {
        ensure_admin(principal)?;
        let name = required_text("Name", &request.name, MAX_GENRE_NAME_CHARS)
            .map_err(GenreServiceError::Invalid)?;

        let genre = self.genre_repo.create(&name).await?;

        tracing::info!(user_id = %principal.user_id, genre_id = %genre.id, name = %genre.name, "Genre created");

        Ok(genre)
    }

    async fn delete_genre(&self, principal: &Principal, genre_id: Uuid) -> Result<(), GenreServiceError> {
        ensure_admin(principal)?;

        self.genre_repo
            .find_by_id(genre_id)
            .await?
            .ok_or(GenreServiceError::NotFound)?;

        let voice_count = self.genre_repo.count_voices(genre_id).await?;
        if voice_count > 0 {
            return Err(GenreServiceError::Conflict(format!(
                "Genre is still used by {} voice(s)",
                voice_count
            )));
        }

        self.genre_repo.delete(genre_id).await?;

        tracing::info!(user_id = %principal.user_id, genre_id = %genre_id, "Genre deleted");

        Ok(())
    }
}

fn ensure_admin(principal: &Principal) -> Result<(), GenreServiceError> {
    if can_manage_genres(principal) {
        Ok(())
    } else {
        Err(GenreServiceError::Forbidden)
    }
}
