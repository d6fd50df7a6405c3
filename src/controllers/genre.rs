use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::genre::{CreateGenreRequest, Genre, GenreWithCount};
use crate::{
    domain::genre::{GenreService, GenreServiceApi},
    error::AppResult,
    infrastructure::auth::AuthUser,
};

pub struct GenreController {
    genre_service: Arc<GenreService>,
}

impl GenreController {
    pub fn new(genre_service: Arc<GenreService>) -> Self {
        Self { genre_service }
    }

    /// GET /api/genres
    pub async fn list_genres(
        State(controller): State<Arc<GenreController>>,
        Extension(_auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<Vec<GenreWithCount>>> {
        let genres = controller.genre_service.list_genres().await?;
        Ok(Json(genres))
    }

    /// POST /api/genres - Admin only
    pub async fn create_genre(
        State(controller): State<Arc<GenreController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<CreateGenreRequest>,
    ) -> AppResult<(StatusCode, Json<Genre>)> {
        let genre = controller
            .genre_service
            .create_genre(&auth_user.principal(), request)
            .await?;
        Ok((StatusCode::CREATED, Json(genre)))
    }

    /// DELETE /api/genres/{genre_id} - Admin only
    pub async fn delete_genre(
        State(controller): State<Arc<GenreController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(genre_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .genre_service
            .delete_genre(&auth_user.principal(), genre_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
