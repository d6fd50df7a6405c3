use super::map_constraint_violation;
use crate::infrastructure::db::DbPool;
use crate::{
    domain::genre::{Genre, GenreWithCount},
    error::AppResult,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn list_with_counts(&self) -> AppResult<Vec<GenreWithCount>>;
    async fn find_by_id(&self, genre_id: Uuid) -> AppResult<Option<Genre>>;
    async fn create(&self, name: &str) -> AppResult<Genre>;
    async fn count_voices(&self, genre_id: Uuid) -> AppResult<i64>;
    async fn delete(&self, genre_id: Uuid) -> AppResult<bool>;
}

pub struct PgGenreRepository {
    pool: Arc<DbPool>,
}

impl PgGenreRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreRepository for PgGenreRepository {
    async fn list_with_counts(&self) -> AppResult<Vec<GenreWithCount>> {
        let pool = self.pool.as_ref();
        let genres = sqlx::query_as::<_, GenreWithCount>(
            r#"
            SELECT g.id, g.name, g.created_at, COUNT(v.id) AS voice_count
            FROM genres g
            LEFT JOIN voices v ON v.genre_id = g.id
            GROUP BY g.id, g.name, g.created_at
            ORDER BY g.name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(genres)
    }

    async fn find_by_id(&self, genre_id: Uuid) -> AppResult<Option<Genre>> {
        let pool = self.pool.as_ref();
        let genre = sqlx::query_as::<_, Genre>("SELECT id, name, created_at FROM genres WHERE id = $1")
            .bind(genre_id)
            .fetch_optional(pool)
            .await?;

        Ok(genre)
    }

    async fn create(&self, name: &str) -> AppResult<Genre> {
        let pool = self.pool.as_ref();
        let genre = sqlx::query_as::<_, Genre>(
            r#"
            INSERT INTO genres (id, name, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(chrono::Utc::now())
        .fetch_one(pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Genre already exists", "Genre is referenced"))?;

        Ok(genre)
    }

    async fn count_voices(&self, genre_id: Uuid) -> AppResult<i64> {
        let pool = self.pool.as_ref();
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM voices WHERE genre_id = $1")
            .bind(genre_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    async fn delete(&self, genre_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(genre_id)
            .execute(pool)
            .await
            .map_err(|e| {
                map_constraint_violation(e, "Genre already exists", "Genre is still used by voices")
            })?;

        Ok(result.rows_affected() > 0)
    }
}
