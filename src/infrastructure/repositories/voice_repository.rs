use super::map_constraint_violation;
use crate::infrastructure::db::DbPool;
use crate::{
    domain::voice::{NewVoice, PublicVoiceQuery, SavedVoice, Voice},
    error::AppResult,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

const PUBLIC_LISTING_LIMIT: i64 = 100;

#[async_trait]
pub trait VoiceRepository: Send + Sync {
    async fn create(&self, voice: NewVoice) -> AppResult<Voice>;
    async fn find_by_id(&self, voice_id: Uuid) -> AppResult<Option<Voice>>;
    /// Voices owned by a user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Voice>>;
    async fn find_public(&self, query: &PublicVoiceQuery) -> AppResult<Vec<Voice>>;
    async fn update(&self, voice: &Voice) -> AppResult<Voice>;
    async fn delete(&self, voice_id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait SavedVoiceRepository: Send + Sync {
    async fn save(&self, user_id: Uuid, voice_id: Uuid) -> AppResult<SavedVoice>;
    async fn remove(&self, user_id: Uuid, voice_id: Uuid) -> AppResult<bool>;
    async fn exists(&self, user_id: Uuid, voice_id: Uuid) -> AppResult<bool>;
    /// Voices saved by a user, most recently saved first
    async fn find_voices_by_user(&self, user_id: Uuid) -> AppResult<Vec<Voice>>;
}

pub struct PgVoiceRepository {
    pool: Arc<DbPool>,
}

impl PgVoiceRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards in user input
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl VoiceRepository for PgVoiceRepository {
    async fn create(&self, voice: NewVoice) -> AppResult<Voice> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let created = sqlx::query_as::<_, Voice>(
            r#"
            INSERT INTO voices (id, name, description, audio_sample, is_public, gender, genre_id, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&voice.name)
        .bind(&voice.description)
        .bind(&voice.audio_sample)
        .bind(voice.is_public)
        .bind(voice.gender)
        .bind(voice.genre_id)
        .bind(voice.user_id)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Voice already exists", "Unknown genre"))?;

        Ok(created)
    }

    async fn find_by_id(&self, voice_id: Uuid) -> AppResult<Option<Voice>> {
        let pool = self.pool.as_ref();
        let voice = sqlx::query_as::<_, Voice>("SELECT * FROM voices WHERE id = $1")
            .bind(voice_id)
            .fetch_optional(pool)
            .await?;

        Ok(voice)
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Voice>> {
        let pool = self.pool.as_ref();
        let voices = sqlx::query_as::<_, Voice>(
            r#"
            SELECT *
            FROM voices
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(voices)
    }

    async fn find_public(&self, query: &PublicVoiceQuery) -> AppResult<Vec<Voice>> {
        let pool = self.pool.as_ref();
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let voices = sqlx::query_as::<_, Voice>(
            r#"
            SELECT *
            FROM voices
            WHERE is_public = TRUE
              AND ($1::uuid IS NULL OR genre_id = $1)
              AND ($2::text IS NULL OR name ILIKE $2 OR description ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(query.genre_id)
        .bind(search)
        .bind(PUBLIC_LISTING_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(voices)
    }

    async fn update(&self, voice: &Voice) -> AppResult<Voice> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let updated = sqlx::query_as::<_, Voice>(
            r#"
            UPDATE voices
            SET name = $1, description = $2, is_public = $3, gender = $4, genre_id = $5, updated_at = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&voice.name)
        .bind(&voice.description)
        .bind(voice.is_public)
        .bind(voice.gender)
        .bind(voice.genre_id)
        .bind(now)
        .bind(voice.id)
        .fetch_one(pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Voice already exists", "Unknown genre"))?;

        Ok(updated)
    }

    async fn delete(&self, voice_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM voices WHERE id = $1")
            .bind(voice_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct PgSavedVoiceRepository {
    pool: Arc<DbPool>,
}

impl PgSavedVoiceRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedVoiceRepository for PgSavedVoiceRepository {
    async fn save(&self, user_id: Uuid, voice_id: Uuid) -> AppResult<SavedVoice> {
        let pool = self.pool.as_ref();
        let saved = sqlx::query_as::<_, SavedVoice>(
            r#"
            INSERT INTO saved_voices (user_id, voice_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING user_id, voice_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(voice_id)
        .bind(chrono::Utc::now())
        .fetch_one(pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Voice already saved", "Voice not found"))?;

        Ok(saved)
    }

    async fn remove(&self, user_id: Uuid, voice_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM saved_voices WHERE user_id = $1 AND voice_id = $2")
            .bind(user_id)
            .bind(voice_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, user_id: Uuid, voice_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM saved_voices
                WHERE user_id = $1 AND voice_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(voice_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    async fn find_voices_by_user(&self, user_id: Uuid) -> AppResult<Vec<Voice>> {
        let pool = self.pool.as_ref();
        let voices = sqlx::query_as::<_, Voice>(
            r#"
            SELECT v.*
            FROM saved_voices s
            JOIN voices v ON v.id = s.voice_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(voices)
    }
}
