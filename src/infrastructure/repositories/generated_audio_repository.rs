use crate::infrastructure::db::DbPool;
use crate::{
    domain::generation::{GeneratedAudio, NewGeneratedAudio},
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait GeneratedAudioRepository: Send + Sync {
    /// Bump the owning session's `updated_at` and insert the clip as one
    /// unit; either both writes land or neither does.
    async fn create_with_session_touch(&self, audio: NewGeneratedAudio) -> AppResult<GeneratedAudio>;
    async fn find_by_id(&self, audio_id: Uuid) -> AppResult<Option<GeneratedAudio>>;
    /// Clips of a session in chronological order
    async fn find_by_session(&self, session_id: Uuid) -> AppResult<Vec<GeneratedAudio>>;
    async fn set_liked(&self, audio_id: Uuid, is_liked: Option<bool>) -> AppResult<GeneratedAudio>;
    async fn delete(&self, audio_id: Uuid) -> AppResult<bool>;
}

pub struct PgGeneratedAudioRepository {
    pool: Arc<DbPool>,
}

impl PgGeneratedAudioRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GeneratedAudioRepository for PgGeneratedAudioRepository {
    async fn create_with_session_touch(&self, audio: NewGeneratedAudio) -> AppResult<GeneratedAudio> {
        let now = chrono::Utc::now();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query(
            r#"
            UPDATE speak_sessions
            SET updated_at = GREATEST(updated_at, $1)
            WHERE id = $2
            "#,
        )
        .bind(now)
        .bind(audio.session_id)
        .execute(&mut *tx)
        .await?;

        if touched.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(AppError::NotFound("Session not found".to_string()));
        }

        let created = sqlx::query_as::<_, GeneratedAudio>(
            r#"
            INSERT INTO generated_audio (id, text, emotion, arousal, valence, file_path, duration_seconds, user_id, voice_id, session_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&audio.text)
        .bind(audio.emotion)
        .bind(audio.emotion.arousal())
        .bind(audio.emotion.valence())
        .bind(&audio.file_path)
        .bind(audio.duration_seconds)
        .bind(audio.user_id)
        .bind(audio.voice_id)
        .bind(audio.session_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn find_by_id(&self, audio_id: Uuid) -> AppResult<Option<GeneratedAudio>> {
        let pool = self.pool.as_ref();
        let audio = sqlx::query_as::<_, GeneratedAudio>("SELECT * FROM generated_audio WHERE id = $1")
            .bind(audio_id)
            .fetch_optional(pool)
            .await?;

        Ok(audio)
    }

    async fn find_by_session(&self, session_id: Uuid) -> AppResult<Vec<GeneratedAudio>> {
        let pool = self.pool.as_ref();
        let clips = sqlx::query_as::<_, GeneratedAudio>(
            r#"
            SELECT *
            FROM generated_audio
            WHERE session_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(pool)
        .await?;

        Ok(clips)
    }

    async fn set_liked(&self, audio_id: Uuid, is_liked: Option<bool>) -> AppResult<GeneratedAudio> {
        let pool = self.pool.as_ref();
        let audio = sqlx::query_as::<_, GeneratedAudio>(
            r#"
            UPDATE generated_audio
            SET is_liked = $1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(is_liked)
        .bind(audio_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Generated audio not found".to_string()))?;

        Ok(audio)
    }

    async fn delete(&self, audio_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM generated_audio WHERE id = $1")
            .bind(audio_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
