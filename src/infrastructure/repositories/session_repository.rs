use crate::infrastructure::db::DbPool;
use crate::{domain::session::SpeakSession, error::AppResult};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, name: &str) -> AppResult<SpeakSession>;
    async fn find_by_id(&self, session_id: Uuid) -> AppResult<Option<SpeakSession>>;
    /// Sessions of a user ordered by last activity
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<SpeakSession>>;
    async fn rename(&self, session_id: Uuid, name: &str) -> AppResult<SpeakSession>;
    async fn delete(&self, session_id: Uuid) -> AppResult<bool>;
}

pub struct PgSessionRepository {
    pool: Arc<DbPool>,
}

impl PgSessionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, user_id: Uuid, name: &str) -> AppResult<SpeakSession> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let session = sqlx::query_as::<_, SpeakSession>(
            r#"
            INSERT INTO speak_sessions (id, name, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(user_id)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    async fn find_by_id(&self, session_id: Uuid) -> AppResult<Option<SpeakSession>> {
        let pool = self.pool.as_ref();
        let session = sqlx::query_as::<_, SpeakSession>("SELECT * FROM speak_sessions WHERE id = $1")
            .bind(session_id)
            .fetch_optional(pool)
            .await?;

        Ok(session)
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<SpeakSession>> {
        let pool = self.pool.as_ref();
        let sessions = sqlx::query_as::<_, SpeakSession>(
            r#"
            SELECT *
            FROM speak_sessions
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(sessions)
    }

    async fn rename(&self, session_id: Uuid, name: &str) -> AppResult<SpeakSession> {
        let pool = self.pool.as_ref();
        let session = sqlx::query_as::<_, SpeakSession>(
            r#"
            UPDATE speak_sessions
            SET name = $1, updated_at = GREATEST(updated_at, $2)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(chrono::Utc::now())
        .bind(session_id)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    async fn delete(&self, session_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM speak_sessions WHERE id = $1")
            .bind(session_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
