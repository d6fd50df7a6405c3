use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_SESSION_NAME: &str = "New session";

/// Chat-like grouping of generated clips. `updated_at` tracks last activity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpeakSession {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameSessionRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SpeakSession> for SessionResponse {
    fn from(session: SpeakSession) -> Self {
        Self {
            id: session.id,
            name: session.name,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}
