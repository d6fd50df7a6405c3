use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Genre row joined with the number of voices tagged with it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GenreWithCount {
    pub id: Uuid,
    pub name: String,
    pub voice_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGenreRequest {
    pub name: String,
}
