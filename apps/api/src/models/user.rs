use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user's resume as held by the companion backend.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserResumeRow {
    pub user_id: Uuid,
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}
