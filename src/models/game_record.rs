use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GameRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub points: i64,
    pub time: i64,
    pub moves: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGameRecordRequest {
    pub points: i64,
    pub time: i64,
    pub moves: Option<i64>,
}
