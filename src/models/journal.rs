use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Journal entries are append-only and carry no owner linkage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub prompt: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJournalEntryRequest {
    pub prompt: String,
    pub response: String,
    pub timestamp: Option<DateTime<Utc>>,
}
