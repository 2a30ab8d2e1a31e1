use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::journal::{CreateJournalEntryRequest, JournalEntry};
use crate::AppState;

pub async fn create_entry(
    State(state): State<AppState>,
    Json(body): Json<CreateJournalEntryRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if body.prompt.trim().is_empty() || body.response.trim().is_empty() {
        return Err(AppError::Validation(
            "Prompt and response are required".into(),
        ));
    }

    let timestamp = body.timestamp.unwrap_or_else(Utc::now);

    sqlx::query(
        r#"
        INSERT INTO journal_entries (id, prompt, response, timestamp)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&body.prompt)
    .bind(&body.response)
    .bind(timestamp)
    .execute(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Journal entry saved." })),
    ))
}

pub async fn list_entries(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let entries = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT * FROM journal_entries
        ORDER BY timestamp DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries))
}
