use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::help::CreateHelpRequest;
use crate::AppState;

pub async fn create_help_request(
    State(state): State<AppState>,
    Json(body): Json<CreateHelpRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO help_requests (id, name, email, phone, message)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&body.name)
    .bind(&body.email)
    .bind(&body.phone)
    .bind(&body.message)
    .execute(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "message": "Help request saved" })),
    ))
}
