use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::game_record::{CreateGameRecordRequest, GameRecord};
use crate::AppState;

const LEADERBOARD_LIMIT: i64 = 50;

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub records: Vec<GameRecord>,
}

pub async fn create_game_record(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(body): Json<CreateGameRecordRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    sqlx::query(
        r#"
        INSERT INTO game_records (id, user_id, points, time, moves)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.points)
    .bind(body.time)
    .bind(body.moves)
    .execute(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "message": "Record saved!" })),
    ))
}

/// Public leaderboard: highest points first, ties broken by lowest time.
pub async fn leaderboard(
    State(state): State<AppState>,
) -> AppResult<Json<LeaderboardResponse>> {
    let records = sqlx::query_as::<_, GameRecord>(
        r#"
        SELECT * FROM game_records
        ORDER BY points DESC, time ASC
        LIMIT $1
        "#,
    )
    .bind(LEADERBOARD_LIMIT)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(LeaderboardResponse {
        success: true,
        records,
    }))
}
