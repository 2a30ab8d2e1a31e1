use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::goal::{CreateGoalRequest, Goal, UpdateGoalRequest};
use crate::AppState;

pub async fn list_goals(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<Goal>>> {
    let goals = sqlx::query_as::<_, Goal>(
        r#"
        SELECT * FROM goals
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(goals))
}

pub async fn create_goal(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(body): Json<CreateGoalRequest>,
) -> AppResult<(StatusCode, Json<Goal>)> {
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("Goal title is required".into()));
    }

    let goal = sqlx::query_as::<_, Goal>(
        r#"
        INSERT INTO goals (id, user_id, title, note, due_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&body.title)
    .bind(&body.note)
    .bind(body.due_date)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(goal_id): Path<Uuid>,
    Json(body): Json<UpdateGoalRequest>,
) -> AppResult<Json<Goal>> {
    // Ownership mismatches are reported as not-found
    let goal = sqlx::query_as::<_, Goal>(
        r#"
        UPDATE goals SET
            title = COALESCE($3, title),
            note = COALESCE($4, note),
            completed = COALESCE($5, completed),
            due_date = COALESCE($6, due_date)
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(goal_id)
    .bind(auth_user.id)
    .bind(&body.title)
    .bind(&body.note)
    .bind(body.completed)
    .bind(body.due_date)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Goal not found".into()))?;

    Ok(Json(goal))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(goal_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
        .bind(goal_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Goal not found".into()));
    }

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
