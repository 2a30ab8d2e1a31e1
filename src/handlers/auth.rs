use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    jwt::create_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::error::{AppError, AppResult};
use crate::models::user::{User, UserSummary};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserSummary,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&body.email)
        .fetch_one(&state.db)
        .await?;

    if existing > 0 {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let pwd_hash = hash_password(&body.password)?;

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&body.username)
    .bind(&body.email)
    .bind(&pwd_hash)
    .execute(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            success: true,
            message: "Signup successful".into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&body.email)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if !verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let token = create_token(user.id, &user.email, &state.config)?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".into(),
        token,
        user: user.into(),
    }))
}

pub async fn current_user(
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(UserResponse {
        success: true,
        user: UserSummary {
            id: auth_user.id,
            username: auth_user.username,
            email: auth_user.email,
        },
    }))
}
