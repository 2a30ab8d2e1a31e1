use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::AppState;

/// Identity resolved from a verified bearer token. Declaring this as a
/// handler argument is what marks a route as protected.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let token_data = verify_token(token, &state.config)?;

        // The token subject must still resolve to a stored user. One
        // lookup per request, no caching of verification results.
        let (id, username, email) = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT id, username, email FROM users WHERE id = $1",
        )
        .bind(token_data.claims.sub)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

        Ok(AuthUser {
            id,
            username,
            email,
        })
    }
}
