use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::place::{CreateFavoriteRequest, FavoritePlace, OpenPlacesQuery, PlaceResult};
use crate::services::places::{category_selector, DEFAULT_RADIUS_METERS};
use crate::AppState;

pub async fn open_places(
    State(state): State<AppState>,
    Query(query): Query<OpenPlacesQuery>,
) -> AppResult<Json<Vec<PlaceResult>>> {
    let selector = category_selector(&query.category)
        .ok_or_else(|| AppError::Validation("Invalid category".into()))?;

    let radius = query.radius.unwrap_or(DEFAULT_RADIUS_METERS).min(10_000);

    let results = state
        .places
        .search(query.lat, query.lng, selector, radius)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, category = %query.category, "Place search failed");
            AppError::Internal(e)
        })?;

    cache_results(&state, &query.category, &results).await;

    Ok(Json(results))
}

/// Record fetched results as cache rows. Best-effort: a cache write
/// failure must not fail the search response.
async fn cache_results(state: &AppState, category: &str, results: &[PlaceResult]) {
    for place in results {
        let outcome = sqlx::query(
            r#"
            INSERT INTO nearby_places (id, name, category, address, lat, lng, source)
            VALUES ($1, $2, $3, $4, $5, $6, 'osm')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&place.name)
        .bind(category)
        .bind(&place.address)
        .bind(place.lat)
        .bind(place.lng)
        .execute(&state.db)
        .await;

        if let Err(e) = outcome {
            tracing::warn!(error = %e, "Failed to cache place result");
            break;
        }
    }
}

pub async fn create_favorite(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(body): Json<CreateFavoriteRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Place name is required".into()));
    }

    sqlx::query(
        r#"
        INSERT INTO favorite_places (id, user_id, name, address, lat, lng, rating)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&body.name)
    .bind(&body.address)
    .bind(body.lat)
    .bind(body.lng)
    .bind(body.rating)
    .execute(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Saved" })),
    ))
}

pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<FavoritePlace>>> {
    let favorites = sqlx::query_as::<_, FavoritePlace>(
        r#"
        SELECT * FROM favorite_places
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(favorites))
}
