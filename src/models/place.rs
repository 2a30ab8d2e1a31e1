use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FavoritePlace {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OpenPlacesQuery {
    pub lat: f64,
    pub lng: f64,
    pub category: String,
    pub radius: Option<u32>,
}

/// One search result returned to the client. `rating` is always None:
/// an explicit unrated sentinel, not a fabricated number.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceResult {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
}
